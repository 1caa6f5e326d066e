//! Safe output file names.

/// Longest file name Linux accepts (NAME_MAX, bytes).
const NAME_MAX: usize = 255;

/// Turns a converted file name into one safe to create in the output directory.
///
/// Path separators, NUL, whitespace and control characters become `_` (runs
/// collapse to one). Leading dots are stripped so a name can never be `.`,
/// `..` or hidden. The result is cut to `NAME_MAX` bytes keeping the
/// extension, and is never empty.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '\0' | '/' | '\\') || c.is_control() || c.is_whitespace();
        if unsafe_char {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out
        .trim_start_matches(|c| c == '.' || c == '_')
        .trim_end_matches('_');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return "image".to_string();
    }
    truncate_keeping_extension(trimmed, NAME_MAX)
}

fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let ext = match name.rfind('.') {
        Some(dot) if name.len() - dot < max => &name[dot..],
        _ => "",
    };
    let mut take = max - ext.len();
    while take > 0 && !name.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}{}", &name[..take], ext)
}
