//! Text fields sent alongside the `image` part.

use crate::convert::ResizeOptions;
use crate::format::TargetFormat;

/// `format` always; `width`, `height` and `fit` only when a resize is requested,
/// and only the dimensions actually set.
pub fn form_fields(format: TargetFormat, resize: Option<&ResizeOptions>) -> Vec<(&'static str, String)> {
    let mut fields = vec![("format", format.as_str().to_string())];
    if let Some(opts) = resize {
        if let Some(w) = opts.width() {
            fields.push(("width", w.to_string()));
        }
        if let Some(h) = opts.height() {
            fields.push(("height", h.to_string()));
        }
        fields.push(("fit", opts.fit().as_str().to_string()));
    }
    fields
}
