//! Writes converted files to an output directory.
//!
//! Each file is written to `<name>.part` and renamed into place, so a reader
//! never sees a half-written image. Names are sanitized and made unique
//! within one call (`a.png` and `a.jpg` both converting to `a.webp`).

mod sanitize;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::convert::ConversionResult;

pub use sanitize::sanitize_file_name;

/// Suffix of a file still being written.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    overwrite: bool,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes every result and returns the final paths in input order.
    /// Stops at the first I/O error; files already written stay in place.
    pub async fn write_all<'a, I>(&self, results: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = &'a ConversionResult>,
    {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create output dir {}", self.dir.display()))?;

        let mut taken = HashSet::new();
        let mut written = Vec::new();
        for result in results {
            let name = unique_name(&sanitize_file_name(&result.output_file_name), &mut taken);
            written.push(self.write_one(&name, result).await?);
        }
        Ok(written)
    }

    async fn write_one(&self, name: &str, result: &ConversionResult) -> Result<PathBuf> {
        let final_path = self.dir.join(name);
        if !self.overwrite && tokio::fs::try_exists(&final_path).await.unwrap_or(false) {
            anyhow::bail!(
                "output file already exists: {} (use --overwrite to replace)",
                final_path.display()
            );
        }
        let temp_path = self.dir.join(format!("{}{}", name, TEMP_SUFFIX));
        tokio::fs::write(&temp_path, &result.encoded)
            .await
            .with_context(|| format!("write {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &final_path)
            .await
            .with_context(|| format!("rename {} to {}", temp_path.display(), final_path.display()))?;
        tracing::debug!(path = %final_path.display(), bytes = result.converted_size, "wrote output");
        Ok(final_path)
    }
}

/// `name`, or `stem-N.ext` for the first N that is still free.
fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let mut n = 1u32;
    loop {
        let candidate = format!("{}-{}{}", stem, n, ext);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
