//! Files accepted into a batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConvertError;

/// A raw input handed to the reader: a path on disk or bytes already in memory.
#[derive(Debug, Clone)]
pub enum InputFile {
    Path(PathBuf),
    Memory { name: String, bytes: Vec<u8> },
}

impl InputFile {
    pub fn memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        InputFile::Memory {
            name: name.into(),
            bytes,
        }
    }

    /// Display name: the file name component for paths.
    pub fn name(&self) -> String {
        match self {
            InputFile::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            InputFile::Memory { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for InputFile {
    fn from(p: PathBuf) -> Self {
        InputFile::Path(p)
    }
}

impl From<&Path> for InputFile {
    fn from(p: &Path) -> Self {
        InputFile::Path(p.to_path_buf())
    }
}

/// One file accepted into a batch. Immutable once read.
#[derive(Debug, Clone)]
pub struct FileRecord {
    index: usize,
    original_name: String,
    bytes: Arc<[u8]>,
}

impl FileRecord {
    pub fn new(index: usize, original_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            index,
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Zero-based position in the originating batch.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Size in bytes at read time.
    pub fn original_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type guessed from the name's extension.
    pub fn media_type(&self) -> &'static str {
        media_type_for_name(&self.original_name)
    }

    /// Decode the source bytes into a fresh bitmap owned by the caller.
    pub fn decode(&self) -> Result<image::DynamicImage, ConvertError> {
        if self.bytes.is_empty() {
            return Err(ConvertError::decode(format!("{}: empty file", self.original_name)));
        }
        image::load_from_memory(&self.bytes)
            .map_err(|e| ConvertError::decode(format!("{}: {}", self.original_name, e)))
    }
}

/// MIME type for an image file name, `application/octet-stream` when unknown.
pub fn media_type_for_name(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return "application/octet-stream",
    };
    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
