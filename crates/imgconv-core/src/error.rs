//! Per-record failure taxonomy.
//!
//! Every failure while reading or converting one file is expressed as a
//! [`ConvertError`] so the batch coordinator can record it against that
//! record instead of propagating it.

use std::fmt;

/// Error for a single record (read, decode, remote, or encode failure).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The file could not be loaded into memory.
    #[error("read error: {0}")]
    Read(String),
    /// The bytes are not a decodable image.
    #[error("decode error: {0}")]
    Decode(String),
    /// Transport failure or non-2xx answer from the remote endpoint.
    #[error("remote conversion error{}: {message}", StatusSuffix(.status))]
    Remote {
        /// HTTP status, when a response was received at all.
        status: Option<u32>,
        message: String,
    },
    /// Local encode failure or anything unexpected.
    #[error("conversion error: {0}")]
    Conversion(String),
}

impl ConvertError {
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn remote(status: Option<u32>, msg: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: msg.into(),
        }
    }

    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Read(_) => "read",
            ConvertError::Decode(_) => "decode",
            ConvertError::Remote { .. } => "remote",
            ConvertError::Conversion(_) => "conversion",
        }
    }

    /// HTTP status carried by a remote failure.
    pub fn http_status(&self) -> Option<u32> {
        match self {
            ConvertError::Remote { status, .. } => *status,
            _ => None,
        }
    }
}

struct StatusSuffix<'a>(&'a Option<u32>);

impl fmt::Display for StatusSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, " (HTTP {})", code),
            None => Ok(()),
        }
    }
}

/// Batch-level precondition failure: no files were supplied.
#[derive(Debug)]
pub struct EmptyBatch;

impl fmt::Display for EmptyBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no files supplied for conversion")
    }
}

impl std::error::Error for EmptyBatch {}
