//! Strategy routing: local encoder or remote endpoint.

use std::fmt;

use crate::format::TargetFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Local,
    Remote,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Local => write!(f, "local"),
            Strategy::Remote => write!(f, "remote"),
        }
    }
}

/// Local only when the format is locally encodable and the local encoder is enabled.
pub fn select_strategy(format: TargetFormat, local_capable: bool) -> Strategy {
    if local_capable && format.is_locally_encodable() {
        Strategy::Local
    } else {
        Strategy::Remote
    }
}
