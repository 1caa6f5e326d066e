pub mod config;
pub mod logging;

pub mod batch;
pub mod convert;
pub mod error;
pub mod events;
pub mod format;
pub mod output;
pub mod reader;
pub mod record;
pub mod session;

#[cfg(test)]
mod test_support;
