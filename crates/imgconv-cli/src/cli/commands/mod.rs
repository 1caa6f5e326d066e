//! CLI command handlers, one per file.

mod completions;
mod config;
mod convert;
mod man;
mod route;

pub use completions::run_completions;
pub use config::run_config;
pub use convert::{run_convert, ConvertOptions};
pub use man::run_man;
pub use route::run_route;
