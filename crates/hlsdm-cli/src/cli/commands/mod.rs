//! CLI command handlers, one file per command.

mod config;
mod get;
mod inspect;

pub use config::run_config;
pub use get::{run_get, GetOptions};
pub use inspect::run_inspect;
