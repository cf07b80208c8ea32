//! Command-line interface for dcheck.

mod commands;
mod helpers;

pub use commands::{is_verbose, run};
