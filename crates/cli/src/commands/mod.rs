//! CLI command handlers.

pub mod cache;
pub mod run;
