//! Interactive and scripted shell over the transaction store and its services.

pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
mod shell;
pub mod shell_context;

pub use shell::{run_cli, SCRIPT_ENV};
