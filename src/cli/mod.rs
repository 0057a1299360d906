//! Interactive shell over a [`Session`](crate::Session).

pub mod commands;
pub mod output;
pub mod shell;

pub use shell::{run_cli, CliError};
