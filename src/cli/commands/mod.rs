//! CLI Subcommands

pub mod config;
pub mod enhance;
pub mod generate;
pub mod init;
pub mod run;
pub mod watch;
