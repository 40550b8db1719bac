//! Command-Line Interface
//!
//! Subcommand implementations live under [`commands`]; argument parsing and
//! dispatch live in the binary entry point.

pub mod commands;
