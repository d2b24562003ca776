//! `comicfactory-cli` library crate.
//!
//! Holds the subcommand definitions and the environment configuration
//! loader. The binary entrypoint lives in `main.rs`.

pub mod commands;
pub mod config;
