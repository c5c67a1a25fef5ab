//! Subcommand implementations.

pub mod common;
pub mod config;
pub mod init;
pub mod predict;
pub mod routes;
pub mod seed;
