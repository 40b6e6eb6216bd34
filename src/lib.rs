//! Command-line client for the X API v2.
//!
//! The crate is split the same way the binary runs: [`cli`] parses flags,
//! [`config`] resolves the bearer token, [`api`] talks to the service,
//! [`format`] renders responses and [`commands`] glues them together.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
