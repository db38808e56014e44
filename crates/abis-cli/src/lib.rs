//! Library components of the `abis` command-line validator.

pub mod config;
pub mod logging;
