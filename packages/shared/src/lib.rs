//! Utilities shared between the chat relay binaries and library crates.

pub mod logger;
pub mod time;
