//! Command handlers for the aftermath CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod decode;
pub mod extract;
