//! CLI argument definitions for aftermath
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod extract;

pub use core::{Cli, Commands};
pub use extract::{EncyclopediaSource, ExtractArgs};
