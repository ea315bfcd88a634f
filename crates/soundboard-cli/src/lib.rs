//! Soundboard command-line front end

pub mod collaborators;
pub mod commands;
pub mod logging;
pub mod router;

pub use router::{Cli, CommandRouter, Commands};
