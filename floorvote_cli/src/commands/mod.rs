//! CLI subcommand implementations.

pub mod groups;
pub mod legislators;
pub mod process;
