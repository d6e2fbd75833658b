//! Command workflows behind the binary's subcommands

pub mod orchestration;

pub use orchestration::{run_bump, run_list, BumpOutcome, Kit, Status};
