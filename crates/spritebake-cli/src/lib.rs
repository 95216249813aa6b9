//! spritebake CLI library.
//!
//! Holds the bake pipeline and the command implementation so they can be
//! driven from tests without spawning the binary.

pub mod cli_args;
pub mod commands;
pub mod logging;
pub mod pipeline;

pub use pipeline::{
    check_inputs, run_bake, BakeError, BakeEvent, BakeOutcome, BakeResult, FrameRenderer,
};
