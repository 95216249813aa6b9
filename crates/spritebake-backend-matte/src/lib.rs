//! spritebake Background Removal Backend
//!
//! Strips backgrounds from rendered frames with the `rembg` matting model,
//! run as a subprocess per frame. Each matted result must keep the original
//! frame's dimensions and replaces the frame in place.
//!
//! In [`MatteMode::Auto`](spritebake_spec::MatteMode::Auto) frames are
//! classified first (see [`analysis`]) so that empty frames are cleared and
//! frames that already have a transparent background skip the model.
//!
//! # Requirements
//!
//! `rembg` is searched for in:
//!
//! 1. The configured path
//! 2. `REMBG_PATH` environment variable
//! 3. System PATH

pub mod analysis;
pub mod error;
pub mod process;
pub mod rembg;

pub use analysis::{classify, FrameCoverage};
pub use error::{MatteError, MatteResult};
pub use process::{remove_backgrounds, MatteSummary};
pub use rembg::{BackgroundRemover, Rembg, RembgConfig};
