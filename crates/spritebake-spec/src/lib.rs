//! spritebake Spec Library
//!
//! Shared types for turning a 3D animation into a sprite sheet: frame range
//! handling, evenly spaced frame selection, sheet grid layout, and the options
//! of a bake run. Nothing here touches the filesystem or spawns processes.
//!
//! # Example
//!
//! ```
//! use spritebake_spec::{FrameRange, FrameSelection, SheetLayout};
//!
//! let range = FrameRange::new(1, 29).unwrap();
//! let selection = FrameSelection::evenly_spaced(range, 8).unwrap();
//! assert_eq!(selection.indices(), &[1, 5, 9, 13, 17, 21, 25, 29]);
//!
//! let layout = SheetLayout::compute(8, None, 128).unwrap();
//! assert_eq!((layout.columns, layout.rows), (3, 3));
//! assert_eq!((layout.width(), layout.height()), (384, 384));
//! ```
//!
//! # Modules
//!
//! - [`error`]: `ConfigError` and the `BackendError` trait
//! - [`frames`]: frame ranges and evenly spaced selection
//! - [`layout`]: sheet grid geometry
//! - [`options`]: options of a single bake run

pub mod error;
pub mod frames;
pub mod layout;
pub mod options;

// Re-export commonly used types at the crate root
pub use error::{BackendError, ConfigError, ConfigResult};
pub use frames::{FrameRange, FrameSelection, RangeOverride, DEFAULT_FRAME_COUNT};
pub use layout::{SheetLayout, DEFAULT_FRAME_SIZE};
pub use options::{BakeOptions, MatteMode, ModelFormat};
