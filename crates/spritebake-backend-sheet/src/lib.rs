//! spritebake Sheet Backend
//!
//! Composes rendered frames into a single transparent PNG sprite sheet laid
//! out by [`SheetLayout`](spritebake_spec::SheetLayout).
//!
//! PNG output is deterministic: fixed compression and filter settings, no
//! timestamps. The sheet is encoded in memory and then written atomically,
//! so the destination either holds a complete sheet or is left untouched.

pub mod compositor;
pub mod error;
pub mod png;

pub use compositor::{compose, encode_sheet, load_frame, EncodedSheet, SheetOutput};
pub use error::{SheetError, SheetResult};
pub use png::{PngConfig, PngError};
