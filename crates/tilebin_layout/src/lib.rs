//! Two-pass binary layout for tilebin
//!
//! Record writers take a [`Layout`] and return the number of bytes they
//! produced. The same writer runs twice: against [`Layout::measure`] to learn
//! the exact output size, then against [`Layout::write`] over a buffer of
//! that size. Fields that point at payloads written later are reserved into
//! an [`OffsetQueue`] and resolved in FIFO order once the payload's absolute
//! offset is known.
//!
//! - `Layout` - Measuring/writing cursor with absolute offset tracking
//! - `OffsetQueue` - FIFO of reserved offset fields
//! - `Cursor` - Bounds-checked reader for compiled buffers
//! - `two_pass` - Measure, allocate once, write

mod cursor;
mod error;
mod layout;
mod offsets;

pub use cursor::Cursor;
pub use error::{LayoutError, Result};
pub use layout::{two_pass, Layout};
pub use offsets::{OffsetEntry, OffsetQueue};
