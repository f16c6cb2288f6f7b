//! Collision boundary extraction for tilebin worlds
//!
//! Bounds layers are turned into world-space polygons in three steps:
//! every non-empty bounds tile contributes its outline from the shape
//! table, touching solid outlines are merged into as few polygons as
//! possible, and one-way segments are chained into open polylines.
//!
//! - `extract_boundaries` - Whole-world extraction in world units
//! - `merge_solid` - Join, reduce and simplify closed outlines
//! - `merge_lines` - Chain and simplify one-way lines
//! - `classify` - Overlap classification of two opposite edges

mod error;
mod extract;
mod lines;
mod merge;
mod point;
pub mod shape;
mod topology;

pub use error::{BoundsError, Result};
pub use extract::extract_boundaries;
pub use lines::merge_lines;
pub use merge::merge_solid;
pub use point::{colinear, Boundary, Point, ONE_WAY};
pub use topology::{classify, find_splice, EdgeMatch, Splice, Topology};
