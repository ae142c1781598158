//! Bead Boxes
//!
//! Places beads are stored in, and the listing of their metadata.
//!
//! - [`BeadSource`]: anything that can list its beads
//! - [`MemoryBox`]: records held in memory
//! - [`DirBox`]: a directory of metadata sidecars, configured by
//!   [`ScanConfig`]
//! - [`BoxSpec`]: `NAME=DIR` box definition
//! - [`load_boxes`]: all records of several boxes, box by box

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod dir;
mod error;
mod source;

pub use config::{BoxSpec, ScanConfig};
pub use dir::DirBox;
pub use error::{BoxError, BoxResult};
pub use source::{load_boxes, BeadSource, MemoryBox};
