//! Bead Web
//!
//! Dependency graph and freshness resolution over bead metadata collected
//! from boxes.
//!
//! # Core Concepts
//!
//! - [`BeadCollection`]: records deduplicated by content id, with the boxes
//!   each bead was found in and integrity warnings
//! - [`BeadGraph`]: consumer → input graph with phantom nodes for missing
//!   inputs
//! - [`resolve`]: classifies every bead as [`Freshness::UpToDate`],
//!   [`Freshness::OutOfDate`] or [`Freshness::Superseded`]
//! - [`Sketch`]: the resolved, queryable view
//! - [`read_snapshot`] / [`write_snapshot`]: the JSON snapshot format
//!
//! # Example
//!
//! ```rust
//! use bead_meta::{BeadName, BeadRecord, ContentId, FreezeTime, InputSpec};
//! use bead_web::{Freshness, Sketch};
//!
//! let root = BeadRecord::new(
//!     BeadName::new("root"),
//!     "kind-root",
//!     "main",
//!     ContentId::new("id_root"),
//!     "20190321T191922693711+0100".parse::<FreezeTime>().unwrap(),
//!     Vec::new(),
//! );
//! let leaf = BeadRecord::new(
//!     BeadName::new("leaf"),
//!     "kind-leaf",
//!     "main",
//!     ContentId::new("id_leaf"),
//!     "20190322T000000000000+0100".parse::<FreezeTime>().unwrap(),
//!     vec![InputSpec::referencing("root", &root)],
//! );
//!
//! let sketch = Sketch::from_beads(vec![root, leaf]);
//! assert_eq!(sketch.freshness("id_leaf"), Some(Freshness::UpToDate));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod collection;
mod diagnostic;
mod error;
mod freshness;
mod graph;
mod resolve;
mod sketch;
mod snapshot;

pub use collection::{BeadCollection, CollectedBead};
pub use diagnostic::{Anomaly, Diagnostic, IntegrityWarning};
pub use error::{SnapshotError, SnapshotResult};
pub use freshness::{Freshness, UnknownFreshness};
pub use graph::{BeadGraph, InputEdge, Node, Phantom};
pub use resolve::{resolve, Resolution};
pub use sketch::{ResolvedInput, Sketch};
pub use snapshot::{
    decode, encode, encode_with, read_snapshot, write_snapshot, SnapshotBead, SnapshotFormat,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
