//! Bead Metadata
//!
//! Immutable values describing frozen bead versions.
//!
//! # Core Concepts
//!
//! - [`ContentId`]: opaque identifier of a frozen bead's content
//! - [`BeadName`]: groups versions of "the same" bead
//! - [`FreezeTime`]: offset-aware timestamp ordering versions of a name
//! - [`InputSpec`]: a bead's reference to a specific frozen input
//! - [`BeadRecord`]: one bead version as found in one box
//!
//! # Example
//!
//! ```rust
//! use bead_meta::{BeadName, BeadRecord, ContentId, FreezeTime};
//!
//! let record = BeadRecord::new(
//!     BeadName::new("analysis"),
//!     "kind-analysis",
//!     "main",
//!     ContentId::new("abc123"),
//!     "20190321T191922693711+0100".parse::<FreezeTime>().unwrap(),
//!     Vec::new(),
//! );
//! assert_eq!(record.name().as_str(), "analysis");
//! ```

#![warn(unreachable_pub)]

mod content_id;
mod error;
mod name;
mod record;
mod time;

pub use content_id::ContentId;
pub use error::MetaError;
pub use name::{bead_name_from_file_path, BeadName};
pub use record::{BeadRecord, InputSpec};
pub use time::{FreezeTime, FREEZE_TIME_FORMAT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
