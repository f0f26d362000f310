//! # SafeDB Testkit
//!
//! Test utilities for SafeDB.
//!
//! This crate provides:
//! - Record fixtures and on-disk round-trip helpers
//! - Property-based test generators using proptest
//! - A command harness that checks undo and redo against snapshots
//!
//! ## Usage
//!
//! ```rust,ignore
//! use safedb_testkit::prelude::*;
//!
//! #[test]
//! fn roundtrip_through_a_file() {
//!     let (db, _) = scenarios::base_with_dependents(2, 1);
//!     let back = TestFile::roundtrip(&db, FormatVersion::V4);
//!     assert_eq!(back.store(), db.store());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use safedb_codec::FormatVersion;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
