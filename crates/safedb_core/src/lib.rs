//! # SafeDB Core
//!
//! Password record store for SafeDB.
//!
//! This crate provides:
//! - Records whose field values are encrypted in memory
//! - Record codecs for the V3 and V4 file formats and a plaintext blob
//! - Alias and shortcut resolution against a base record
//! - Password history tracking with self-repair
//! - Undoable commands, including atomic composites
//! - Search predicates over record fields
//! - Delimited text and XML exports
//!
//! ## Usage
//!
//! ```
//! use safedb_core::{Command, Database, EntryType, Preferences, Record};
//!
//! let mut db = Database::new(Preferences::default());
//!
//! let mut base = Record::new()?;
//! base.set_title("Bank")?;
//! base.set_password("s3cret")?;
//! let base_id = base.uuid();
//!
//! let mut alias = Record::new()?;
//! alias.set_title("Bank (mobile)")?;
//!
//! db.execute(Command::composite(vec![
//!     Command::add(base),
//!     Command::add_dependent(alias, EntryType::Alias, base_id)?,
//! ]))?;
//! assert_eq!(db.find(&base_id).map(Record::entry_type), Some(EntryType::AliasBase));
//!
//! db.undo()?;
//! assert!(db.is_empty());
//! # Ok::<(), safedb_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod blob;
pub mod codec;
mod collection;
mod command;
mod config;
mod crypto;
mod database;
mod error;
pub mod export;
pub mod history;
pub mod matching;
mod record;
pub mod resolver;
pub mod timefmt;

pub use collection::RecordStore;
pub use command::{
    AddEntry, Command, Composite, DeleteEntry, EditEntry, LinkDependent, UnlinkDependent,
    UpdateField, UpdatePassword,
};
pub use config::Preferences;
pub use crypto::{FieldCipher, FieldKey};
pub use database::{Database, LoadReport};
pub use error::{CoreError, CoreResult};
pub use export::{ExportOptions, FieldSet};
pub use history::{HistorySettings, HistoryStatus, PasswordHistory};
pub use matching::{Criterion, MatchContext};
pub use record::{
    kb_modifiers, policy_flags, DoubleClickAction, EntryStatus, EntryType, FieldStore, KbShortcut,
    PasswordPolicy, Record, DEFAULT_TOTP_LENGTH, DEFAULT_TOTP_TIME_STEP, MAX_XTIME_INTERVAL,
};

pub use safedb_codec::{FieldType, FormatVersion};
