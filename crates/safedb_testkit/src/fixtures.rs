//! Record fixtures and file helpers.
//!
//! Provides ready-made records and databases, and a temporary record file
//! for testing the on-disk formats.

use safedb_codec::{FormatVersion, TlvReader, TlvWriter};
use safedb_core::{Command, Database, EntryType, Preferences, Record};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Builds a normal record with the given title, user and password.
pub fn sample_record(title: &str, user: &str, password: &str) -> Record {
    let mut record = Record::new().expect("Failed to create record");
    record.set_title(title).expect("Failed to set title");
    record.set_user(user).expect("Failed to set user");
    record.set_password(password).expect("Failed to set password");
    record
}

/// A record file in a temporary directory, removed on drop.
pub struct TestFile {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TestFile {
    /// Creates a path for a record file that does not exist yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("records.dat");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every record of `db` to the file.
    pub fn write(&self, db: &Database, version: FormatVersion) {
        let file = File::create(&self.path).expect("Failed to create record file");
        let mut writer = TlvWriter::new(BufWriter::new(file));
        db.write(&mut writer, version).expect("Failed to write records");
        writer.flush().expect("Failed to flush record file");
    }

    /// Reads the file back into a database with default preferences.
    pub fn read(&self, version: FormatVersion) -> Database {
        let file = File::open(&self.path).expect("Failed to open record file");
        let (db, report) = Database::read(
            TlvReader::new(BufReader::new(file)),
            version,
            Preferences::default(),
        )
        .expect("Failed to read records");
        assert!(report.is_clean(), "load needed repair: {report:?}");
        db
    }

    /// Writes `db` to a fresh file and reads it back.
    pub fn roundtrip(db: &Database, version: FormatVersion) -> Database {
        let file = Self::new();
        file.write(db, version);
        file.read(version)
    }
}

impl Default for TestFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A database holding `count` unrelated records.
    pub fn populated_database(count: usize) -> Database {
        let mut db = Database::new(Preferences::default());
        for i in 0..count {
            let record = sample_record(&format!("entry {i}"), "user", &format!("password {i}"));
            db.execute(Command::add(record)).expect("Failed to add record");
        }
        db.mark_saved();
        db
    }

    /// A database holding one base with `aliases` aliases and `shortcuts`
    /// shortcuts. Returns the database and the base UUID.
    pub fn base_with_dependents(aliases: usize, shortcuts: usize) -> (Database, Uuid) {
        let mut db = Database::new(Preferences::default());
        let base = sample_record("base", "owner", "base password");
        let base_id = base.uuid();
        let mut commands = vec![Command::add(base)];
        let kinds = std::iter::repeat(EntryType::Alias)
            .take(aliases)
            .chain(std::iter::repeat(EntryType::Shortcut).take(shortcuts));
        for (i, kind) in kinds.enumerate() {
            let dependent = sample_record(&format!("{kind} {i}"), "", "");
            commands.push(
                Command::add_dependent(dependent, kind, base_id)
                    .expect("Failed to build dependent"),
            );
        }
        db.execute(Command::composite(commands))
            .expect("Failed to add records");
        db.mark_saved();
        (db, base_id)
    }
}
