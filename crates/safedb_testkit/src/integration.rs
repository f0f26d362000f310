//! Cross-crate integration test helpers.
//!
//! [`CommandHarness`] drives a [`Database`] through commands while keeping
//! a snapshot of the record store before each one, so undo and redo can be
//! checked against the exact state they must restore.

use crate::generators::RecordOperation;
use safedb_core::{Command, CoreResult, Database, EntryType, Preferences, Record, RecordStore};
use uuid::Uuid;

/// A test harness for undo/redo verification.
pub struct CommandHarness {
    /// The database instance.
    pub db: Database,
    /// Store contents before each executed command, oldest first.
    snapshots: Vec<RecordStore>,
    /// Clock handed to commands that need one.
    now: i64,
}

impl CommandHarness {
    /// Creates a harness around an empty database.
    pub fn new() -> Self {
        Self::with_database(Database::new(Preferences::default()))
    }

    /// Creates a harness around an existing database.
    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            snapshots: Vec::new(),
            now: 1_700_000_000,
        }
    }

    /// Executes `command`, remembering the state it started from.
    ///
    /// A failed command must leave the store untouched; that is asserted.
    pub fn execute(&mut self, command: Command) -> CoreResult<()> {
        let before = self.db.store().clone();
        match self.db.execute(command) {
            Ok(()) => {
                self.snapshots.push(before);
                self.now += 60;
                Ok(())
            }
            Err(e) => {
                assert_eq!(self.db.store(), &before, "failed command changed the store");
                Err(e)
            }
        }
    }

    /// Translates a generated operation into a command against the
    /// current records, or `None` if nothing applies.
    pub fn command_for(&self, op: &RecordOperation) -> Option<Command> {
        let records: Vec<&Record> = self.db.records().collect();
        let pick = |i: usize, pred: &dyn Fn(&Record) -> bool| -> Option<Uuid> {
            let candidates: Vec<Uuid> = records.iter().filter(|r| pred(r)).map(|r| r.uuid()).collect();
            (!candidates.is_empty()).then(|| candidates[i % candidates.len()])
        };

        match op {
            RecordOperation::Add { title, password } => {
                let mut record = Record::new().ok()?;
                record.set_title(title).ok()?;
                record.set_password(password).ok()?;
                Some(Command::add(record))
            }
            RecordOperation::AddDependent { base, kind } => {
                let base = pick(*base, &|r| r.entry_type().is_normal_family())?;
                let mut record = Record::new().ok()?;
                record.set_title(&format!("{kind} of {base}")).ok()?;
                Command::add_dependent(record, *kind, base).ok()
            }
            RecordOperation::Retitle { target, title } => {
                let uuid = pick(*target, &|_| true)?;
                let mut record = self.db.find(&uuid)?.clone();
                record.set_title(title).ok()?;
                Some(Command::edit(record))
            }
            RecordOperation::ChangePassword { target, password } => {
                let uuid = pick(*target, &|_| true)?;
                Some(Command::update_password(
                    uuid,
                    password,
                    self.db.preferences(),
                    self.now,
                ))
            }
            RecordOperation::Unlink { target } => {
                let uuid = pick(*target, &|r| r.is_dependent())?;
                Some(Command::unlink(uuid))
            }
            RecordOperation::Delete { target } => {
                let uuid = pick(*target, &|_| true)?;
                Some(Command::delete(uuid))
            }
        }
    }

    /// Applies a generated operation. Returns true if a command ran.
    pub fn apply(&mut self, op: &RecordOperation) -> bool {
        match self.command_for(op) {
            Some(command) => self.execute(command).is_ok(),
            None => false,
        }
    }

    /// Undoes one command and checks the store matches the snapshot taken
    /// before it ran.
    pub fn undo_and_verify(&mut self) -> bool {
        let Some(expected) = self.snapshots.pop() else {
            assert!(!self.db.can_undo());
            return false;
        };
        assert!(self.db.undo().expect("Failed to undo"));
        assert_eq!(self.db.store(), &expected, "undo did not restore the store");
        self.check_links();
        true
    }

    /// Undoes every command, verifying each step.
    pub fn undo_all_and_verify(&mut self) -> usize {
        let mut count = 0;
        while self.undo_and_verify() {
            count += 1;
        }
        count
    }

    /// Checks base types and links are consistent with the dependents.
    pub fn check_links(&self) {
        let store = self.db.store();
        for record in store.iter() {
            if record.is_dependent() {
                let base = store
                    .base_of(record)
                    .unwrap_or_else(|| panic!("dependent {} has no base", record.uuid()));
                assert!(base.entry_type().is_base());
            } else {
                let uuid = record.uuid();
                let aliases = store.aliases_of(&uuid).count();
                let shortcuts = store.shortcuts_of(&uuid).count();
                let expected = if aliases > 0 {
                    EntryType::AliasBase
                } else if shortcuts > 0 {
                    EntryType::ShortcutBase
                } else {
                    EntryType::Normal
                };
                assert_eq!(record.entry_type(), expected, "base type of {uuid}");
            }
        }
    }

    /// Number of commands that can be undone.
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }
}

impl Default for CommandHarness {
    fn default() -> Self {
        Self::new()
    }
}
