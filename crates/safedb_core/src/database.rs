//! Database facade: the live collection plus undo/redo history.

use crate::codec;
use crate::collection::RecordStore;
use crate::command::Command;
use crate::config::Preferences;
use crate::error::CoreResult;
use crate::history::{self, HistoryStatus};
use crate::matching::{self, Criterion, MatchContext};
use crate::record::{EntryType, Record};
use safedb_codec::{FieldReader, FieldWriter, FormatVersion};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What [`Database::from_records`] had to fix while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records loaded.
    pub records: usize,
    /// Dependents whose base was missing or not a normal entry, now normal.
    pub demoted: Vec<Uuid>,
    /// Records whose password history was repaired.
    pub repaired_histories: Vec<Uuid>,
    /// Records whose password history was unreadable and reset.
    pub reset_histories: Vec<Uuid>,
    /// Records given a fresh UUID because theirs was nil or duplicated.
    pub reassigned: Vec<Uuid>,
}

impl LoadReport {
    /// Returns true if nothing needed fixing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.demoted.is_empty()
            && self.repaired_histories.is_empty()
            && self.reset_histories.is_empty()
            && self.reassigned.is_empty()
    }
}

/// The main database handle.
///
/// `Database` owns the record collection and the undo and redo stacks.
/// Every change goes through [`Database::execute`], which makes it
/// reversible:
///
/// ```rust
/// use safedb_core::{Command, Database, Preferences, Record};
///
/// let mut db = Database::new(Preferences::default());
/// let mut record = Record::new()?;
/// record.set_title("example")?;
/// let uuid = record.uuid();
///
/// db.execute(Command::add(record))?;
/// assert!(db.find(&uuid).is_some());
/// assert!(db.is_modified());
///
/// db.undo()?;
/// assert!(db.is_empty());
/// assert!(!db.is_modified());
/// # Ok::<(), safedb_core::CoreError>(())
/// ```
///
/// # Dirty tracking
///
/// The database remembers the undo depth at which it was last saved (see
/// [`Database::mark_saved`]). It is modified whenever the current depth
/// differs, so undoing back to the saved state makes it clean again. A
/// saved state that falls off the redo stack can never be reached again.
///
/// Persistence is the caller's business; nothing here writes files on its
/// own.
#[derive(Debug)]
pub struct Database {
    store: RecordStore,
    prefs: Preferences,
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Undo depth matching the saved state, `None` if unreachable.
    saved_depth: Option<usize>,
}

impl Database {
    /// Creates an empty, unmodified database.
    #[must_use]
    pub fn new(prefs: Preferences) -> Self {
        Self {
            store: RecordStore::new(),
            prefs,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            saved_depth: Some(0),
        }
    }

    /// Builds a database from loaded records.
    ///
    /// Dependents are linked to their bases. Dependents whose base is
    /// missing, or is itself a dependent, become normal entries. Password
    /// histories are validated and fixed. Records with a nil or repeated
    /// UUID get a new one. If anything was fixed the database starts out
    /// modified.
    ///
    /// # Errors
    ///
    /// Fails if a record cannot be updated while fixing it.
    pub fn from_records(
        records: Vec<Record>,
        prefs: Preferences,
    ) -> CoreResult<(Self, LoadReport)> {
        let mut report = LoadReport {
            records: records.len(),
            ..LoadReport::default()
        };
        let mut store = RecordStore::new();
        let mut seen = HashSet::with_capacity(records.len());
        let mut dependents = Vec::new();

        for mut record in records {
            match history::validate_record(&mut record)? {
                HistoryStatus::Valid => {}
                HistoryStatus::Invalid => report.reset_histories.push(record.uuid()),
                HistoryStatus::Repaired(_) => report.repaired_histories.push(record.uuid()),
            }
            let uuid = record.uuid();
            if uuid.is_nil() || !seen.insert(uuid) {
                let fresh = record.create_uuid()?;
                warn!(old = %uuid, new = %fresh, "duplicate or missing UUID, reassigned");
                seen.insert(fresh);
                report.reassigned.push(fresh);
            }
            if record.is_dependent() {
                dependents.push(record);
            } else {
                store.insert(record)?;
            }
        }

        for mut record in dependents {
            let uuid = record.uuid();
            let linkable = record
                .base_uuid()
                .filter(|base| *base != uuid)
                .and_then(|base| store.get(&base))
                .is_some_and(|base| base.entry_type().is_normal_family());
            if !linkable {
                warn!(%uuid, base = ?record.base_uuid(), "dependent without usable base, made normal");
                record.set_entry_type(EntryType::Normal)?;
                record.set_base_uuid(None)?;
                report.demoted.push(uuid);
            }
            store.insert(record)?;
        }

        let saved_depth = if report.is_clean() { Some(0) } else { None };
        info!(
            records = report.records,
            demoted = report.demoted.len(),
            repaired = report.repaired_histories.len() + report.reset_histories.len(),
            "database loaded"
        );
        let db = Self {
            store,
            prefs,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            saved_depth,
        };
        Ok((db, report))
    }

    /// Reads every record from `reader` and builds a database.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable record.
    pub fn read<R: FieldReader>(
        reader: R,
        version: FormatVersion,
        prefs: Preferences,
    ) -> CoreResult<(Self, LoadReport)> {
        let records = codec::read_records(reader, version)?;
        Self::from_records(records, prefs)
    }

    /// Writes every record to `writer`, bases before dependents.
    ///
    /// Does not mark the database saved.
    ///
    /// # Errors
    ///
    /// Fails on the first record that cannot be written.
    pub fn write<W: FieldWriter>(&self, mut writer: W, version: FormatVersion) -> CoreResult<()> {
        let (dependents, others): (Vec<&Record>, Vec<&Record>) =
            self.store.iter().partition(|r| r.is_dependent());
        codec::write_records(others.into_iter().chain(dependents), &mut writer, version)
    }

    /// Preferences in effect.
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Replaces the preferences. Existing commands keep what they captured.
    pub fn set_preferences(&mut self, prefs: Preferences) {
        self.prefs = prefs;
    }

    /// The record collection.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Looks a record up by UUID.
    #[must_use]
    pub fn find(&self, uuid: &Uuid) -> Option<&Record> {
        self.store.get(uuid)
    }

    /// Records in UUID order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.store.iter()
    }

    /// Base of a dependent record.
    #[must_use]
    pub fn base_of(&self, record: &Record) -> Option<&Record> {
        self.store.base_of(record)
    }

    /// Records satisfying `criterion` at time `now`.
    pub fn filter<'a>(
        &'a self,
        criterion: &'a Criterion,
        now: i64,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        let prefs = &self.prefs;
        self.store.iter().filter(move |record| {
            matching::matches(record, criterion, &MatchContext::new(prefs, now))
        })
    }

    /// Executes `command` and pushes it onto the undo stack.
    ///
    /// Clears the redo stack.
    ///
    /// # Errors
    ///
    /// A failed command changes nothing and is not recorded.
    pub fn execute(&mut self, mut command: Command) -> CoreResult<()> {
        command.execute(&mut self.store)?;
        debug!(command = command.name(), "executed");
        if self.saved_depth.is_some_and(|depth| depth > self.undo_stack.len()) {
            self.saved_depth = None;
        }
        self.redo_stack.clear();
        self.undo_stack.push(command);
        Ok(())
    }

    /// Undoes the most recent command. Returns false if there was none.
    ///
    /// # Errors
    ///
    /// If the undo fails the command stays on the undo stack.
    pub fn undo(&mut self) -> CoreResult<bool> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.undo(&mut self.store) {
            self.undo_stack.push(command);
            return Err(e);
        }
        debug!(command = command.name(), "undone");
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Re-executes the most recently undone command. Returns false if
    /// there was none.
    ///
    /// # Errors
    ///
    /// If the redo fails the command stays on the redo stack.
    pub fn redo(&mut self) -> CoreResult<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.execute(&mut self.store) {
            self.redo_stack.push(command);
            return Err(e);
        }
        debug!(command = command.name(), "redone");
        self.undo_stack.push(command);
        Ok(true)
    }

    /// Returns true if there is a command to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there is a command to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Empties both stacks without touching the records.
    pub fn clear_history(&mut self) {
        self.saved_depth = if self.is_modified() { None } else { Some(0) };
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Returns true if the records differ from the last saved state.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.saved_depth != Some(self.undo_stack.len())
    }

    /// Records the current state as saved and marks every record clean.
    pub fn mark_saved(&mut self) {
        self.saved_depth = Some(self.undo_stack.len());
        self.store.mark_clean();
    }
}
