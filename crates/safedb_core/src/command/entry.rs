//! Commands that add, remove or change single entries.

use super::{not_executed, touch};
use crate::collection::RecordStore;
use crate::config::Preferences;
use crate::error::{CoreError, CoreResult};
use crate::history::HistorySettings;
use crate::record::{EntryStatus, EntryType, Record};
use safedb_codec::FieldType;
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Adds a record, linking it to its base if it is a dependent.
#[derive(Debug, Clone)]
pub struct AddEntry {
    record: Record,
    added: Option<Uuid>,
}

impl AddEntry {
    /// Adds `record` as given.
    #[must_use]
    pub fn new(record: Record) -> Self {
        Self {
            record,
            added: None,
        }
    }

    /// Adds `record` as an alias or shortcut of `base`.
    ///
    /// # Errors
    ///
    /// Fails if `entry_type` is not a dependent type.
    pub fn dependent(mut record: Record, entry_type: EntryType, base: Uuid) -> CoreResult<Self> {
        if !entry_type.is_dependent() {
            return Err(CoreError::invalid_operation(format!(
                "cannot add a {entry_type} as a dependent"
            )));
        }
        record.set_entry_type(entry_type)?;
        record.set_base_uuid(Some(base))?;
        record.set_password("")?;
        Ok(Self::new(record))
    }

    /// UUID of the record being added.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.record.uuid()
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let mut record = self.record.clone();
        record.set_status(EntryStatus::Added);
        store.insert(record)?;
        self.added = Some(self.record.uuid());
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let uuid = self.added.ok_or_else(not_executed)?;
        store.remove(&uuid)?;
        self.added = None;
        Ok(())
    }
}

/// Deletes a record. Deleting a base deletes its dependents too.
#[derive(Debug, Clone)]
pub struct DeleteEntry {
    uuid: Uuid,
    /// Removed records, dependents first.
    removed: Vec<Record>,
}

impl DeleteEntry {
    /// Deletes the record with `uuid`.
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            removed: Vec::new(),
        }
    }

    /// Records removed by the last execution, dependents first.
    #[must_use]
    pub fn removed(&self) -> &[Record] {
        &self.removed
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        if !store.contains(&self.uuid) {
            return Err(CoreError::entry_not_found(self.uuid));
        }
        let mut order = store.dependents_of(&self.uuid);
        order.push(self.uuid);

        let mut removed = Vec::with_capacity(order.len());
        for uuid in order {
            match store.remove(&uuid) {
                Ok(record) => removed.push(record),
                Err(e) => {
                    restore(store, removed)?;
                    return Err(e);
                }
            }
        }
        self.removed = removed;
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        if self.removed.is_empty() {
            return Err(not_executed());
        }
        restore(store, std::mem::take(&mut self.removed))
    }
}

/// Reinserts removed records, bases before their dependents.
fn restore(store: &mut RecordStore, removed: Vec<Record>) -> CoreResult<()> {
    for record in removed.into_iter().rev() {
        store.insert(record)?;
    }
    Ok(())
}

/// Replaces a whole record.
#[derive(Debug, Clone)]
pub struct EditEntry {
    record: Record,
    previous: Option<Record>,
}

impl EditEntry {
    /// Replaces the record sharing `record`'s UUID.
    #[must_use]
    pub fn new(record: Record) -> Self {
        Self {
            record,
            previous: None,
        }
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let mut record = self.record.clone();
        if let Some(current) = store.get(&record.uuid()) {
            record.set_status(current.status());
        }
        touch(&mut record);
        self.previous = Some(store.replace(record)?);
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let previous = self.previous.as_ref().ok_or_else(not_executed)?;
        store.replace(previous.clone())?;
        self.previous = None;
        Ok(())
    }
}

/// Sets one field from its text form.
///
/// Setting the password is an [`UpdatePassword`]: history is kept and a
/// dependent's base is changed.
#[derive(Clone)]
pub struct UpdateField {
    uuid: Uuid,
    field: FieldType,
    value: Zeroizing<String>,
    settings: HistorySettings,
    now: i64,
    previous: Option<Record>,
}

impl UpdateField {
    /// Sets `field` of record `uuid` to `value`; `now` resolves `"now"` in
    /// time fields and stamps password changes.
    #[must_use]
    pub fn new(uuid: Uuid, field: FieldType, value: &str, prefs: &Preferences, now: i64) -> Self {
        Self {
            uuid,
            field,
            value: Zeroizing::new(value.to_owned()),
            settings: prefs.history_settings(),
            now,
            previous: None,
        }
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        if self.field == FieldType::Password {
            let mut update =
                UpdatePassword::with_settings(self.uuid, &self.value, self.settings, self.now);
            update.execute(store)?;
            self.previous = update.previous;
            return Ok(());
        }
        let mut record = store
            .get(&self.uuid)
            .ok_or_else(|| CoreError::entry_not_found(self.uuid))?
            .clone();
        record.set_field_value(self.field, &self.value, self.now)?;
        touch(&mut record);
        self.previous = Some(store.replace(record)?);
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let previous = self.previous.as_ref().ok_or_else(not_executed)?;
        store.replace(previous.clone())?;
        self.previous = None;
        Ok(())
    }
}

impl fmt::Debug for UpdateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateField")
            .field("uuid", &self.uuid)
            .field("field", &self.field)
            .field("value", &"[REDACTED]")
            .field("executed", &self.previous.is_some())
            .finish()
    }
}

/// Changes a password, keeping history and updating modification and
/// expiry times.
///
/// For an alias or shortcut the change is applied to its base.
#[derive(Clone)]
pub struct UpdatePassword {
    uuid: Uuid,
    password: Zeroizing<String>,
    settings: HistorySettings,
    now: i64,
    previous: Option<Record>,
}

impl UpdatePassword {
    /// Sets the password of record `uuid` at time `now`.
    ///
    /// History defaults are taken from `prefs` now, not at execution.
    #[must_use]
    pub fn new(uuid: Uuid, password: &str, prefs: &Preferences, now: i64) -> Self {
        Self::with_settings(uuid, password, prefs.history_settings(), now)
    }

    pub(super) fn with_settings(
        uuid: Uuid,
        password: &str,
        settings: HistorySettings,
        now: i64,
    ) -> Self {
        Self {
            uuid,
            password: Zeroizing::new(password.to_owned()),
            settings,
            now,
            previous: None,
        }
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let record = store
            .get(&self.uuid)
            .ok_or_else(|| CoreError::entry_not_found(self.uuid))?;
        let target = match store.base_of(record) {
            Some(base) => base,
            None if record.is_dependent() => {
                return Err(CoreError::invalid_dependency(format!(
                    "base of {} is missing",
                    self.uuid
                )))
            }
            None => record,
        };
        let mut updated = target.clone();
        updated.update_password(&self.password, &self.settings, self.now)?;
        touch(&mut updated);
        self.previous = Some(store.replace(updated)?);
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let previous = self.previous.as_ref().ok_or_else(not_executed)?;
        store.replace(previous.clone())?;
        self.previous = None;
        Ok(())
    }
}

impl fmt::Debug for UpdatePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdatePassword")
            .field("uuid", &self.uuid)
            .field("password", &"[REDACTED]")
            .field("settings", &self.settings)
            .field("now", &self.now)
            .field("executed", &self.previous.is_some())
            .finish()
    }
}
