//! Commands that turn entries into dependents and back.

use super::{not_executed, touch};
use crate::collection::RecordStore;
use crate::error::{CoreError, CoreResult};
use crate::record::{EntryType, Record};
use uuid::Uuid;

/// Makes a normal entry an alias or shortcut of `base`.
///
/// The entry's own password is dropped; it reads its base's from then on.
#[derive(Debug, Clone)]
pub struct LinkDependent {
    uuid: Uuid,
    base: Uuid,
    entry_type: EntryType,
    previous: Option<Record>,
}

impl LinkDependent {
    /// Links record `uuid` to `base` as `entry_type`.
    #[must_use]
    pub fn new(uuid: Uuid, base: Uuid, entry_type: EntryType) -> Self {
        Self {
            uuid,
            base,
            entry_type,
            previous: None,
        }
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        if !self.entry_type.is_dependent() {
            return Err(CoreError::invalid_operation(format!(
                "cannot link as a {}",
                self.entry_type
            )));
        }
        let current = store
            .get(&self.uuid)
            .ok_or_else(|| CoreError::entry_not_found(self.uuid))?;
        if current.is_dependent() {
            return Err(CoreError::invalid_dependency(format!(
                "{} is already a {}",
                self.uuid,
                current.entry_type()
            )));
        }
        let mut linked = current.clone();
        linked.set_entry_type(self.entry_type)?;
        linked.set_base_uuid(Some(self.base))?;
        linked.set_password("")?;
        touch(&mut linked);
        self.previous = Some(store.replace(linked)?);
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let previous = self.previous.as_ref().ok_or_else(not_executed)?;
        store.replace(previous.clone())?;
        self.previous = None;
        Ok(())
    }
}

/// Turns an alias or shortcut back into a normal entry.
///
/// The entry keeps a copy of its base's current password.
#[derive(Debug, Clone)]
pub struct UnlinkDependent {
    uuid: Uuid,
    previous: Option<Record>,
}

impl UnlinkDependent {
    /// Unlinks record `uuid` from its base.
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            previous: None,
        }
    }

    pub(super) fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let current = store
            .get(&self.uuid)
            .ok_or_else(|| CoreError::entry_not_found(self.uuid))?;
        if !current.is_dependent() {
            return Err(CoreError::invalid_dependency(format!(
                "{} is not an alias or shortcut",
                self.uuid
            )));
        }
        let password = store
            .base_of(current)
            .map(Record::password)
            .unwrap_or_default();
        let mut normal = current.clone();
        normal.set_entry_type(EntryType::Normal)?;
        normal.set_base_uuid(None)?;
        normal.set_password(&password)?;
        touch(&mut normal);
        self.previous = Some(store.replace(normal)?);
        Ok(())
    }

    pub(super) fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        let previous = self.previous.as_ref().ok_or_else(not_executed)?;
        store.replace(previous.clone())?;
        self.previous = None;
        Ok(())
    }
}
