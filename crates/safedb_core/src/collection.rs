//! The live record collection and its dependency index.

use crate::error::{CoreError, CoreResult};
use crate::record::{EntryStatus, EntryType, Record};
use crate::resolver;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use uuid::Uuid;

/// Records keyed by UUID, plus the alias and shortcut links between them.
///
/// Every mutation keeps three things consistent: a dependent's base exists
/// and is in the normal family, the index lists exactly the dependents
/// present, and each base's entry type reflects its dependent counts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordStore {
    records: BTreeMap<Uuid, Record>,
    aliases: BTreeMap<Uuid, BTreeSet<Uuid>>,
    shortcuts: BTreeMap<Uuid, BTreeSet<Uuid>>,
}

impl RecordStore {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by UUID.
    #[must_use]
    pub fn get(&self, uuid: &Uuid) -> Option<&Record> {
        self.records.get(uuid)
    }

    /// Returns true if a record with this UUID exists.
    #[must_use]
    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.records.contains_key(uuid)
    }

    /// Records in UUID order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Base of a dependent record, if it is present.
    #[must_use]
    pub fn base_of(&self, record: &Record) -> Option<&Record> {
        if !record.is_dependent() {
            return None;
        }
        record.base_uuid().and_then(|uuid| self.records.get(&uuid))
    }

    /// Aliases of `base`.
    pub fn aliases_of(&self, base: &Uuid) -> impl Iterator<Item = &Uuid> {
        self.aliases.get(base).into_iter().flatten()
    }

    /// Shortcuts of `base`.
    pub fn shortcuts_of(&self, base: &Uuid) -> impl Iterator<Item = &Uuid> {
        self.shortcuts.get(base).into_iter().flatten()
    }

    /// All dependents of `base`, aliases first.
    #[must_use]
    pub fn dependents_of(&self, base: &Uuid) -> Vec<Uuid> {
        self.aliases_of(base)
            .chain(self.shortcuts_of(base))
            .copied()
            .collect()
    }

    fn dependent_count(&self, base: &Uuid) -> usize {
        self.aliases.get(base).map_or(0, BTreeSet::len)
            + self.shortcuts.get(base).map_or(0, BTreeSet::len)
    }

    fn index_for(&mut self, entry_type: EntryType) -> Option<&mut BTreeMap<Uuid, BTreeSet<Uuid>>> {
        match entry_type {
            EntryType::Alias => Some(&mut self.aliases),
            EntryType::Shortcut => Some(&mut self.shortcuts),
            _ => None,
        }
    }

    /// Checks that `record` may be stored under its UUID as a dependent,
    /// returning its base UUID.
    fn check_dependent(&self, record: &Record) -> CoreResult<Uuid> {
        let uuid = record.uuid();
        let base_uuid = record.base_uuid().ok_or_else(|| {
            CoreError::invalid_dependency(format!("{} {uuid} has no base", record.entry_type()))
        })?;
        let base = self.records.get(&base_uuid).ok_or_else(|| {
            CoreError::invalid_dependency(format!("base {base_uuid} of {uuid} does not exist"))
        })?;
        resolver::check_link(uuid, base)?;
        if self.dependent_count(&uuid) != 0 {
            return Err(CoreError::invalid_dependency(format!(
                "{uuid} has dependents and cannot become a {}",
                record.entry_type()
            )));
        }
        Ok(base_uuid)
    }

    fn link(&mut self, uuid: Uuid, entry_type: EntryType, base: Uuid) {
        if let Some(index) = self.index_for(entry_type) {
            index.entry(base).or_default().insert(uuid);
        }
        self.refresh_base_type(base);
    }

    fn unlink(&mut self, uuid: Uuid, entry_type: EntryType, base: Option<Uuid>) {
        let Some(base) = base else { return };
        if let Some(index) = self.index_for(entry_type) {
            if let Some(set) = index.get_mut(&base) {
                set.remove(&uuid);
                if set.is_empty() {
                    index.remove(&base);
                }
            }
        }
        self.refresh_base_type(base);
    }

    fn refresh_base_type(&mut self, base: Uuid) {
        let aliases = self.aliases.get(&base).map_or(0, BTreeSet::len);
        let shortcuts = self.shortcuts.get(&base).map_or(0, BTreeSet::len);
        if let Some(record) = self.records.get_mut(&base) {
            if record.entry_type().is_normal_family() {
                let entry_type = resolver::base_type_for(aliases, shortcuts);
                if record.entry_type() != entry_type {
                    debug!(uuid = %base, from = %record.entry_type(), to = %entry_type, "base type changed");
                    record.set_entry_type_raw(entry_type);
                }
            }
        }
    }

    /// Adds a record.
    ///
    /// A dependent is linked to its base, promoting the base. A normal
    /// family record gets the entry type its current dependents imply.
    ///
    /// # Errors
    ///
    /// Fails, leaving the collection unchanged, on a nil or duplicate UUID
    /// or an invalid dependency.
    pub fn insert(&mut self, mut record: Record) -> CoreResult<()> {
        let uuid = record.uuid();
        if uuid.is_nil() {
            return Err(CoreError::invalid_operation("record has no UUID"));
        }
        if self.records.contains_key(&uuid) {
            return Err(CoreError::DuplicateEntry { uuid });
        }
        let base = if record.is_dependent() {
            Some(self.check_dependent(&record)?)
        } else {
            None
        };
        let entry_type = record.entry_type();
        if entry_type.is_normal_family() {
            record.set_entry_type_raw(EntryType::Normal);
        }
        self.records.insert(uuid, record);
        match base {
            Some(base) => self.link(uuid, entry_type, base),
            None => self.refresh_base_type(uuid),
        }
        Ok(())
    }

    /// Removes a record, demoting its base if it was the last dependent.
    ///
    /// # Errors
    ///
    /// Fails if the record does not exist or still has dependents.
    pub fn remove(&mut self, uuid: &Uuid) -> CoreResult<Record> {
        if !self.records.contains_key(uuid) {
            return Err(CoreError::entry_not_found(*uuid));
        }
        if self.dependent_count(uuid) != 0 {
            return Err(CoreError::invalid_dependency(format!(
                "{uuid} still has dependents"
            )));
        }
        let record = self
            .records
            .remove(uuid)
            .ok_or_else(|| CoreError::entry_not_found(*uuid))?;
        if record.is_dependent() {
            self.unlink(*uuid, record.entry_type(), record.base_uuid());
        }
        Ok(record)
    }

    /// Replaces the record with the same UUID, returning the old one.
    ///
    /// The new record may change its own type between normal and
    /// dependent; links are moved accordingly.
    ///
    /// # Errors
    ///
    /// Fails, leaving the collection unchanged, if no record has the UUID
    /// or the new dependency is invalid.
    pub fn replace(&mut self, mut record: Record) -> CoreResult<Record> {
        let uuid = record.uuid();
        let (old_type, old_base) = match self.records.get(&uuid) {
            Some(old) => (old.entry_type(), old.base_uuid()),
            None => return Err(CoreError::entry_not_found(uuid)),
        };
        let new_base = if record.is_dependent() {
            Some(self.check_dependent(&record)?)
        } else {
            None
        };
        let new_type = record.entry_type();
        if new_type.is_normal_family() {
            record.set_entry_type_raw(EntryType::Normal);
        }

        let old = self
            .records
            .insert(uuid, record)
            .ok_or_else(|| CoreError::entry_not_found(uuid))?;
        if old_type.is_dependent() {
            self.unlink(uuid, old_type, old_base);
        }
        match new_base {
            Some(base) => self.link(uuid, new_type, base),
            None => self.refresh_base_type(uuid),
        }
        Ok(old)
    }

    /// Resets every record's status to [`EntryStatus::Clean`].
    pub(crate) fn mark_clean(&mut self) {
        for record in self.records.values_mut() {
            record.set_status(EntryStatus::Clean);
        }
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.aliases.clear();
        self.shortcuts.clear();
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::collections::btree_map::Values<'a, Uuid, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(title: &str) -> Record {
        let mut r = Record::new().unwrap();
        r.set_title(title).unwrap();
        r
    }

    fn dependent(entry_type: EntryType, base: Uuid) -> Record {
        let mut r = Record::new().unwrap();
        r.set_entry_type(entry_type).unwrap();
        r.set_base_uuid(Some(base)).unwrap();
        r
    }

    #[test]
    fn insert_and_get() {
        let mut store = RecordStore::new();
        let r = normal("a");
        let id = r.uuid();
        store.insert(r).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().title(), "a");
        assert!(matches!(
            store.insert(store.get(&id).unwrap().clone()),
            Err(CoreError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn base_types_follow_dependents() {
        let mut store = RecordStore::new();
        let base = normal("base");
        let base_id = base.uuid();
        store.insert(base).unwrap();

        let sc = dependent(EntryType::Shortcut, base_id);
        let sc_id = sc.uuid();
        store.insert(sc).unwrap();
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::ShortcutBase);

        let alias = dependent(EntryType::Alias, base_id);
        let alias_id = alias.uuid();
        store.insert(alias).unwrap();
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::AliasBase);
        assert_eq!(store.dependents_of(&base_id), vec![alias_id, sc_id]);

        store.remove(&alias_id).unwrap();
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::ShortcutBase);
        store.remove(&sc_id).unwrap();
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::Normal);
    }

    #[test]
    fn dependency_violations() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.insert(dependent(EntryType::Alias, Uuid::new_v4())),
            Err(CoreError::InvalidDependency { .. })
        ));

        let base = normal("base");
        let base_id = base.uuid();
        store.insert(base).unwrap();
        let alias = dependent(EntryType::Alias, base_id);
        let alias_id = alias.uuid();
        store.insert(alias).unwrap();

        // Chained dependency.
        assert!(store.insert(dependent(EntryType::Shortcut, alias_id)).is_err());
        // A base with dependents cannot be removed on its own.
        assert!(store.remove(&base_id).is_err());

        let mut self_ref = Record::new().unwrap();
        let id = self_ref.uuid();
        self_ref.set_entry_type(EntryType::Alias).unwrap();
        self_ref.set_base_uuid(Some(id)).unwrap();
        assert!(store.insert(self_ref).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_moves_links() {
        let mut store = RecordStore::new();
        let base = normal("base");
        let base_id = base.uuid();
        store.insert(base).unwrap();
        let other = normal("other");
        let other_id = other.uuid();
        store.insert(other.clone()).unwrap();

        let mut linked = other;
        linked.set_entry_type(EntryType::Alias).unwrap();
        linked.set_base_uuid(Some(base_id)).unwrap();
        let old = store.replace(linked).unwrap();
        assert_eq!(old.entry_type(), EntryType::Normal);
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::AliasBase);

        store.replace(old).unwrap();
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::Normal);
        assert_eq!(store.get(&other_id).unwrap().entry_type(), EntryType::Normal);
        assert!(store.dependents_of(&base_id).is_empty());
    }

    #[test]
    fn base_cannot_become_dependent() {
        let mut store = RecordStore::new();
        let a = normal("a");
        let a_id = a.uuid();
        let b = normal("b");
        let b_id = b.uuid();
        store.insert(a).unwrap();
        store.insert(b).unwrap();
        store.insert(dependent(EntryType::Alias, a_id)).unwrap();

        let mut a_as_alias = store.get(&a_id).unwrap().clone();
        a_as_alias.set_entry_type(EntryType::Alias).unwrap();
        a_as_alias.set_base_uuid(Some(b_id)).unwrap();
        assert!(store.replace(a_as_alias).is_err());
        assert_eq!(store.get(&a_id).unwrap().entry_type(), EntryType::AliasBase);
    }
}
