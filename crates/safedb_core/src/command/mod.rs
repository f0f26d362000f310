//! Reversible mutations of the record collection.
//!
//! A [`Command`] snapshots whatever it needs to invert itself while it
//! executes, so `undo` restores the collection exactly. Commands are
//! fail-atomic: a failed `execute` leaves the collection unchanged.
//! Running `undo` before `execute` is an error.

mod composite;
mod entry;
mod link;

pub use composite::Composite;
pub use entry::{AddEntry, DeleteEntry, EditEntry, UpdateField, UpdatePassword};
pub use link::{LinkDependent, UnlinkDependent};

use crate::collection::RecordStore;
use crate::config::Preferences;
use crate::error::{CoreError, CoreResult};
use crate::record::{EntryStatus, EntryType, Record};
use safedb_codec::FieldType;
use uuid::Uuid;

fn not_executed() -> CoreError {
    CoreError::invalid_operation("command has not been executed")
}

/// Flags a record changed by a command. Records added since the last save
/// stay `Added`.
fn touch(record: &mut Record) {
    if record.status() != EntryStatus::Added {
        record.set_status(EntryStatus::Modified);
    }
}

/// A mutation of the record collection.
#[derive(Debug, Clone)]
pub enum Command {
    /// Add a record.
    Add(AddEntry),
    /// Delete a record and its dependents.
    Delete(DeleteEntry),
    /// Replace a whole record.
    Edit(EditEntry),
    /// Set one field from text.
    UpdateField(UpdateField),
    /// Change a password with history.
    UpdatePassword(UpdatePassword),
    /// Make a normal entry a dependent.
    Link(LinkDependent),
    /// Make a dependent a normal entry.
    Unlink(UnlinkDependent),
    /// Several commands as one.
    Composite(Composite),
}

impl Command {
    /// Adds `record`.
    #[must_use]
    pub fn add(record: Record) -> Self {
        Self::Add(AddEntry::new(record))
    }

    /// Adds `record` as an alias or shortcut of `base`.
    ///
    /// # Errors
    ///
    /// Fails if `entry_type` is not Alias or Shortcut.
    pub fn add_dependent(record: Record, entry_type: EntryType, base: Uuid) -> CoreResult<Self> {
        AddEntry::dependent(record, entry_type, base).map(Self::Add)
    }

    /// Deletes record `uuid` and, for a base, its dependents.
    #[must_use]
    pub fn delete(uuid: Uuid) -> Self {
        Self::Delete(DeleteEntry::new(uuid))
    }

    /// Replaces the record with `record`'s UUID.
    #[must_use]
    pub fn edit(record: Record) -> Self {
        Self::Edit(EditEntry::new(record))
    }

    /// Sets `field` of record `uuid` from text.
    ///
    /// A password goes through [`Command::update_password`], so `prefs`
    /// supplies the history defaults.
    #[must_use]
    pub fn update_field(
        uuid: Uuid,
        field: FieldType,
        value: &str,
        prefs: &Preferences,
        now: i64,
    ) -> Self {
        Self::UpdateField(UpdateField::new(uuid, field, value, prefs, now))
    }

    /// Changes the password of record `uuid`.
    #[must_use]
    pub fn update_password(uuid: Uuid, password: &str, prefs: &Preferences, now: i64) -> Self {
        Self::UpdatePassword(UpdatePassword::new(uuid, password, prefs, now))
    }

    /// Links record `uuid` to `base` as `entry_type`.
    #[must_use]
    pub fn link(uuid: Uuid, base: Uuid, entry_type: EntryType) -> Self {
        Self::Link(LinkDependent::new(uuid, base, entry_type))
    }

    /// Unlinks record `uuid` from its base.
    #[must_use]
    pub fn unlink(uuid: Uuid) -> Self {
        Self::Unlink(UnlinkDependent::new(uuid))
    }

    /// Groups `commands` into one.
    #[must_use]
    pub fn composite(commands: Vec<Command>) -> Self {
        Self::Composite(Composite::new(commands))
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add entry",
            Self::Delete(_) => "delete entry",
            Self::Edit(_) => "edit entry",
            Self::UpdateField(_) => "update field",
            Self::UpdatePassword(_) => "update password",
            Self::Link(_) => "link dependent",
            Self::Unlink(_) => "unlink dependent",
            Self::Composite(_) => "composite",
        }
    }

    /// Applies the command.
    ///
    /// # Errors
    ///
    /// Fails, leaving `store` unchanged, if the command cannot be applied.
    pub fn execute(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        match self {
            Self::Add(c) => c.execute(store),
            Self::Delete(c) => c.execute(store),
            Self::Edit(c) => c.execute(store),
            Self::UpdateField(c) => c.execute(store),
            Self::UpdatePassword(c) => c.execute(store),
            Self::Link(c) => c.execute(store),
            Self::Unlink(c) => c.execute(store),
            Self::Composite(c) => c.execute(store),
        }
    }

    /// Reverts the last `execute`.
    ///
    /// # Errors
    ///
    /// Fails if the command has not been executed or `store` no longer
    /// matches the state it left behind.
    pub fn undo(&mut self, store: &mut RecordStore) -> CoreResult<()> {
        match self {
            Self::Add(c) => c.undo(store),
            Self::Delete(c) => c.undo(store),
            Self::Edit(c) => c.undo(store),
            Self::UpdateField(c) => c.undo(store),
            Self::UpdatePassword(c) => c.undo(store),
            Self::Link(c) => c.undo(store),
            Self::Unlink(c) => c.undo(store),
            Self::Composite(c) => c.undo(store),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Command {
                fn from(command: $ty) -> Self {
                    Self::$variant(command)
                }
            }
        )*
    };
}

impl_from! {
    AddEntry => Add,
    DeleteEntry => Delete,
    EditEntry => Edit,
    UpdateField => UpdateField,
    UpdatePassword => UpdatePassword,
    LinkDependent => Link,
    UnlinkDependent => Unlink,
    Composite => Composite,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::PasswordHistory;

    fn store_with(records: Vec<Record>) -> RecordStore {
        let mut store = RecordStore::new();
        for r in records {
            store.insert(r).unwrap();
        }
        store
    }

    fn titled(title: &str) -> Record {
        let mut r = Record::new().unwrap();
        r.set_title(title).unwrap();
        r.set_password(&format!("{title}-pw")).unwrap();
        r
    }

    fn roundtrip(store: &mut RecordStore, mut command: Command) -> Command {
        let before = store.clone();
        command.execute(store).unwrap();
        assert_ne!(*store, before, "{} changed nothing", command.name());
        command.undo(store).unwrap();
        assert_eq!(*store, before, "{} undo", command.name());
        command
    }

    #[test]
    fn undo_restores_every_command() {
        let base = titled("base");
        let base_id = base.uuid();
        let other = titled("other");
        let other_id = other.uuid();
        let mut store = store_with(vec![base.clone(), other]);
        let prefs = Preferences::default();

        roundtrip(&mut store, Command::add(titled("new")));
        roundtrip(
            &mut store,
            Command::add_dependent(titled("alias"), EntryType::Alias, base_id).unwrap(),
        );
        roundtrip(&mut store, Command::delete(other_id));
        let mut edited = base;
        edited.set_url("https://example.org").unwrap();
        roundtrip(&mut store, Command::edit(edited));
        roundtrip(&mut store, Command::update_field(base_id, FieldType::Notes, "hello", &prefs, 0));
        roundtrip(&mut store, Command::update_field(base_id, FieldType::CTime, "now", &prefs, 77));
        roundtrip(&mut store, Command::update_password(base_id, "fresh", &prefs, 1000));
        roundtrip(&mut store, Command::link(other_id, base_id, EntryType::Shortcut));
    }

    #[test]
    fn unlink_copies_base_password() {
        let base = titled("base");
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let mut add = Command::add_dependent(titled("alias"), EntryType::Alias, base_id).unwrap();
        add.execute(&mut store).unwrap();
        let alias_id = match &add {
            Command::Add(a) => a.uuid(),
            _ => unreachable!(),
        };
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::AliasBase);
        assert_eq!(store.get(&alias_id).unwrap().password(), "");

        let before = store.clone();
        let mut unlink = Command::unlink(alias_id);
        unlink.execute(&mut store).unwrap();
        let alias = store.get(&alias_id).unwrap();
        assert_eq!(alias.entry_type(), EntryType::Normal);
        assert_eq!(alias.password(), "base-pw");
        assert_eq!(alias.base_uuid(), None);
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::Normal);

        unlink.undo(&mut store).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn undo_before_execute_fails() {
        let mut store = RecordStore::new();
        for mut command in [
            Command::add(titled("x")),
            Command::delete(Uuid::new_v4()),
            Command::composite(Vec::new()),
        ] {
            assert!(matches!(
                command.undo(&mut store),
                Err(CoreError::InvalidOperation { .. })
            ));
        }
    }

    #[test]
    fn failed_command_changes_nothing() {
        let base = titled("base");
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let before = store.clone();
        let prefs = Preferences::default();

        let failing = [
            Command::delete(Uuid::new_v4()),
            Command::update_field(base_id, FieldType::XTimeInterval, "9999", &prefs, 0),
            Command::update_field(base_id, FieldType::Uuid, "x", &prefs, 0),
            Command::link(base_id, base_id, EntryType::Alias),
            Command::link(base_id, Uuid::new_v4(), EntryType::Alias),
            Command::unlink(base_id),
            Command::add(store.get(&base_id).unwrap().clone()),
        ];
        for mut command in failing {
            assert!(command.execute(&mut store).is_err(), "{}", command.name());
            assert_eq!(store, before, "{}", command.name());
        }
    }

    #[test]
    fn composite_rolls_back_on_failure() {
        let base = titled("base");
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let before = store.clone();

        let mut composite = Command::composite(vec![
            Command::add(titled("one")),
            Command::update_field(base_id, FieldType::Url, "https://a", &Preferences::default(), 0),
            Command::delete(Uuid::new_v4()),
            Command::add(titled("never")),
        ]);
        let err = composite.execute(&mut store).unwrap_err();
        assert!(matches!(err, CoreError::CompositeFailed { index: 2, .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn composite_undo_reverses_all() {
        let base = titled("base");
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let sc = titled("shortcut");
        let sc_id = sc.uuid();
        let composite = Command::composite(vec![
            Command::add_dependent(sc, EntryType::Shortcut, base_id).unwrap(),
            Command::update_field(sc_id, FieldType::Title, "renamed", &Preferences::default(), 0),
        ]);
        let mut composite = roundtrip(&mut store, composite);
        composite.execute(&mut store).unwrap();
        assert_eq!(store.get(&sc_id).unwrap().title(), "renamed");
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::ShortcutBase);
    }

    #[test]
    fn failed_composite_undo_leaves_it_applied() {
        let mut store = RecordStore::new();
        let original = store.clone();
        let a = titled("a");
        let a_id = a.uuid();
        let prefs = Preferences::default();
        let mut composite = Command::composite(vec![
            Command::add(a),
            Command::update_field(a_id, FieldType::Notes, "n", &prefs, 0),
        ]);
        composite.execute(&mut store).unwrap();

        // A dependent added behind the command's back blocks undoing the add.
        let mut alias = titled("alias");
        alias.set_entry_type(EntryType::Alias).unwrap();
        alias.set_base_uuid(Some(a_id)).unwrap();
        alias.set_password("").unwrap();
        let alias_id = alias.uuid();
        store.insert(alias).unwrap();
        let blocked = store.clone();

        assert!(composite.undo(&mut store).is_err());
        assert_eq!(store, blocked);
        assert_eq!(store.get(&a_id).unwrap().notes(), "n");

        store.remove(&alias_id).unwrap();
        composite.undo(&mut store).unwrap();
        assert_eq!(store, original);
    }

    #[test]
    fn delete_base_cascades() {
        let base = titled("base");
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let mut alias = titled("alias");
        alias.set_entry_type(EntryType::Alias).unwrap();
        alias.set_base_uuid(Some(base_id)).unwrap();
        let mut sc = titled("sc");
        sc.set_entry_type(EntryType::Shortcut).unwrap();
        sc.set_base_uuid(Some(base_id)).unwrap();
        store.insert(alias).unwrap();
        store.insert(sc).unwrap();
        let before = store.clone();

        let mut delete = Command::delete(base_id);
        delete.execute(&mut store).unwrap();
        assert!(store.is_empty());
        if let Command::Delete(d) = &delete {
            assert_eq!(d.removed().len(), 3);
        }
        delete.undo(&mut store).unwrap();
        assert_eq!(store, before);
        assert_eq!(store.get(&base_id).unwrap().entry_type(), EntryType::AliasBase);
    }

    #[test]
    fn password_field_update_keeps_history() {
        let mut base = titled("base");
        base.set_pmtime(500).unwrap();
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let prefs = Preferences::default();

        let before = store.clone();
        let mut update = Command::update_field(base_id, FieldType::Password, "new", &prefs, 1_000_000);
        update.execute(&mut store).unwrap();
        let updated = store.get(&base_id).unwrap();
        assert_eq!(updated.password(), "new");
        assert_eq!(updated.pmtime(), 1_000_000);
        let history = PasswordHistory::parse(&updated.pw_history()).unwrap();
        assert_eq!(history.entries.len(), 1);
        assert_eq!(history.entries[0].password, "base-pw");
        update.undo(&mut store).unwrap();
        assert_eq!(store, before);

        let mut add = Command::add_dependent(titled("alias"), EntryType::Alias, base_id).unwrap();
        add.execute(&mut store).unwrap();
        let alias_id = match &add {
            Command::Add(a) => a.uuid(),
            _ => unreachable!(),
        };
        let before = store.clone();
        let mut update = Command::update_field(alias_id, FieldType::Password, "via alias", &prefs, 2_000_000);
        update.execute(&mut store).unwrap();
        let base = store.get(&base_id).unwrap();
        assert_eq!(base.password(), "via alias");
        assert_eq!(base.pmtime(), 2_000_000);
        assert_eq!(PasswordHistory::parse(&base.pw_history()).unwrap().entries.len(), 1);
        assert_eq!(store.get(&alias_id).unwrap().password(), "");
        update.undo(&mut store).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn password_update_through_alias_hits_base() {
        let mut base = titled("base");
        base.set_pmtime(500).unwrap();
        let base_id = base.uuid();
        let mut store = store_with(vec![base]);
        let mut add = Command::add_dependent(titled("alias"), EntryType::Alias, base_id).unwrap();
        add.execute(&mut store).unwrap();
        let alias_id = match &add {
            Command::Add(a) => a.uuid(),
            _ => unreachable!(),
        };

        let prefs = Preferences::default();
        let mut update = Command::update_password(alias_id, "rotated", &prefs, 2000);
        update.execute(&mut store).unwrap();
        let base = store.get(&base_id).unwrap();
        assert_eq!(base.password(), "rotated");
        assert_eq!(base.pmtime(), 2000);
        let history = PasswordHistory::parse(&base.pw_history()).unwrap();
        assert_eq!(history.entries.len(), 1);
        assert_eq!(history.entries[0].password, "base-pw");
        assert_eq!(history.entries[0].changed, 500);
        assert_eq!(store.get(&alias_id).unwrap().password(), "");
    }
}
