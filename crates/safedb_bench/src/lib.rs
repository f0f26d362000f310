//! Benchmark utilities.

use rand::distributions::Alphanumeric;
use rand::Rng;
use safedb_codec::{FormatVersion, TlvWriter};
use safedb_core::{Command, Database, EntryType, Preferences, Record};
use uuid::Uuid;

/// Generate a random alphanumeric string of the specified length.
pub fn random_text(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a normal record with random text fields.
pub fn random_record(notes_len: usize) -> Record {
    let mut record = Record::new().expect("Failed to create record");
    record.set_group(&format!("group.{}", random_text(4))).expect("Failed to set group");
    record.set_title(&random_text(12)).expect("Failed to set title");
    record.set_user(&random_text(8)).expect("Failed to set user");
    record.set_password(&random_text(16)).expect("Failed to set password");
    record.set_url(&format!("https://{}.example", random_text(8))).expect("Failed to set URL");
    record.set_notes(&random_text(notes_len)).expect("Failed to set notes");
    record.set_ctime(1_700_000_000).expect("Failed to set ctime");
    record
}

/// Generate `count` records where every tenth record past the first is an
/// alias of the first.
pub fn generate_records(count: usize) -> Vec<Record> {
    let mut records: Vec<Record> = (0..count).map(|_| random_record(64)).collect();
    if let Some(base) = records.first().map(Record::uuid) {
        for record in records.iter_mut().skip(1).step_by(10) {
            record.set_entry_type(EntryType::Alias).expect("Failed to set entry type");
            record.set_base_uuid(Some(base)).expect("Failed to set base");
            record.set_password("").expect("Failed to clear password");
        }
    }
    records
}

/// Build a database holding [`generate_records`]`(count)`.
pub fn populated_database(count: usize) -> (Database, Vec<Uuid>) {
    let (db, _) = Database::from_records(generate_records(count), Preferences::default())
        .expect("Failed to build database");
    let ids = db.records().map(Record::uuid).collect();
    (db, ids)
}

/// Serialize every record of `db` to an in-memory buffer.
pub fn encode_database(db: &Database, version: FormatVersion) -> Vec<u8> {
    let mut writer = TlvWriter::new(Vec::new());
    db.write(&mut writer, version).expect("Failed to write records");
    writer.into_inner()
}

/// A command adding a fresh random record.
pub fn add_command() -> Command {
    Command::add(random_record(32))
}
