//! Dump command implementation.

use safedb_codec::FormatVersion;
use safedb_core::{Database, Preferences, Record};
use serde::Serialize;
use std::path::Path;

/// Record summary for output. Never includes secrets.
#[derive(Debug, Serialize)]
pub struct RecordInfo {
    /// Record UUID.
    pub uuid: String,
    /// Entry type.
    pub entry_type: String,
    /// Group path.
    pub group: String,
    /// Title.
    pub title: String,
    /// User name.
    pub user: String,
    /// Base UUID of an alias or shortcut.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Number of fields this build does not interpret.
    pub unknown_fields: usize,
    /// Approximate size of the record in bytes.
    pub size: usize,
}

impl RecordInfo {
    fn from_record(record: &Record) -> Self {
        Self {
            uuid: record.uuid().to_string(),
            entry_type: record.entry_type().to_string(),
            group: record.group(),
            title: record.title(),
            user: record.user(),
            base: record.base_uuid().map(|u| u.to_string()),
            unknown_fields: record.unknown_fields().len(),
            size: record.entry_size(),
        }
    }
}

/// Runs the dump command.
pub fn run(
    path: &Path,
    version: FormatVersion,
    prefs: Preferences,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (db, _) = super::open(path, version, prefs)?;
    let records = summarize(&db, limit);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            print_text_output(&records);
        }
    }

    Ok(())
}

fn summarize(db: &Database, limit: Option<usize>) -> Vec<RecordInfo> {
    db.records()
        .take(limit.unwrap_or(usize::MAX))
        .map(RecordInfo::from_record)
        .collect()
}

fn print_text_output(records: &[RecordInfo]) {
    println!("{:<36}  {:<13}  {:<24}  {:<16}  UNKNOWN", "UUID", "TYPE", "GROUP/TITLE", "USER");
    println!("{}", "-".repeat(104));
    for r in records {
        let name = if r.group.is_empty() {
            r.title.clone()
        } else {
            format!("{}.{}", r.group, r.title)
        };
        println!(
            "{:<36}  {:<13}  {:<24}  {:<16}  {}",
            r.uuid, r.entry_type, name, r.user, r.unknown_fields
        );
        if let Some(base) = &r.base {
            println!("{:<36}  -> {}", "", base);
        }
    }
    println!();
    println!("Total: {} records", records.len());
}
