//! Export command implementation.

use safedb_codec::{FieldType, FormatVersion};
use safedb_core::export::{self, ExportOptions, FieldSet};
use safedb_core::Preferences;
use std::fs;
use std::path::Path;

/// Runs the export command.
pub fn run(
    path: &Path,
    version: FormatVersion,
    prefs: Preferences,
    format: &str,
    fields: &[String],
    separator: char,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (db, _) = super::open(path, version, prefs)?;
    let options = ExportOptions::new(parse_fields(fields)?).separator(separator);

    let text = match format {
        "xml" => export::export_xml(db.store(), &options)?,
        "text" => export::export_text(db.store(), &options),
        other => return Err(format!("unknown export format '{other}'").into()),
    };

    match output {
        Some(out) => {
            fs::write(out, text)?;
            println!("Exported {} records to {:?}", db.len(), out);
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Resolves field names; an empty list selects every field.
///
/// Names match the display name or the XML element name, ignoring case.
fn parse_fields(names: &[String]) -> Result<FieldSet, Box<dyn std::error::Error>> {
    if names.is_empty() {
        return Ok(FieldSet::all());
    }
    let mut set = FieldSet::empty();
    for name in names {
        let name = name.trim();
        let field = FieldType::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name) || f.xml_name() == name.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown field '{name}'"))?;
        set.insert(field);
    }
    Ok(set)
}
