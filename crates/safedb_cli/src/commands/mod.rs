//! CLI command implementations.

pub mod convert;
pub mod dump;
pub mod export;
pub mod verify;

use safedb_codec::{FormatVersion, TlvReader};
use safedb_core::{Database, LoadReport, Preferences};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads preferences from a JSON file, or returns the defaults.
pub fn load_preferences(path: Option<&Path>) -> Result<Preferences, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
        None => Ok(Preferences::default()),
    }
}

/// Loads every record of a record file.
pub fn open(
    path: &Path,
    version: FormatVersion,
    prefs: Preferences,
) -> Result<(Database, LoadReport), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("record file not found: {}", path.display()).into());
    }
    let reader = TlvReader::new(BufReader::new(File::open(path)?));
    Ok(Database::read(reader, version, prefs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn preferences_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"password_history_default_max": 7}}"#).unwrap();
        let prefs = load_preferences(Some(file.path())).unwrap();
        assert_eq!(prefs.password_history_default_max, 7);
        assert!(prefs.save_password_history);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open(&dir.path().join("none.dat"), FormatVersion::V4, Preferences::default());
        assert!(result.is_err());
    }
}
