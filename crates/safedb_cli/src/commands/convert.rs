//! Convert command implementation.

use safedb_codec::{FormatVersion, TlvWriter};
use safedb_core::Preferences;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Runs the convert command.
///
/// Converting to V3 drops fields V3 cannot hold, such as attachments and
/// passkeys.
pub fn run(
    input: &Path,
    output: &Path,
    from: FormatVersion,
    to: FormatVersion,
    prefs: Preferences,
) -> Result<(), Box<dyn std::error::Error>> {
    let (db, report) = super::open(input, from, prefs)?;
    if !report.is_clean() {
        println!("Note: input needed repair, run `verify` for details");
    }

    let mut writer = TlvWriter::new(BufWriter::new(File::create(output)?));
    db.write(&mut writer, to)?;
    writer.flush()?;

    println!(
        "Converted {} records from {} to {}: {:?}",
        db.len(),
        from,
        to,
        output
    );
    Ok(())
}
