//! Verify command implementation.

use safedb_codec::FormatVersion;
use safedb_core::{LoadReport, Preferences};
use std::path::Path;

/// Runs the verify command.
///
/// Fails if the file cannot be read, or if loading had to repair anything.
pub fn run(
    path: &Path,
    version: FormatVersion,
    prefs: Preferences,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying {} file at {:?}", version, path);
    println!();

    let (_, report) = super::open(path, version, prefs)?;
    print_report(&report);

    println!();
    if report.is_clean() {
        println!("✓ Verification passed");
        Ok(())
    } else {
        println!("✗ Verification found problems");
        Err("Verification failed".into())
    }
}

fn print_report(report: &LoadReport) {
    println!("  Records:               {}", report.records);
    println!("  Demoted dependents:    {}", report.demoted.len());
    println!("  Repaired histories:    {}", report.repaired_histories.len());
    println!("  Reset histories:       {}", report.reset_histories.len());
    println!("  Reassigned UUIDs:      {}", report.reassigned.len());
    for uuid in &report.demoted {
        println!("    demoted {uuid}");
    }
    for uuid in report.repaired_histories.iter().chain(&report.reset_histories) {
        println!("    history fixed {uuid}");
    }
    for uuid in &report.reassigned {
        println!("    new UUID {uuid}");
    }
}
