//! SafeDB CLI
//!
//! Command-line tools for SafeDB record files.
//!
//! # Commands
//!
//! - `dump` - List the records of a file
//! - `verify` - Load a file and report what needed repair
//! - `convert` - Rewrite a file in another format version
//! - `export` - Write records as delimited text or XML

mod commands;

use clap::{Parser, Subcommand};
use safedb_codec::FormatVersion;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SafeDB command-line record file tools.
#[derive(Parser)]
#[command(name = "safedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Preferences file (JSON)
    #[arg(global = true, long)]
    prefs: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the records of a file
    Dump {
        /// Record file
        file: PathBuf,

        /// Format version of the file (v3, v4)
        #[arg(short = 'V', long, default_value = "v4", value_parser = parse_version)]
        version: FormatVersion,

        /// Maximum number of records to list
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Load a file and report what needed repair
    Verify {
        /// Record file
        file: PathBuf,

        /// Format version of the file (v3, v4)
        #[arg(short = 'V', long, default_value = "v4", value_parser = parse_version)]
        version: FormatVersion,
    },

    /// Rewrite a file in another format version
    Convert {
        /// Input record file
        input: PathBuf,

        /// Output record file
        output: PathBuf,

        /// Format version of the input (v3, v4)
        #[arg(long, default_value = "v3", value_parser = parse_version)]
        from: FormatVersion,

        /// Format version of the output (v3, v4)
        #[arg(long, default_value = "v4", value_parser = parse_version)]
        to: FormatVersion,
    },

    /// Write records as delimited text or XML
    Export {
        /// Record file
        file: PathBuf,

        /// Format version of the file (v3, v4)
        #[arg(short = 'V', long, default_value = "v4", value_parser = parse_version)]
        version: FormatVersion,

        /// Output format (text, xml)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Comma-separated field names to export (default: all)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Column separator for text output
        #[arg(short, long, default_value = "\t")]
        separator: char,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn parse_version(name: &str) -> Result<FormatVersion, String> {
    FormatVersion::parse(name).ok_or_else(|| format!("unknown format version '{name}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let prefs = commands::load_preferences(cli.prefs.as_deref())?;

    match cli.command {
        Commands::Dump {
            file,
            version,
            limit,
            format,
        } => commands::dump::run(&file, version, prefs, limit, &format)?,
        Commands::Verify { file, version } => commands::verify::run(&file, version, prefs)?,
        Commands::Convert {
            input,
            output,
            from,
            to,
        } => commands::convert::run(&input, &output, from, to, prefs)?,
        Commands::Export {
            file,
            version,
            format,
            fields,
            separator,
            output,
        } => commands::export::run(
            &file,
            version,
            prefs,
            &format,
            &fields,
            separator,
            output.as_deref(),
        )?,
        Commands::Version => {
            println!("SafeDB CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
