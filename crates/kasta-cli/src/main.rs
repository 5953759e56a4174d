//! Kasta CLI - Main entry point
//!
//! Looks up device type schemas and validates or decodes raw attribute
//! payloads from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kasta_core::SchemaRegistry;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "kasta")]
#[command(about = "Kasta device schema registry and attribute decoder")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "kasta.toml", global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known device types
    Types {
        /// Only types whose code or description contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Group by type code prefix
        #[arg(long)]
        by_category: bool,
    },
    /// Show the attributes of a device type
    Describe {
        type_code: String,
        /// Include internal attributes
        #[arg(long)]
        internal: bool,
    },
    /// Decode a JSON attribute payload for display
    Decode {
        type_code: String,
        /// Read the payload from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Validate a JSON attribute payload; exits 1 when invalid
    Validate {
        type_code: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the configured supported types against the registry
    Supported,
    /// Decode a gateway connection bitmask
    Connection {
        /// Raw state, omit for an unreported value
        #[arg(allow_negative_numbers = true)]
        value: Option<i64>,
    },
    /// Decode a socket relay error code
    ErrorType {
        #[arg(allow_negative_numbers = true)]
        code: i64,
    },
    /// Format an RGB triplet as hex; channels are clamped to 0..=255
    Rgb {
        #[arg(allow_negative_numbers = true)]
        r: f64,
        #[arg(allow_negative_numbers = true)]
        g: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("kasta v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config(&args.config)?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    let registry = SchemaRegistry::builtin();

    let outcome = match args.command {
        Command::Types {
            search,
            by_category,
        } => commands::types(&registry, search.as_deref(), by_category, format)?,
        Command::Describe {
            type_code,
            internal,
        } => commands::describe(&registry, &type_code, internal, format)?,
        Command::Decode { type_code, file } => {
            let attrs = commands::read_attributes(file.as_deref())?;
            commands::decode(&registry, &type_code, &attrs, format)?
        }
        Command::Validate { type_code, file } => {
            let attrs = commands::read_attributes(file.as_deref())?;
            commands::validate(&registry, &type_code, &attrs, format)?
        }
        Command::Supported => commands::supported(&registry, &config, format)?,
        Command::Connection { value } => commands::connection(value, format)?,
        Command::ErrorType { code } => commands::error_type(code),
        Command::Rgb { r, g, b } => commands::rgb(r, g, b),
    };

    print!("{}", outcome.output);
    if !outcome.success {
        std::process::exit(1);
    }

    Ok(())
}
