use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use twkb_tools::{decode_geometry_json, format_inspect_pretty, inspect_twkb, parse_hex};

#[derive(Parser)]
#[command(
    name = "twkb-tools",
    version,
    about = "TWKB inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect record structure without decoding the payload.
    Inspect {
        /// Path to the TWKB bytes.
        twkb_path: PathBuf,
        /// Treat the file as hex text instead of raw bytes.
        #[arg(long)]
        hex: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Decode the record into GeoJSON-flavored JSON.
    Decode {
        /// Path to the TWKB bytes.
        twkb_path: PathBuf,
        /// Treat the file as hex text instead of raw bytes.
        #[arg(long)]
        hex: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        write!(f, "{name}")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            twkb_path,
            hex,
            format,
        } => {
            let bytes = read_twkb(&twkb_path, hex)?;
            let report = inspect_twkb(&bytes)?;
            match format {
                OutputFormat::Pretty => print!("{}", format_inspect_pretty(&report)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
        Command::Decode { twkb_path, hex } => {
            let bytes = read_twkb(&twkb_path, hex)?;
            let value = decode_geometry_json(&bytes)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn read_twkb(path: &Path, hex: bool) -> Result<Vec<u8>> {
    if hex {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        parse_hex(&text)
    } else {
        fs::read(path).with_context(|| format!("read {}", path.display()))
    }
}
