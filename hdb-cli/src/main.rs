//! CLI for inspecting HANA wire protocol part headers.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::missing_docs_in_private_items
)]

mod header;
mod scan;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use hdb_proto::{PartAttributes, PartKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hdbpart", version, about = "Inspect and build HANA part headers")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a 16-byte part header given as hex.
    Decode(header::DecodeArgs),

    /// Encode a part header and print it as hex.
    Encode(header::EncodeArgs),

    /// Walk a raw capture of consecutive parts and list their headers.
    Scan(scan::ScanArgs),

    /// List known part kinds.
    Kinds {
        /// Output format.
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Explain a part attribute byte.
    Attrs {
        /// Attribute byte, decimal or 0x-prefixed hex.
        #[arg(value_parser = parse_byte)]
        byte: u8,
    },

    /// Generate shell completion scripts.
    #[command(hide = true)]
    Completion {
        /// Target shell.
        shell: Shell,
    },
}

/// Output format for decode/list commands.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// Machine-readable JSON.
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = cli.dispatch() {
        eprintln!("hdbpart: {e:#}");
        std::process::exit(1);
    }
}

/// Installs a stderr subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Filter directives for the library and this binary's own targets.
fn default_directives(level: &str) -> String {
    format!("hdb_proto={level},{}={level}", env!("CARGO_CRATE_NAME"))
}

impl Cli {
    fn dispatch(self) -> Result<()> {
        match self.command {
            Command::Decode(args) => header::decode(&args),
            Command::Encode(args) => header::encode(&args),
            Command::Scan(args) => scan::scan(&args),
            Command::Kinds { format } => kinds(format),
            Command::Attrs { byte } => {
                explain_attrs(PartAttributes::from_bits(byte));
                Ok(())
            }
            Command::Completion { shell } => {
                clap_complete::generate(shell, &mut Self::command(), "hdbpart", &mut std::io::stdout());
                Ok(())
            }
        }
    }
}

fn kinds(format: OutputFormat) -> Result<()> {
    if matches!(format, OutputFormat::Json) {
        let list: Vec<_> = PartKind::known()
            .map(|(kind, name)| serde_json::json!({ "code": kind.code(), "name": name }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{:>5}  NAME", "CODE");
    for (kind, name) in PartKind::known() {
        println!("{:>5}  {name}", kind.code());
    }
    Ok(())
}

fn explain_attrs(attrs: PartAttributes) {
    println!("bits:             {:#04x}", attrs.bits());
    println!("flags:            {attrs}");
    println!("last packet:      {}", attrs.last_packet());
    println!("resultset closed: {}", attrs.resultset_closed());
    println!("no rows:          {}", attrs.no_rows());
    let unknown = attrs.unknown_bits();
    if unknown != 0 {
        println!("unknown bits:     {unknown:#04x}");
    }
}

/// Parses a byte given in decimal or `0x` hex.
pub(crate) fn parse_byte(s: &str) -> Result<u8> {
    let text = s.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid byte: {text:?}"))
}
