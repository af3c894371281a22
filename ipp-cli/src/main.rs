//! IPPcode18 CLI: check and run IPPcode18 programs.
//!
//! Exit codes:
//! - 0: Success
//! - 10: Bad command line
//! - 11: Source file cannot be read
//! - 12: Statistics file cannot be written
//! - 21: Source text error
//! - 31/32: Malformed XML document or instruction records
//! - 52-58: Runtime errors
//! - 99: Internal error (output failure)

mod commands;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use commands::StatKind;
use ipp_common::exit;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ipp", version, about = "Interpreter for the IPPcode18 language")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify and execute a program; stdin feeds READ
    Run {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        /// SOURCE is an XML program document instead of IPPcode18 text
        #[arg(long)]
        xml: bool,
    },
    /// Check IPPcode18 text and print it as an XML program document
    Parse {
        /// Read standard input when omitted or '-'
        #[arg(value_name = "SOURCE")]
        source: Option<PathBuf>,
        /// Print the canonical IPPcode18 listing instead of XML
        #[arg(long)]
        listing: bool,
        /// Write statistics to FILE
        #[arg(long, value_name = "FILE")]
        stats: Option<PathBuf>,
        /// Count instructions
        #[arg(long, requires = "stats")]
        loc: bool,
        /// Count comments
        #[arg(long, requires = "stats")]
        comments: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<OsString> = std::env::args_os().collect();
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => usage_error(e),
    };

    let result = match cli.command {
        Commands::Run { source, xml } => commands::run(&source, xml),
        Commands::Parse {
            source,
            listing,
            stats,
            loc,
            comments,
        } => {
            let source = source.filter(|path| path.as_os_str() != "-");
            let order = stat_order(&args, loc, comments);
            let format = if listing {
                commands::Format::Listing
            } else {
                commands::Format::Xml
            };
            commands::parse(source.as_deref(), format, stats.as_deref(), &order)
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Print help/version normally; anything else is one `ERROR:` line.
fn usage_error(e: clap::Error) -> ! {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{e}");
            process::exit(exit::SUCCESS);
        }
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            eprintln!("ERROR: missing command, see 'ipp --help'");
            process::exit(exit::ARGUMENTS);
        }
        _ => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            eprintln!("ERROR: {message}");
            process::exit(exit::ARGUMENTS);
        }
    }
}

/// Statistics in the order their flags appear on the command line.
fn stat_order(args: &[OsString], loc: bool, comments: bool) -> Vec<StatKind> {
    let position = |flag: &str| args.iter().position(|arg| arg == flag);
    let mut order: Vec<(usize, StatKind)> = Vec::new();
    if loc {
        order.extend(position("--loc").map(|p| (p, StatKind::Instructions)));
    }
    if comments {
        order.extend(position("--comments").map(|p| (p, StatKind::Comments)));
    }
    order.sort_by_key(|(p, _)| *p);
    order.into_iter().map(|(_, kind)| kind).collect()
}
