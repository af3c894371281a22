//! CLI command implementations.
//!
//! Each command reports its own failure as a single `ERROR:` line on
//! stderr and returns the process exit status.

use ipp_assembler::{Assembly, Stats};
use ipp_common::{exit, InstructionRecord, Program};
use std::fmt::Display;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

/// What `parse` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// XML program document.
    Xml,
    /// Canonical IPPcode18 text.
    Listing,
}

/// A statistic `parse` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Instructions,
    Comments,
}

fn fail(code: i32, message: impl Display) -> i32 {
    eprintln!("ERROR: {message}");
    code
}

/// Read `path`, or standard input when there is none.
fn read_source(path: Option<&Path>) -> Result<String, i32> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            fail(
                exit::INPUT_FILE,
                format!("cannot read '{}': {e}", path.display()),
            )
        }),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| fail(exit::INPUT_FILE, format!("cannot read standard input: {e}")))?;
            Ok(text)
        }
    }
}

fn assemble(path: Option<&Path>) -> Result<Assembly, i32> {
    let text = read_source(path)?;
    let assembly = ipp_assembler::assemble(&text).map_err(|e| fail(e.exit_code(), &e))?;
    debug!(source = ?path, instructions = assembly.records.len(), "loaded source");
    Ok(assembly)
}

fn load_xml(path: &Path) -> Result<Vec<InstructionRecord>, i32> {
    let text = read_source(Some(path))?;
    let records = ipp_assembler::from_xml(&text).map_err(|e| fail(e.exit_code(), &e))?;
    debug!(source = %path.display(), instructions = records.len(), "loaded XML");
    Ok(records)
}

fn load(path: &Path, xml: bool) -> Result<Program, i32> {
    let records = if xml {
        load_xml(path)?
    } else {
        assemble(Some(path))?.records
    };
    ipp_verifier::verify(&records).map_err(|e| fail(e.exit_code(), &e))
}

/// Verify and execute a program against stdin/stdout. `xml` selects the
/// XML program format over IPPcode18 text.
pub fn run(source: &Path, xml: bool) -> Result<(), i32> {
    let program = load(source, xml)?;
    ipp_vm::run(&program).map_err(|e| fail(e.exit_code(), &e))
}

/// Check IPPcode18 text from `source` (stdin when `None`) and print it in
/// `format`, optionally writing statistics in `order`.
pub fn parse(
    source: Option<&Path>,
    format: Format,
    stats_file: Option<&Path>,
    order: &[StatKind],
) -> Result<(), i32> {
    let assembly = assemble(source)?;

    if let Some(path) = stats_file {
        if !order.is_empty() {
            write_stats(path, &assembly.stats, order)?;
        }
    }

    let rendered = match format {
        Format::Xml => {
            ipp_assembler::to_xml(&assembly.records).map_err(|e| fail(e.exit_code(), &e))?
        }
        Format::Listing => ipp_assembler::disassemble(&assembly.records),
    };
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| fail(exit::INTERNAL, format!("cannot write output: {e}")))
}

fn write_stats(path: &Path, stats: &Stats, order: &[StatKind]) -> Result<(), i32> {
    let content: String = order
        .iter()
        .map(|kind| match kind {
            StatKind::Instructions => format!("{}\n", stats.instructions),
            StatKind::Comments => format!("{}\n", stats.comments),
        })
        .collect();

    fs::write(path, content).map_err(|e| {
        fail(
            exit::OUTPUT_FILE,
            format!("cannot write statistics to '{}': {e}", path.display()),
        )
    })
}
