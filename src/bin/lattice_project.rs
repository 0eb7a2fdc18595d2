//! lattice-project: project selected paths into a flat table
//!
//! Usage:
//!   # One row per record, columns in selection order, as JSON Lines
//!   lattice-project data.json --select doc=data.doc_id --select ne=data.sentence.NE
//!
//!   # Bare paths label themselves with the last segment
//!   lattice-project records.jsonl --select data.doc_id,data.sentence.text
//!
//!   # Write to a file instead of stdout
//!   lattice-project data.json --select id=data.id --output table.jsonl

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use lattice::{ensure_selection, PathDescriptor, RecordSet, SourceFormat, Table, TableWriter};
use std::fs::File;
use std::io::{BufReader, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "lattice-project")]
#[command(about = "Project selected paths of a JSON/JSONL dataset into a flat table", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Treat input as newline-delimited JSON regardless of extension
    #[arg(long)]
    jsonl: bool,

    /// Columns to project, as LABEL=PATH (or a bare PATH, labeled by its
    /// last segment); repeatable or comma-separated
    #[arg(long, short = 's', value_name = "LABEL=PATH", value_delimiter = ',')]
    select: Vec<String>,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let selected: Vec<PathDescriptor> = args.select.iter().map(|s| parse_selection(s)).collect();
    ensure_selection(&selected)?;

    let format = source_format(&args.input, args.jsonl);
    let reader = open_input(&args.input)?;
    let set = RecordSet::from_reader(reader, format)?;
    let table = Table::project(&set, &selected);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = TableWriter::new(sink);
    writer.write_table(&table)?;
    writer.flush()?;

    Ok(())
}

fn parse_selection(raw: &str) -> PathDescriptor {
    match raw.split_once('=') {
        Some((label, path)) => PathDescriptor::new(label.trim(), path.trim()),
        None => PathDescriptor::from_path(raw.trim()),
    }
}

fn source_format(input: &Option<String>, jsonl: bool) -> SourceFormat {
    if jsonl {
        SourceFormat::JsonLines
    } else {
        input
            .as_deref()
            .map(SourceFormat::from_path)
            .unwrap_or(SourceFormat::Json)
    }
}

fn open_input(input: &Option<String>) -> Result<Box<dyn Read>> {
    Ok(match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(std::io::stdin()),
    })
}
