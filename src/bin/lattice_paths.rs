//! lattice-paths: discover addressable leaf paths in a JSON/JSONL dataset
//!
//! Usage:
//!   # Flat path list from a file
//!   lattice-paths data.json
//!
//!   # Read from stdin
//!   cat data.json | lattice-paths
//!
//!   # Organized hierarchy as JSON, sampling more list elements
//!   lattice-paths --tree --sample-limit 25 records.jsonl

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use lattice::{discover_paths, FlattenConfig, PathTree, RecordSet, SourceFormat};
use std::fs::File;
use std::io::{BufReader, Read};

#[derive(Parser, Debug)]
#[command(name = "lattice-paths")]
#[command(about = "Discover addressable leaf paths in a JSON/JSONL dataset", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Treat input as newline-delimited JSON regardless of extension
    #[arg(long)]
    jsonl: bool,

    /// Print the organized path hierarchy as JSON instead of a flat list
    #[arg(long)]
    tree: bool,

    /// Number of list elements to sample while discovering paths
    #[arg(long)]
    sample_limit: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let format = source_format(&args.input, args.jsonl);
    let reader = open_input(&args.input)?;
    let set = RecordSet::from_reader(reader, format)?;

    if format == SourceFormat::JsonLines && !set.is_structurally_consistent() {
        eprintln!(
            "⚠ Warning: records have inconsistent structure. Some fields may not be available for all records."
        );
    }

    let mut config = FlattenConfig::default();
    if let Some(limit) = args.sample_limit {
        config.sample_limit = limit;
    }

    let paths = discover_paths(&set, &config);
    if args.tree {
        let tree = PathTree::organize(&paths, set.as_value());
        println!("{}", serde_json::to_string_pretty(&tree.to_value())?);
    } else {
        for path in &paths {
            println!("{}", path);
        }
    }

    Ok(())
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
