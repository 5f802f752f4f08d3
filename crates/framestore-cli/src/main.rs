//! CLI tool for inspecting framestore stores.

mod error;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use framestore_core::{FrameData, FrameReader};
use snafu::{ResultExt, ensure};

use crate::{
    error::{
        CliResult, ListCollectionsSnafu, OpenStoreSnafu, ReadEntrySnafu, UnknownCategorySnafu,
        UnknownDatamodelSnafu, join_names,
    },
    render::{COLLECTION_COLUMNS, collection_rows, parameter_rows, render_table},
};

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the file version, datamodels, and categories of a store chain
    Info {
        /// Store directory; repeat to chain several stores in order
        #[arg(long = "store", required = true)]
        stores: Vec<PathBuf>,
    },
    /// Print the collections and parameters of one or more entries
    Dump {
        #[arg(long = "store", required = true)]
        stores: Vec<PathBuf>,

        #[arg(long)]
        category: String,

        /// First entry to print
        #[arg(long, default_value_t = 0)]
        entry: u64,

        /// Number of consecutive entries to print
        #[arg(long, default_value_t = 1)]
        count: u64,

        /// Repeatable; restricts the read to the named collections
        #[arg(long = "collection")]
        collections: Vec<String>,
    },
    /// Print the definition text of a datamodel
    Datamodel {
        #[arg(long = "store", required = true)]
        stores: Vec<PathBuf>,

        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Parser)]
#[command(name = "fsdump", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

fn open_reader(stores: &[PathBuf]) -> CliResult<FrameReader> {
    FrameReader::open_files(stores).context(OpenStoreSnafu {
        stores: join_names(
            &stores
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        ),
    })
}

fn cmd_info(stores: &[PathBuf]) -> CliResult<()> {
    let reader = open_reader(stores)?;

    println!("version: {}", reader.current_file_version());
    println!("datamodels: {}", join_names(&reader.available_datamodels()));

    let rows: Vec<Vec<String>> = reader
        .available_categories()
        .into_iter()
        .map(|name| vec![name.to_string(), reader.entries(name).to_string()])
        .collect();
    println!("{}", render_table(&["category", "entries"], &rows));
    Ok(())
}

fn print_entry(entry: u64, frame: &FrameData) -> CliResult<()> {
    println!("entry {entry}");

    let params = parameter_rows(frame.parameters());
    if !params.is_empty() {
        println!("{}", render_table(&["kind", "key", "values"], &params));
    }

    let collections = collection_rows(frame)?;
    if !collections.is_empty() {
        println!("{}", render_table(&COLLECTION_COLUMNS, &collections));
    }
    Ok(())
}

fn cmd_dump(
    stores: &[PathBuf],
    category: &str,
    entry: u64,
    count: u64,
    collections: &[String],
) -> CliResult<()> {
    let mut reader = open_reader(stores)?;
    let available = reader.available_categories();
    ensure!(
        available.contains(&category),
        UnknownCategorySnafu {
            category,
            available: join_names(&available),
        }
    );

    let total = reader.entries(category);
    let stored = reader
        .collections(category)
        .context(ListCollectionsSnafu { category })?;
    println!(
        "category {category}: {total} entries, collections: {}",
        join_names(&stored.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>())
    );

    let end = entry.saturating_add(count).min(total);
    for index in entry..end {
        let read = if collections.is_empty() {
            reader.read_entry(category, index)
        } else {
            reader.read_entry_with(category, index, collections)
        };
        let frame = read.context(ReadEntrySnafu {
            category,
            entry: index,
        })?;
        if let Some(frame) = frame {
            print_entry(index, &frame)?;
        }
    }

    if entry >= total {
        println!("no entry {entry} in category {category}");
    }
    Ok(())
}

fn cmd_datamodel(stores: &[PathBuf], name: &str) -> CliResult<()> {
    let reader = open_reader(stores)?;
    let available = reader.available_datamodels();
    ensure!(
        available.iter().any(|n| n == name),
        UnknownDatamodelSnafu {
            name,
            available: join_names(&available),
        }
    );

    println!("{}", reader.datamodel_definition(name));
    Ok(())
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Info { stores } => cmd_info(&stores),
        Command::Dump {
            stores,
            category,
            entry,
            count,
            collections,
        } => cmd_dump(&stores, &category, entry, count, &collections),
        Command::Datamodel { stores, name } => cmd_datamodel(&stores, &name),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
