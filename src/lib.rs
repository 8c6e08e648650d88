pub mod clean;
pub mod cli;
pub mod config;
pub mod error;
pub mod io_utils;
pub mod literal;
pub mod report;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{CheckArgs, CleanArgs, Cli, Commands, ConfigArgs},
    config::CleanOptions,
    table::Table,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("listing_clean", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Check(args) => handle_check(&args),
        Commands::Config(args) => handle_config(&args),
    }
}

fn resolve_options(args: &CleanArgs) -> Result<CleanOptions> {
    let mut options = match &args.config {
        Some(path) => {
            CleanOptions::load(path).with_context(|| format!("Loading options from {path:?}"))?
        }
        None => CleanOptions::default(),
    };
    if let Some(marker) = &args.rating_marker {
        options.rating_marker = marker.clone();
    }
    if let Some(column) = &args.description_column {
        options.description_column = column.clone();
    }
    if let Some(columns) = &args.default_columns {
        options.default_columns = columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();
    }
    if let Some(value) = args.default_value {
        options.default_value = value;
    }
    options.validate()?;
    Ok(options)
}

fn handle_clean(args: &CleanArgs) -> Result<()> {
    let options = resolve_options(args)?;
    debug!("Cleaning options: {options:?}");

    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output = args.resolved_output();
    let output_delimiter =
        io_utils::resolve_output_delimiter(Some(output.as_path()), args.output_delimiter, delimiter);
    info!(
        "Cleaning '{}' -> '{}' (delimiter '{}', output '{}')",
        args.input.display(),
        output.display(),
        printable_delimiter(delimiter),
        printable_delimiter(output_delimiter)
    );

    let table = Table::load(&args.input, delimiter, encoding)?;
    let loaded = table.row_count();
    let cleaned = clean::clean(table, &options);
    cleaned
        .save(Some(output.as_path()), output_delimiter, args.index_column)
        .with_context(|| format!("Writing cleaned table to {output:?}"))?;
    info!(
        "Kept {} of {} row(s) -> {}",
        cleaned.row_count(),
        loaded,
        if io_utils::is_dash(&output) {
            "stdout".to_string()
        } else {
            output.display().to_string()
        }
    );
    Ok(())
}

fn handle_check(args: &CheckArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let table = Table::load(&args.input, delimiter, encoding)?;

    print!("{}", report::render_null_summary(&report::null_summary(&table)));
    println!();
    print!("{}", report::render_preview(&table, args.rows));
    info!(
        "Checked {} row(s) across {} column(s) in {:?}",
        table.row_count(),
        table.headers().len(),
        args.input
    );
    Ok(())
}

fn handle_config(args: &ConfigArgs) -> Result<()> {
    CleanOptions::default()
        .save(&args.output)
        .with_context(|| format!("Writing options to {:?}", args.output))?;
    info!("Default cleaning options written to {:?}", args.output);
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
