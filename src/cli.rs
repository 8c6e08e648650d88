use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_INPUT: &str = "airbnb-property-listings/tabular_data/listing.csv";
pub const DEFAULT_OUTPUT_NAME: &str = "clean_tabular_data.csv";

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean tabular property listing data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Drop unrated listings, normalize descriptions and fill default feature counts
    Clean(CleanArgs),
    /// Report missing values per column and preview the first rows
    Check(CheckArgs),
    /// Write the default cleaning options to a YAML file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input listings file
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    /// Output file (defaults to clean_tabular_data.csv next to the input, '-' for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML file with cleaning options
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Substring identifying rating columns
    #[arg(long = "rating-marker")]
    pub rating_marker: Option<String>,
    /// Column holding the serialized description list
    #[arg(long = "description-column")]
    pub description_column: Option<String>,
    /// Comma-separated columns whose missing values get the default value
    #[arg(long = "default-columns", value_delimiter = ',')]
    pub default_columns: Option<Vec<String>>,
    /// Value used for missing feature counts
    #[arg(long = "default-value")]
    pub default_value: Option<f64>,
    /// Emit the zero-based row position as an unnamed first column
    #[arg(long = "index-column")]
    pub index_column: bool,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

impl CleanArgs {
    pub fn resolved_output(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self
                .input
                .parent()
                .map(|dir| dir.join(DEFAULT_OUTPUT_NAME))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME)),
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Input listings file
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    /// Number of rows to preview
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Destination YAML file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
