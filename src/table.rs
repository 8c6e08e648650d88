//! In-memory table model plus the delimited-file loader and writer.
//!
//! A [`Table`] is an ordered list of headers and an ordered list of rows of
//! the same width. Rows can only be appended through [`Table::push_row`],
//! which enforces that width; after that the table is only filtered or
//! mutated cell by cell, so row positions are always contiguous from zero.

use std::{borrow::Cow, fmt, io::Read, io::Write, path::Path};

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use itertools::Itertools;

use crate::io_utils;

/// Field values treated as missing on load, matching the defaults of common
/// dataframe readers.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Interprets one raw field from a delimited file. Non-null fields keep
    /// their exact text so untouched columns are written back byte for byte.
    pub fn from_field(raw: &str) -> Self {
        if NULL_TOKENS.contains(&raw) {
            Cell::Null
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// String form of a non-null cell.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Text(value) => Some(Cow::Borrowed(value)),
            Cell::Number(value) => Some(Cow::Owned(format_number(*value))),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Table::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.headers.len() {
            bail!(
                "Row {} has {} field(s) but the table has {} column(s)",
                self.rows.len(),
                row.len(),
                self.headers.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Positions of every column whose name contains `needle` (case-sensitive).
    pub fn columns_containing(&self, needle: &str) -> Vec<usize> {
        self.headers
            .iter()
            .positions(|header| header.contains(needle))
            .collect()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[idx])
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    pub fn column_mut(&mut self, idx: usize) -> impl Iterator<Item = &mut Cell> + '_ {
        self.rows.iter_mut().map(move |row| &mut row[idx])
    }

    /// Keeps the rows for which `keep` returns true, preserving their order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    pub fn null_counts(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|idx| self.column(idx).filter(|cell| cell.is_null()).count())
            .collect()
    }

    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        Table::read_from(reader, encoding).with_context(|| format!("Loading table from {path:?}"))
    }

    pub fn read_from<R: Read>(
        mut reader: csv::Reader<R>,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        let mut table = Table::new(headers);
        for (idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
            let row = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {}", idx + 2))?
                .iter()
                .map(|field| Cell::from_field(field))
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Writes the header and every row. With `index_column` an unnamed
    /// leading column carries each row's zero-based position.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut csv::Writer<W>,
        index_column: bool,
    ) -> Result<()> {
        let mut header = Vec::with_capacity(self.headers.len() + 1);
        if index_column {
            header.push(String::new());
        }
        header.extend(self.headers.iter().cloned());
        writer.write_record(&header).context("Writing output headers")?;

        for (idx, row) in self.rows.iter().enumerate() {
            let mut fields = Vec::with_capacity(row.len() + 1);
            if index_column {
                fields.push(idx.to_string());
            }
            fields.extend(row.iter().map(Cell::to_string));
            writer
                .write_record(&fields)
                .with_context(|| format!("Writing output row {}", idx + 2))?;
        }
        writer.flush().context("Flushing output writer")?;
        Ok(())
    }

    pub fn save(&self, path: Option<&Path>, delimiter: u8, index_column: bool) -> Result<()> {
        let mut writer = io_utils::open_csv_writer(path, delimiter)?;
        self.write_to(&mut writer, index_column)
    }
}
