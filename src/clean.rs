//! The cleaning stages and the pipeline that runs them in order:
//!
//! 1. [`drop_missing_ratings()`] removes rows lacking any rating value;
//!    [`try_drop_missing_ratings()`] does the same but returns the error.
//! 2. [`normalize_descriptions()`] turns serialized description lists into
//!    plain text and drops rows left without a description.
//! 3. [`fill_default_features()`] fills missing feature counts with a constant.
//!
//! Each stage takes the table by value and hands it back; rows are only ever
//! removed (order preserved) or mutated in place. Missing columns are logged
//! as warnings and the stage continues with whatever data it has.
//!
//! [`normalize_descriptions()`] is one-shot: run on its own output, the
//! already joined text no longer parses as a list and every row is dropped.

use itertools::{Either, Itertools};
use log::{debug, info, warn};

use crate::{
    config::CleanOptions,
    error::CleanError,
    literal::{self, Fragment},
    table::{Cell, Table},
};

const RATINGS_STAGE: &str = "ratings";
const DESCRIPTION_STAGE: &str = "description";
const DEFAULTS_STAGE: &str = "defaults";

pub fn clean(table: Table, options: &CleanOptions) -> Table {
    let table = drop_missing_ratings(table, &options.rating_marker);
    let table = normalize_descriptions(table, &options.description_column);
    fill_default_features(table, &options.default_columns, options.default_value)
}

/// Positions of the columns whose name contains `marker`.
pub fn rating_columns(table: &Table, marker: &str) -> Result<Vec<usize>, CleanError> {
    let columns = table.columns_containing(marker);
    if columns.is_empty() {
        return Err(CleanError::missing_column(
            RATINGS_STAGE,
            format!("*{marker}*"),
        ));
    }
    Ok(columns)
}

/// Drops every row with a null in any rating column. Without rating columns
/// the table is returned unchanged.
pub fn drop_missing_ratings(table: Table, marker: &str) -> Table {
    match try_drop_missing_ratings(&table, marker) {
        Ok(filtered) => filtered,
        Err(err) => {
            warn!("{err}; keeping all {} row(s)", table.row_count());
            table
        }
    }
}

/// Like [`drop_missing_ratings()`], but reports a table without rating
/// columns as [`CleanError::MissingColumn`].
pub fn try_drop_missing_ratings(table: &Table, marker: &str) -> Result<Table, CleanError> {
    let columns = rating_columns(table, marker)?;
    debug!(
        "Rating columns: {:?}",
        columns
            .iter()
            .map(|&idx| table.headers()[idx].as_str())
            .collect::<Vec<_>>()
    );

    let mut filtered = table.clone();
    filtered.retain_rows(|row| columns.iter().all(|&idx| !row[idx].is_null()));
    info!(
        "Dropped {} row(s) with missing ratings across {} column(s); {} remain",
        table.row_count() - filtered.row_count(),
        columns.len(),
        filtered.row_count()
    );
    Ok(filtered)
}

pub fn normalize_descriptions(mut table: Table, column: &str) -> Table {
    let Some(idx) = table.column_index(column) else {
        warn!(
            "{}; descriptions left as-is",
            CleanError::missing_column(DESCRIPTION_STAGE, column)
        );
        return table;
    };

    let before = table.row_count();
    table.retain_rows(|row| !row[idx].is_null());
    let with_value = table.row_count();

    let mut malformed = 0usize;
    for (row, cell) in table.column_mut(idx).enumerate() {
        let fragments = match parse_description(row, cell) {
            Ok(fragments) => fragments,
            Err(err) => {
                warn!("{err}");
                malformed += 1;
                Vec::new()
            }
        };
        *cell = match strip_heading(compact(fragments)) {
            Some(body) => Cell::Text(join(&body)),
            None => Cell::Null,
        };
    }
    table.retain_rows(|row| !row[idx].is_null());

    info!(
        "Normalized '{column}': {} row(s) without a value, {} malformed, {} empty after the heading; {} remain",
        before - with_value,
        malformed,
        with_value - malformed - table.row_count(),
        table.row_count()
    );
    table
}

fn parse_description(row: usize, cell: &Cell) -> Result<Vec<Fragment>, CleanError> {
    let Some(text) = cell.as_text() else {
        return Ok(Vec::new());
    };
    literal::parse_fragment_list(&text).map_err(|source| CleanError::MalformedDescription {
        row,
        value: text.into_owned(),
        source,
    })
}

/// Removes `None` and empty entries.
pub fn compact(fragments: Vec<Fragment>) -> Vec<String> {
    fragments
        .into_iter()
        .flatten()
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Drops the leading heading entry by position, whatever it says.
///
/// Returns `None` when there is nothing to drop or nothing is left after the
/// drop; such rows carry no description.
pub fn strip_heading(mut fragments: Vec<String>) -> Option<Vec<String>> {
    if fragments.is_empty() {
        return None;
    }
    fragments.remove(0);
    (!fragments.is_empty()).then_some(fragments)
}

pub fn join(fragments: &[String]) -> String {
    fragments.concat()
}

/// Checks that every column in `names` exists.
pub fn require_columns(
    table: &Table,
    stage: &'static str,
    names: &[String],
) -> Result<Vec<usize>, CleanError> {
    let (present, missing): (Vec<usize>, Vec<String>) =
        names.iter().partition_map(|name| match table.column_index(name) {
            Some(idx) => Either::Left(idx),
            None => Either::Right(name.clone()),
        });
    if missing.is_empty() {
        Ok(present)
    } else {
        Err(CleanError::MissingColumn {
            stage,
            columns: missing,
        })
    }
}

pub fn fill_default_features(mut table: Table, columns: &[String], value: f64) -> Table {
    let present = match require_columns(&table, DEFAULTS_STAGE, columns) {
        Ok(present) => present,
        Err(err) => {
            warn!("{err}; filling the remaining column(s)");
            columns
                .iter()
                .filter_map(|name| table.column_index(name))
                .collect()
        }
    };

    let mut filled = 0usize;
    for idx in present {
        for cell in table.column_mut(idx).filter(|cell| cell.is_null()) {
            *cell = Cell::Number(value);
            filled += 1;
        }
    }
    info!("Filled {filled} missing feature value(s) with {value}");
    table
}
