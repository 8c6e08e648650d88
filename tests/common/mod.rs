#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const LISTING_HEADER: &str =
    "ID,Title,Description,guests,beds,bathrooms,Price_Night,Cleanliness_rating,Accuracy_rating,bedrooms";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a listing export made of `LISTING_HEADER` and `rows`.
    pub fn write_listing(&self, name: &str, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(LISTING_HEADER);
        contents.push('\n');
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        self.write(name, &contents)
    }
}

/// Reads a delimited file back into its header and rows.
pub fn read_rows(path: &Path, delimiter: u8) -> (Vec<String>, Vec<Vec<String>>) {
    let text = fs::read_to_string(path).expect("read output");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (headers, rows)
}

pub fn column(headers: &[String], rows: &[Vec<String>], name: &str) -> Vec<String> {
    let idx = headers
        .iter()
        .position(|header| header == name)
        .unwrap_or_else(|| panic!("column '{name}' missing"));
    rows.iter().map(|row| row[idx].clone()).collect()
}
