use crate::domain::listing::{canonical_id, NormalizedListing, STORE_COLUMNS};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no ID column")]
    MissingIdColumn { path: PathBuf },
}

/// Handle to the flat CSV file holding every listing seen so far.
/// Single writer; runs must not overlap.
#[derive(Clone, Debug)]
pub struct ListingStore {
    path: PathBuf,
}

impl ListingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    /// Canonical ids of every readable row, in file order. Rows that do not
    /// parse or have an empty id are skipped. A row with the wrong number of
    /// fields still counts as long as its id cell is there.
    pub fn load_ids(&self) -> Result<Vec<String>, StoreError> {
        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| self.csv_err(e))?.clone();
        let id_col = headers
            .iter()
            .position(|h| h.trim() == STORE_COLUMNS[0])
            .ok_or_else(|| StoreError::MissingIdColumn {
                path: self.path.clone(),
            })?;

        let mut ids = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let row = line + 2;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!(row, error = %e, "skipping unreadable store row");
                    continue;
                }
            };

            if record.len() != headers.len() {
                warn!(row, fields = record.len(), expected = headers.len(), "malformed store row");
            }

            match record.get(id_col).map(canonical_id) {
                Some(id) if !id.is_empty() => ids.push(id),
                _ => warn!(row, "skipping store row without ID"),
            }
        }

        Ok(ids)
    }

    pub fn load_id_set(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self.load_ids()?.into_iter().collect())
    }

    /// Writes a fresh store: header plus `rows`.
    pub fn create(&self, rows: &[&NormalizedListing]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| self.csv_err(e))?;

        writer
            .write_record(STORE_COLUMNS)
            .map_err(|e| self.csv_err(e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| self.csv_err(e))?;
        }
        writer.flush().map_err(|e| self.io_err(e))?;
        Ok(())
    }

    /// Appends `rows` after the existing content without touching it.
    pub fn append(&self, rows: &[&NormalizedListing]) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        if !ends_with_newline(&mut file).map_err(|e| self.io_err(e))? {
            file.write_all(b"\n").map_err(|e| self.io_err(e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for row in rows {
            writer.serialize(row).map_err(|e| self.csv_err(e))?;
        }
        writer.flush().map_err(|e| self.io_err(e))?;
        Ok(())
    }
}

/// An empty file counts as terminated.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
