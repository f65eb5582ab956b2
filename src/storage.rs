//! CSV storage for URL tables and product records.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{ProductRecord, ProductRow, UrlTable, PRODUCT_COLUMNS, URL_COLUMN};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory for {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to flush {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no {column:?} column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Write the URL table as a one-column CSV, replacing any existing file.
pub fn write_urls(path: &Path, urls: &UrlTable) -> Result<(), StorageError> {
    let mut writer = open_writer(path)?;
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record([URL_COLUMN]).map_err(write_err)?;
    for url in urls.iter() {
        writer.write_record([url]).map_err(write_err)?;
    }

    flush(writer, path)
}

/// Read product URLs from the `Product URL` column of a CSV file.
///
/// Other columns are ignored. Rows are returned in file order, duplicates
/// included, so each row yields one record downstream.
pub fn read_urls(path: &Path) -> Result<Vec<String>, StorageError> {
    let read_err = |source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let column = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .position(|h| h.trim() == URL_COLUMN)
        .ok_or_else(|| StorageError::MissingColumn {
            path: path.to_path_buf(),
            column: URL_COLUMN,
        })?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        if let Some(url) = record.get(column) {
            urls.push(url.to_string());
        }
    }

    Ok(urls)
}

/// Write product records with the fixed ten-column header.
///
/// The header is written even when there are no records.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> Result<(), StorageError> {
    let mut writer = open_writer(path)?;
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(PRODUCT_COLUMNS).map_err(write_err)?;
    for record in records {
        writer
            .serialize(ProductRow::from(record))
            .map_err(write_err)?;
    }

    flush(writer, path)
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    }

    csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn flush(mut writer: csv::Writer<fs::File>, path: &Path) -> Result<(), StorageError> {
    writer.flush().map_err(|source| StorageError::Flush {
        path: path.to_path_buf(),
        source,
    })
}
