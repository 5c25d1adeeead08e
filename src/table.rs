//! CSV input and result output for a screening run.

use crate::screening::record::{
    ArticleRecord,
    Classification,
    ABSTRACT_COLUMN,
    AUTHOR_COLUMN,
    REQUIRED_COLUMNS,
    RESULT_COLUMNS,
    TITLE_COLUMN,
    YEAR_COLUMN,
};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Appended to the input file stem to name the result file.
pub const RESULT_SUFFIX: &str = "_result";

const UTF8_BOM: char = '\u{feff}';

// Staged result files are hidden until renamed into place.
const TEMP_PREFIX: &str = ".sr_automator_";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// File missing, unreadable, not UTF-8, or rows of unequal length.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: &'static str, path: PathBuf },
    #[error("expected {expected} classifications, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("failed to encode result table: {0}")]
    Encode(#[from] csv::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RequiredColumns {
    title: usize,
    author: usize,
    year: usize,
    abstract_text: usize,
}

/// A header row plus data rows, held in source order.
#[derive(Clone, Debug)]
pub struct ReviewTable {
    source: PathBuf,
    headers: StringRecord,
    rows: Vec<StringRecord>,
    columns: RequiredColumns,
}

impl ReviewTable {
    /// Reads a UTF-8 CSV whose first row is the header.
    ///
    /// Blocking; call through `spawn_blocking` from async code.
    pub fn read(path: &Path) -> Result<Self, TableError> {
        let read_err = |source: csv::Error| TableError::Read {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(path)
            .map_err(read_err)?;

        let headers: StringRecord = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .enumerate()
            .map(|(i, name)| if i == 0 { name.trim_start_matches(UTF8_BOM) } else { name })
            .collect();

        let columns = RequiredColumns {
            title: Self::position(&headers, TITLE_COLUMN, path)?,
            author: Self::position(&headers, AUTHOR_COLUMN, path)?,
            year: Self::position(&headers, YEAR_COLUMN, path)?,
            abstract_text: Self::position(&headers, ABSTRACT_COLUMN, path)?,
        };

        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;

        crate::info!(
            path = %path.display(),
            rows = rows.len(),
            columns = headers.len(),
            "loaded review table"
        );
        Ok(Self {
            source: path.to_path_buf(),
            headers,
            rows,
            columns,
        })
    }

    fn position(
        headers: &StringRecord,
        column: &'static str,
        path: &Path,
    ) -> Result<usize, TableError> {
        debug_assert!(REQUIRED_COLUMNS.contains(&column));
        headers
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| TableError::MissingColumn {
                column,
                path: path.to_path_buf(),
            })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Articles in file order.
    pub fn records(&self) -> impl Iterator<Item = ArticleRecord> + '_ {
        self.rows.iter().map(|row| {
            let cell = |i: usize| row.get(i).unwrap_or_default().to_string();
            ArticleRecord {
                title: cell(self.columns.title),
                author: cell(self.columns.author),
                year: cell(self.columns.year),
                abstract_text: cell(self.columns.abstract_text),
            }
        })
    }

    /// Header row of the result file: the input header followed by any result
    /// column it does not already have, plus the index each result column is written to.
    fn result_layout(&self) -> (StringRecord, [usize; 3]) {
        let mut headers = self.headers.clone();
        let mut positions = [0; 3];
        for (slot, column) in positions.iter_mut().zip(RESULT_COLUMNS) {
            *slot = match headers.iter().position(|name| name == column) {
                Some(existing) => existing,
                None => {
                    headers.push_field(column);
                    headers.len() - 1
                }
            };
        }
        (headers, positions)
    }

    /// Serializes the table with one classification per row.
    pub fn to_result_csv(&self, classifications: &[Classification]) -> Result<Vec<u8>, TableError> {
        if classifications.len() != self.rows.len() {
            return Err(TableError::RowCount {
                expected: self.rows.len(),
                actual: classifications.len(),
            });
        }
        let (headers, positions) = self.result_layout();
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&headers)?;

        for (row, classification) in self.rows.iter().zip(classifications) {
            let mut fields: Vec<&str> = row.iter().collect();
            fields.resize(headers.len(), "");
            for (position, value) in positions.iter().zip(classification.columns()) {
                fields[*position] = value;
            }
            writer.write_record(&fields)?;
        }

        writer
            .into_inner()
            .map_err(|e| TableError::Encode(csv::Error::from(e.into_error())))
    }

    /// Writes the result table to `path`.
    ///
    /// The table is encoded in memory, written to a temporary file next to `path`
    /// and renamed over it. On any failure `path` is left as it was and the
    /// temporary file is removed.
    ///
    /// Blocking; call through `spawn_blocking` from async code.
    pub fn write_with_classifications(
        &self,
        path: &Path,
        classifications: &[Classification],
    ) -> Result<(), TableError> {
        let bytes = self.to_result_csv(classifications)?;
        let write_err = |source: std::io::Error| TableError::Write {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(write_err)?;
        staged.write_all(&bytes).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        staged.persist(path).map_err(|e| write_err(e.error))?;
        crate::info!(path = %path.display(), rows = self.rows.len(), "wrote result table");
        Ok(())
    }
}

/// `<dir>/<stem>_result.<ext>` for an input at `<dir>/<stem>.<ext>`.
pub fn result_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}{RESULT_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{RESULT_SUFFIX}"),
    };
    input.with_file_name(file_name)
}
