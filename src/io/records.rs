//! Text record input.
//!
//! Each data line holds numeric fields separated by whitespace and/or commas.
//! Lines starting with `#` (comments and headers) or `>` (segment headers) and
//! blank lines are skipped. Fields are interpreted positionally according to
//! the [`PointLayout`]; trailing extra fields are ignored. Several sources can
//! be read one after another into the same store.
//!
//! # Examples
//!
//! ```rust
//! use trigrid::core::point_store::PointLayout;
//! use trigrid::io::records::PointReader;
//!
//! let text = "# x y z\n0 0 1\n1,0,2\n\n> next segment\n0 1 3 extra\n";
//! let mut reader = PointReader::new(PointLayout::XYZ);
//! assert_eq!(reader.read("stdin", text.as_bytes()).unwrap(), 3);
//!
//! let points = reader.finish();
//! assert_eq!(points.z(2), Some(3.0));
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::core::point_store::{PointLayout, PointStore, PointStoreError};
use thiserror::Error;

/// Errors raised while reading input records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The source could not be opened or read.
    #[error("{source_name}: {source}")]
    Io {
        /// Name of the input source.
        source_name: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A field could not be parsed as a number.
    #[error("{source_name}:{line}: field {column} ({value:?}) is not a number")]
    InvalidField {
        /// Name of the input source.
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// 1-based field number.
        column: usize,
        /// The offending text.
        value: String,
    },
    /// A field parsed as NaN or infinity.
    #[error("{source_name}:{line}: field {column} ({value:?}) is not finite")]
    NonFinite {
        /// Name of the input source.
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// 1-based field number.
        column: usize,
        /// The offending text.
        value: String,
    },
    /// A record has fewer fields than the layout requires.
    #[error("{source_name}:{line}: expected {expected} fields {layout}, found {found}")]
    TooFewFields {
        /// Name of the input source.
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// Fields required by the layout.
        expected: usize,
        /// Fields present.
        found: usize,
        /// Active layout.
        layout: PointLayout,
    },
    /// The point store is full.
    #[error("{source_name}:{line}: {source}")]
    Capacity {
        /// Name of the input source.
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// Underlying store error.
        source: PointStoreError,
    },
}

/// Splits a data line into fields, or returns `None` for lines to skip.
#[must_use]
pub fn fields(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('>') {
        return None;
    }
    Some(
        trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect(),
    )
}

/// Reads records from one or more sources into a [`PointStore`].
#[derive(Debug)]
pub struct PointReader {
    store: PointStore,
    values: Vec<f64>,
}

impl PointReader {
    /// Creates a reader for `layout` with the default point limit.
    #[must_use]
    pub const fn new(layout: PointLayout) -> Self {
        Self::with_store(PointStore::new(layout))
    }

    /// Creates a reader that appends to `store`.
    #[must_use]
    pub const fn with_store(store: PointStore) -> Self {
        Self {
            store,
            values: Vec::new(),
        }
    }

    /// Points read so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no point has been read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Reads every record of `reader`, naming it `source_name` in errors.
    ///
    /// Returns the number of points read from this source.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] on I/O failure, malformed or non-finite
    /// fields, short records or when the store is full.
    pub fn read<R: BufRead>(&mut self, source_name: &str, reader: R) -> Result<usize, RecordError> {
        let expected = self.store.layout().columns();
        let before = self.store.len();

        for (n, line) in reader.lines().enumerate() {
            let line_no = n + 1;
            let line = line.map_err(|source| RecordError::Io {
                source_name: source_name.to_owned(),
                source,
            })?;
            let Some(fields) = fields(&line) else {
                continue;
            };
            if fields.len() < expected {
                return Err(RecordError::TooFewFields {
                    source_name: source_name.to_owned(),
                    line: line_no,
                    expected,
                    found: fields.len(),
                    layout: self.store.layout(),
                });
            }

            self.values.clear();
            for (column, text) in fields.iter().take(expected).enumerate() {
                let value = text.parse::<f64>().map_err(|_| RecordError::InvalidField {
                    source_name: source_name.to_owned(),
                    line: line_no,
                    column: column + 1,
                    value: (*text).to_owned(),
                })?;
                if !value.is_finite() {
                    return Err(RecordError::NonFinite {
                        source_name: source_name.to_owned(),
                        line: line_no,
                        column: column + 1,
                        value: (*text).to_owned(),
                    });
                }
                self.values.push(value);
            }
            self.store
                .push(&self.values)
                .map_err(|source| RecordError::Capacity {
                    source_name: source_name.to_owned(),
                    line: line_no,
                    source,
                })?;
        }

        let read = self.store.len() - before;
        tracing::debug!(source = source_name, points = read, "read input records");
        Ok(read)
    }

    /// Opens and reads the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_path(&mut self, path: &Path) -> Result<usize, RecordError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| RecordError::Io {
            source_name: name.clone(),
            source,
        })?;
        self.read(&name, BufReader::new(file))
    }

    /// Finishes reading and returns the compacted store.
    #[must_use]
    pub fn finish(mut self) -> PointStore {
        self.store.shrink_to_fit();
        self.store
    }
}
