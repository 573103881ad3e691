//! ESRI ASCII grid files.
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcenter     0
//! yllcenter     0
//! cellsize      0.5
//! NODATA_value  -9999
//! 1 2 3 4
//! ...
//! ```
//!
//! `xllcenter`/`yllcenter` mark gridline registration (the lower-left value
//! sits on the region corner); `xllcorner`/`yllcorner` mark pixel registration.
//! Unequal spacing is written as separate `dx` and `dy` keys. Rows run from
//! north to south. NaN nodes are written as the nodata value, and nodata
//! values are read back as NaN.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::grid::{Grid, GridError, GridHeader, Region, Registration};
use thiserror::Error;

/// Nodata value written for NaN nodes.
pub const NODATA_VALUE: f32 = -9999.0;

/// Errors raised while reading or writing grid files.
#[derive(Debug, Error)]
pub enum GridFileError {
    /// The file could not be opened, read or written.
    #[error("{source_name}: {source}")]
    Io {
        /// File or stream name.
        source_name: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A required header key is absent.
    #[error("grid header is missing {key}")]
    MissingHeader {
        /// The missing key.
        key: &'static str,
    },
    /// A header line could not be parsed.
    #[error("line {line}: invalid grid header {text:?}")]
    InvalidHeader {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },
    /// A node value could not be parsed.
    #[error("line {line}: invalid grid value {value:?}")]
    InvalidValue {
        /// 1-based line number.
        line: usize,
        /// The offending text.
        value: String,
    },
    /// The header does not describe a valid grid or the value count is wrong.
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Default)]
struct RawHeader {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<f64>,
    yll: Option<f64>,
    registration: Option<Registration>,
    dx: Option<f64>,
    dy: Option<f64>,
    nodata: Option<f32>,
}

impl RawHeader {
    fn apply(&mut self, key: &str, value: &str) -> Option<()> {
        match key.to_ascii_lowercase().as_str() {
            "ncols" => self.ncols = Some(value.parse().ok()?),
            "nrows" => self.nrows = Some(value.parse().ok()?),
            "xllcenter" | "xllcorner" => {
                self.xll = Some(value.parse().ok()?);
                self.registration = Some(if key.eq_ignore_ascii_case("xllcenter") {
                    Registration::Gridline
                } else {
                    Registration::Pixel
                });
            }
            "yllcenter" | "yllcorner" => self.yll = Some(value.parse().ok()?),
            "cellsize" => {
                let size = value.parse().ok()?;
                self.dx = Some(size);
                self.dy = Some(size);
            }
            "dx" => self.dx = Some(value.parse().ok()?),
            "dy" => self.dy = Some(value.parse().ok()?),
            "nodata_value" => self.nodata = Some(value.parse().ok()?),
            _ => return None,
        }
        Some(())
    }

    fn header(&self) -> Result<GridHeader, GridFileError> {
        let ncols = self.ncols.ok_or(GridFileError::MissingHeader { key: "ncols" })?;
        let nrows = self.nrows.ok_or(GridFileError::MissingHeader { key: "nrows" })?;
        let west = self.xll.ok_or(GridFileError::MissingHeader { key: "xllcorner" })?;
        let south = self.yll.ok_or(GridFileError::MissingHeader { key: "yllcorner" })?;
        let dx = self.dx.ok_or(GridFileError::MissingHeader { key: "cellsize" })?;
        let dy = self.dy.ok_or(GridFileError::MissingHeader { key: "cellsize" })?;
        let registration = self.registration.unwrap_or_default();

        // Gridline grids span one spacing less than their node count
        let spans = |n: usize| {
            #[expect(clippy::cast_precision_loss, reason = "node counts are far below 2^52")]
            let n = n as f64;
            n - 1.0 + registration.offset() * 2.0
        };
        let region = Region::new(west, dx.mul_add(spans(ncols), west), south, dy.mul_add(spans(nrows), south))?;
        let header = GridHeader::new(region, dx, dy, registration)?;
        if header.n_columns() != ncols || header.n_rows() != nrows {
            return Err(GridError::HeaderMismatch {
                expected_columns: ncols,
                expected_rows: nrows,
                found_columns: header.n_columns(),
                found_rows: header.n_rows(),
            }
            .into());
        }
        Ok(header)
    }
}

/// Reads an ESRI ASCII grid from `reader`.
///
/// # Errors
///
/// Returns a [`GridFileError`] for I/O failures, malformed headers or values,
/// or a value count that does not match the header.
pub fn read_grid<R: BufRead>(source_name: &str, reader: R) -> Result<Grid, GridFileError> {
    let mut raw = RawHeader::default();
    let mut data = Vec::new();
    let mut in_header = true;

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| GridFileError::Io {
            source_name: source_name.to_owned(),
            source,
        })?;
        let mut tokens = line.split_whitespace().peekable();
        let Some(first) = tokens.peek().copied() else {
            continue;
        };

        if in_header && first.parse::<f32>().is_err() {
            let value = tokens.nth(1).unwrap_or_default();
            raw.apply(first, value).ok_or_else(|| GridFileError::InvalidHeader {
                line: n + 1,
                text: line.clone(),
            })?;
            continue;
        }
        in_header = false;

        for token in tokens {
            let value: f32 = token.parse().map_err(|_| GridFileError::InvalidValue {
                line: n + 1,
                value: token.to_owned(),
            })?;
            data.push(if Some(value) == raw.nodata { f32::NAN } else { value });
        }
    }

    let grid = Grid::from_data(raw.header()?, data)?;
    tracing::debug!(
        source = source_name,
        columns = grid.header().n_columns(),
        rows = grid.header().n_rows(),
        "read grid"
    );
    Ok(grid)
}

/// Opens and reads the grid at `path`.
///
/// # Errors
///
/// See [`read_grid`].
pub fn load_grid(path: &Path) -> Result<Grid, GridFileError> {
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| GridFileError::Io {
        source_name: name.clone(),
        source,
    })?;
    read_grid(&name, BufReader::new(file))
}

/// Writes `grid` as an ESRI ASCII grid.
///
/// # Errors
///
/// Propagates I/O errors from `out`.
pub fn write_grid<W: Write>(grid: &Grid, mut out: W) -> io::Result<()> {
    let header = grid.header();
    let region = header.region();
    let (x_key, y_key) = match header.registration() {
        Registration::Gridline => ("xllcenter", "yllcenter"),
        Registration::Pixel => ("xllcorner", "yllcorner"),
    };

    writeln!(out, "ncols {}", header.n_columns())?;
    writeln!(out, "nrows {}", header.n_rows())?;
    writeln!(out, "{x_key} {}", region.west)?;
    writeln!(out, "{y_key} {}", region.south)?;
    if header.dx() == header.dy() {
        writeln!(out, "cellsize {}", header.dx())?;
    } else {
        writeln!(out, "dx {}", header.dx())?;
        writeln!(out, "dy {}", header.dy())?;
    }
    writeln!(out, "NODATA_value {NODATA_VALUE}")?;

    for row in grid.data().chunks(header.n_columns()) {
        let mut first = true;
        for value in row {
            if !first {
                out.write_all(b" ")?;
            }
            first = false;
            let value = if value.is_nan() { NODATA_VALUE } else { *value };
            write!(out, "{value}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Writes `grid` to the file at `path`, replacing it.
///
/// # Errors
///
/// Returns [`GridFileError::Io`] if the file cannot be created or written.
pub fn save_grid(grid: &Grid, path: &Path) -> Result<(), GridFileError> {
    let name = path.display().to_string();
    let io_error = |source| GridFileError::Io {
        source_name: name.clone(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_grid(grid, BufWriter::new(file)).map_err(io_error)?;
    tracing::info!(path = %name, "wrote grid");
    Ok(())
}
