//! Time series of density-matrix element values.
//!
//! A [`DensityTable`] is either parsed from a whitespace-delimited text
//! file (`time p11 p12 p21 p22` per line) or synthesized as a demo data
//! set. Row `i` drives animation frame `i`.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::{
    config::Config,
    types::{Element, FrameIndex},
};

/// Number of rows in the synthetic demo table.
pub const SYNTHETIC_ROWS: usize = 1000;
/// Time step between synthetic rows.
pub const SYNTHETIC_TIME_STEP: f64 = 0.01;
/// Constant value of both off-diagonal elements in the synthetic table.
pub const SYNTHETIC_COHERENCE: f64 = 0.1;

/// Time column plus the four element columns.
const MIN_COLUMNS: usize = 5;

/// One time sample of the four density-matrix element values.
///
/// ### Fields
/// - `time` - Sample time, shown in the status bar only.
/// - `p11`, `p12`, `p21`, `p22` - Element magnitudes, nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityRow {
    pub time: f64,
    pub p11: f64,
    pub p12: f64,
    pub p21: f64,
    pub p22: f64,
}

impl DensityRow {
    /// Value of the given element in this row.
    pub fn value(&self, element: Element) -> f64 {
        match element {
            Element::OneOne => self.p11,
            Element::OneTwo => self.p12,
            Element::TwoOne => self.p21,
            Element::TwoTwo => self.p22,
        }
    }
}

/// Returned by [`DensityTable::load`] when the input path does not exist.
///
/// Kept as its own type so the binary can report it as a plain message
/// instead of an error chain.
#[derive(Debug)]
pub struct MissingInputFile {
    pub path: PathBuf,
}

impl fmt::Display for MissingInputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not find input file {}", self.path.display())
    }
}

impl std::error::Error for MissingInputFile {}

/// Immutable, chronologically ordered table of [`DensityRow`]s.
///
/// Row order is frame order and the row count is the frame count. No
/// ordering or range check is applied to the values themselves.
///
/// ### Fields
/// - `rows` - The samples, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityTable {
    rows: Vec<DensityRow>,
}

impl DensityTable {
    /// Wraps already parsed rows without further checks.
    pub fn from_rows(rows: Vec<DensityRow>) -> Self {
        Self { rows }
    }

    /// Builds the demo data set used when no input file is given.
    ///
    /// Populations oscillate in antiphase, `p11 = (1 + cos t) / 2` and
    /// `p22 = (1 - cos t) / 2`, while both coherences stay at
    /// [`SYNTHETIC_COHERENCE`].
    pub fn synthetic() -> Self {
        let rows = (0..SYNTHETIC_ROWS)
            .map(|k| {
                let time = k as f64 * SYNTHETIC_TIME_STEP;
                let c = time.cos();
                DensityRow {
                    time,
                    p11: (1.0 + c) / 2.0,
                    p12: SYNTHETIC_COHERENCE,
                    p21: SYNTHETIC_COHERENCE,
                    p22: (1.0 - c) / 2.0,
                }
            })
            .collect();

        Self { rows }
    }

    /// Loads the file named in `cfg`, or synthesizes the demo table if
    /// there is none.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        match &cfg.input {
            Some(path) => Self::load(path),
            None => {
                let table = Self::synthetic();
                info!(rows = table.len(), "Using synthetic demo data");
                Ok(table)
            }
        }
    }

    /// Reads and parses a whitespace-delimited table from `path`.
    ///
    /// ### Errors
    /// - [`MissingInputFile`] if `path` does not exist.
    /// - A parse error naming the offending line for malformed content.
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MissingInputFile {
                path: path.to_path_buf(),
            }
            .into());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        let table = Self::parse(&text)
            .with_context(|| format!("Failed to parse input file {}", path.display()))?;

        info!(path = %path.display(), rows = table.len(), "Loaded input table");
        Ok(table)
    }

    /// Parses whitespace-separated numeric rows.
    ///
    /// Blank lines and everything after a `#` are ignored. Each remaining
    /// line needs at least five numbers; extra columns are dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let values = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>()
                        .with_context(|| format!("line {line_no}: invalid number {tok:?}"))
                })
                .collect::<Result<Vec<f64>>>()?;

            if values.len() < MIN_COLUMNS {
                return Err(anyhow!(
                    "line {line_no}: expected at least {MIN_COLUMNS} columns, found {}",
                    values.len()
                ));
            }

            rows.push(DensityRow {
                time: values[0],
                p11: values[1],
                p12: values[2],
                p21: values[3],
                p22: values[4],
            });
        }

        debug!(rows = rows.len(), "Parsed density table");
        Ok(Self { rows })
    }

    /// Number of rows, which is also the number of animation frames.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows and cannot be animated.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row that drives `frame`.
    ///
    /// ### Returns
    /// `None` if `frame` is past the end of the table.
    pub fn row(&self, frame: FrameIndex) -> Option<&DensityRow> {
        self.rows.get(frame)
    }

    /// All rows in frame order.
    pub fn rows(&self) -> &[DensityRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("dmat-core-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn synthetic_has_expected_shape_and_first_row() {
        let table = DensityTable::synthetic();
        assert_eq!(table.len(), SYNTHETIC_ROWS);

        let first = table.row(0).unwrap();
        assert_relative_eq!(first.time, 0.0);
        assert_relative_eq!(first.p11, 1.0);
        assert_relative_eq!(first.p12, 0.1);
        assert_relative_eq!(first.p21, 0.1);
        assert_relative_eq!(first.p22, 0.0);
    }

    #[test]
    fn synthetic_populations_are_complementary() {
        let table = DensityTable::synthetic();
        for row in table.rows() {
            assert_relative_eq!(row.p11 + row.p22, 1.0, epsilon = 1e-12);
            assert!((0.0..=1.0).contains(&row.p11));
        }

        let last = table.row(SYNTHETIC_ROWS - 1).unwrap();
        assert_relative_eq!(last.time, 9.99, epsilon = 1e-9);
    }

    #[test]
    fn parse_reads_rows_in_order() {
        let table = DensityTable::parse(
            "# time p11 p12 p21 p22\n\
             0.0 1.0 0.0 0.0 0.0\n\
             \n\
             0.5 0.5 0.2 0.2 0.5  # halfway\n\
             1.0 0.0 0.0 0.0 1.0 42.0\n",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.row(1),
            Some(&DensityRow {
                time: 0.5,
                p11: 0.5,
                p12: 0.2,
                p21: 0.2,
                p22: 0.5,
            })
        );
        assert_relative_eq!(table.row(2).unwrap().value(Element::TwoTwo), 1.0);
    }

    #[test]
    fn parse_rejects_short_rows() {
        let err = DensityTable::parse("0.0 1.0 0.0 0.0\n").unwrap_err();
        assert!(err.to_string().contains("at least 5 columns"), "{err}");
    }

    #[test]
    fn parse_rejects_non_numeric_tokens() {
        let err = DensityTable::parse("0.0 1.0 abc 0.0 0.0\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("dmat-core-tests/does-not-exist.dat");
        let err = DensityTable::load(&path).unwrap_err();

        let missing = err.downcast_ref::<MissingInputFile>().unwrap();
        assert_eq!(missing.path, path);
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn load_reads_existing_file() {
        let path = temp_file("two_rows.dat", "0 1 0.1 0.1 0\n0.01 0.9 0.1 0.1 0.1\n");
        let table = DensityTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.row(1).unwrap().p11, 0.9);
    }

    #[test]
    fn load_malformed_file_is_not_a_missing_file() {
        let path = temp_file("malformed.dat", "0 1 0.1\n");
        let err = DensityTable::load(&path).unwrap_err();
        assert!(err.downcast_ref::<MissingInputFile>().is_none());
    }

    #[test]
    fn from_config_without_input_is_synthetic() {
        let table = DensityTable::from_config(&Config::default()).unwrap();
        assert_eq!(table, DensityTable::synthetic());
    }
}
