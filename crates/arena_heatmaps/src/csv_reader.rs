use crate::constants::ROUND_DECIMALS;
use crate::error::{HeatmapError, Result};

use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Column storage. A column is numeric when every non-empty cell parses as a number.
#[derive(Debug, Clone, PartialEq)]
enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<String>),
}

/// Summary table as written by the comparative stage of the simulation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    /// file the table came from, used in error messages
    source: PathBuf,
    headers: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl SummaryTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the named numeric column
    ///
    /// # Errors
    /// `MissingColumn` when the header is absent, `InvalidNumber` when the column holds text
    pub fn numeric_column(&self, name: &str) -> Result<&[Option<f64>]> {
        let index = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| HeatmapError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })?;

        match &self.columns[index] {
            Column::Numeric(values) => Ok(values),
            Column::Text(values) => {
                let (row, value) = values
                    .iter()
                    .enumerate()
                    .find(|(_, v)| !v.is_empty() && v.parse::<f64>().is_err())
                    .map(|(i, v)| (i + 2, v.clone()))
                    .unwrap_or_default();
                Err(HeatmapError::InvalidNumber {
                    path: self.source.clone(),
                    row,
                    column: name.to_string(),
                    value,
                })
            }
        }
    }

    /// Rounds every numeric cell to `decimals` places, half to even
    pub fn round(&mut self, decimals: i32) {
        for column in &mut self.columns {
            if let Column::Numeric(values) = column {
                for value in values.iter_mut().flatten() {
                    *value = round_dp(*value, decimals);
                }
            }
        }
    }
}

/// Rounds half to even at `decimals` places (numpy `around` semantics)
pub fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Loads a summary CSV and rounds every numeric cell to two decimals
///
/// # Errors
/// `MissingFile` when the path does not exist, CSV errors for malformed content
pub fn read_summary_csv<P: AsRef<Path>>(path: P) -> Result<SummaryTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HeatmapError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => HeatmapError::Io(e),
    })?;

    let mut table = read_summary_from_reader(file, path)?;
    table.round(ROUND_DECIMALS);
    Ok(table)
}

/// Parses CSV with a header row; no rounding is applied here.
pub fn read_summary_from_reader<R: Read>(reader: R, source: &Path) -> Result<SummaryTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut rows = 0;
    for result in rdr.records() {
        let rec = result?;
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        for (column, field) in raw.iter_mut().zip(rec.iter()) {
            column.push(field.to_string());
        }
        rows += 1;
    }

    let columns = raw.into_iter().map(infer_column).collect();

    Ok(SummaryTable {
        source: source.to_path_buf(),
        headers,
        columns,
        rows,
    })
}

fn infer_column(cells: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(String::as_str)
        .map(parse_cell)
        .collect();

    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Text(cells),
    }
}

/// `Some(None)` for an empty cell, `None` for text
fn parse_cell(cell: &str) -> Option<Option<f64>> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    cell.parse::<f64>().ok().map(Some)
}
