//! Spreadsheet workbook access via `calamine`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};

use crate::SurveyError;
use crate::sheet::{Cell, Sheet};

/// An open survey workbook.
pub struct Workbook {
    path: PathBuf,
    inner: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Opens an `.xlsx`/`.xls`/`.ods` workbook.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::Workbook`] if the file cannot be opened or
    /// is not a recognized workbook format.
    pub fn open(path: &Path) -> Result<Self, SurveyError> {
        let inner = open_workbook_auto(path).map_err(|source| SurveyError::Workbook {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Opened workbook {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Names of all sheets in the workbook.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    /// Reads a sheet into memory.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::MissingSheet`] if the sheet does not exist,
    /// or [`SurveyError::Workbook`] if it cannot be decoded.
    pub fn sheet(&mut self, name: &str) -> Result<Sheet, SurveyError> {
        let names = self.sheet_names();
        if !names.iter().any(|n| n == name) {
            return Err(SurveyError::MissingSheet {
                path: self.path.display().to_string(),
                sheet: name.to_string(),
                available: names.join(", "),
            });
        }

        let range = self
            .inner
            .worksheet_range(name)
            .map_err(|source| SurveyError::Workbook {
                path: self.path.display().to_string(),
                source,
            })?;

        // The used range may not start at column A; keep column indices
        // absolute so synthesized `Unnamed: N` headers line up.
        let leading = range.start().map_or(0, |(_, col)| col as usize);

        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| {
                std::iter::repeat_n(Cell::Empty, leading)
                    .chain(row.iter().map(convert_cell))
                    .collect()
            })
            .collect();

        log::debug!("Read sheet '{name}': {} rows", rows.len());

        Ok(Sheet::from_rows(name, rows))
    }
}

#[allow(clippy::cast_precision_loss)]
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
