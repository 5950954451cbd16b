//! In-memory worksheet representation.
//!
//! A [`Sheet`] is a header row plus data rows of loosely typed [`Cell`]s.
//! Blank header cells are named `Unnamed: N` (N being the zero-based
//! column index) so that the label dictionary's untitled name columns can
//! still be addressed.

use crate::SurveyError;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value.
    Empty,
    /// Any numeric value (integers are widened to `f64`).
    Number(f64),
    /// Text, untrimmed.
    Text(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Reads the cell as an integer ID.
    ///
    /// Accepts integral numbers and text that parses as one. Returns `None`
    /// for empty cells, fractional numbers, and anything else.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_id(&self) -> Option<i64> {
        let value = match self {
            Self::Empty => return None,
            Self::Number(n) => *n,
            Self::Text(s) => {
                let s = s.trim();
                if let Ok(id) = s.parse::<i64>() {
                    return Some(id);
                }
                s.parse::<f64>().ok()?
            }
        };
        (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
    }

    /// Reads the cell as a finite number. Text may carry thousands
    /// separators.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Empty => return None,
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Reads the cell as a display label.
    ///
    /// Text is trimmed; numbers are rendered without a trailing `.0`.
    /// Returns `None` for empty or whitespace-only cells.
    #[must_use]
    pub fn as_label(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }
}

/// A worksheet: named header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Builds a sheet from raw rows, using the first row as the header.
    #[must_use]
    pub fn from_rows(name: &str, mut rows: Vec<Vec<Cell>>) -> Self {
        let header_row = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
        };

        let headers = header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| cell.as_label().unwrap_or_else(|| format!("Unnamed: {idx}")))
            .collect();

        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Sheet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header names, one per column.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (the header row excluded).
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Index of the column with the given header.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::MissingColumn`] if no header matches.
    pub fn column(&self, header: &str) -> Result<usize, SurveyError> {
        self.headers
            .iter()
            .position(|h| h.trim() == header)
            .ok_or_else(|| SurveyError::MissingColumn {
                sheet: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// Cell at `(row, col)`. Short rows read as [`Cell::Empty`].
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}
