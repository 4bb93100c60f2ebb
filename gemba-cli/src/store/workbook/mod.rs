//! Workbook I/O for the master and per-facility databases
//!
//! Workbooks are read whole into memory with calamine and rewritten whole
//! with rust_xlsxwriter. Cells keep their type (text, number, boolean, date,
//! formula) so sheets the migration never touches come back unchanged.

mod reader;
mod records;
mod registry;
mod writer;

pub use reader::read_workbook;
pub use records::WorkbookStoreOpener;
pub use registry::WorkbookRegistry;
pub use writer::write_workbook;

/// A single worksheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date-time or duration
    DateTime { serial: f64, duration: bool },
    /// Formula without the leading `=`, with its last computed value
    Formula { formula: String, cached: String },
}

impl Cell {
    /// Cell content as text. Whole numbers print without a fraction,
    /// formulas give their cached value.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) | Cell::DateTime { serial: n, .. } => {
                if n.fract() == 0.0 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::Formula { cached, .. } => cached.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from(value.to_string())
    }
}

/// Turn a row of strings into text cells
pub fn text_row(values: Vec<String>) -> Vec<Cell> {
    values.into_iter().map(Cell::from).collect()
}

/// One worksheet as rows of cells. Row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        SheetData {
            name: name.into(),
            rows,
        }
    }

    /// Header row as text, empty when the sheet has no rows
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|r| r.iter().map(Cell::text).collect())
            .unwrap_or_default()
    }

    /// Index of the first header equal to `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.rows
            .first()?
            .iter()
            .position(|h| h.text().trim() == name)
    }

    /// Rows after the header
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Every row rendered as text
    #[cfg(test)]
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(Cell::text).collect())
            .collect()
    }
}

/// All worksheets of a workbook, in tab order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<SheetData>,
}

impl WorkbookData {
    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut SheetData> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
