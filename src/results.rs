//! Query results as seen by the viewers and the stats popup.

use anyhow::Context as _;
use serde_json::Value;

pub const NULL_DISPLAY: &str = "NULL";

/// One cell: the raw text plus an optional expanded form (e.g. pretty JSON).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellValue {
    pub raw: Option<String>,
    pub full: Option<String>,
}

impl CellValue {
    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            full: None,
        }
    }

    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    /// The form shown in a viewer: `full` when present, then `raw`.
    pub fn display(&self) -> &str {
        self.full
            .as_deref()
            .or(self.raw.as_deref())
            .unwrap_or(NULL_DISPLAY)
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::String(text) => Self::text(text.clone()),
            Value::Bool(_) | Value::Number(_) => Self::text(value.to_string()),
            Value::Array(_) | Value::Object(_) => Self {
                raw: Some(value.to_string()),
                full: serde_json::to_string_pretty(value).ok(),
            },
        }
    }
}

pub trait ResultsProvider {
    fn column_count(&self) -> usize;
    fn row_count(&self) -> usize;
    fn column_name(&self, column: usize) -> Option<&str>;
    fn cell(&self, row: usize, column: usize) -> Option<CellValue>;

    /// Raw values of one column, `None` for NULL.
    fn column_values(&self, column: usize) -> Vec<Option<String>> {
        if column >= self.column_count() {
            return Vec::new();
        }
        (0..self.row_count())
            .map(|row| self.cell(row, column).and_then(|cell| cell.raw))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn from_json_rows(columns: Vec<String>, rows: &[Vec<Value>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(CellValue::from_json).collect())
            .collect();
        Self { columns, rows }
    }

    /// Reads CSV with a header row; empty fields are kept as empty strings.
    pub fn from_csv(content: &str) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns = reader
            .headers()
            .context("failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("failed to read CSV row {}", index + 1))?;
            rows.push(record.iter().map(CellValue::text).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }
}

impl ResultsProvider for ResultSet {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    fn cell(&self, row: usize, column: usize) -> Option<CellValue> {
        self.rows.get(row)?.get(column).cloned()
    }
}
