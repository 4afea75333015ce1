use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::traits::{KisError, Tabular};

/// A JSON object as sent to / received from the brokerage API.
pub type Json = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Currency & Locale
// ---------------------------------------------------------------------------

/// Settlement currency of an overseas exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Hkd,
    Cny,
    Jpy,
    Vnd,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Hkd,
        Currency::Cny,
        Currency::Jpy,
        Currency::Vnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Hkd => "HKD",
            Currency::Cny => "CNY",
            Currency::Jpy => "JPY",
            Currency::Vnd => "VND",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = KisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| KisError::Decode(format!("unknown currency: {}", upper)))
    }
}

/// Whether a query targets the domestic (Korean) market or an overseas one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Domestic,
    Foreign,
}

impl Locale {
    pub fn is_domestic(&self) -> bool {
        matches!(self, Locale::Domestic)
    }

    /// Code embedded in the continuation parameter names (`CTX_AREA_FK100`, ...).
    pub fn query_code(&self) -> &'static str {
        match self {
            Locale::Domestic => "100",
            Locale::Foreign => "200",
        }
    }
}

impl From<bool> for Locale {
    fn from(is_kr: bool) -> Self {
        if is_kr {
            Locale::Domestic
        } else {
            Locale::Foreign
        }
    }
}

// ---------------------------------------------------------------------------
// API Response
// ---------------------------------------------------------------------------

/// One response from the brokerage API: response headers and JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub header: Json,
    #[serde(default)]
    pub body: Json,
}

impl ApiResponse {
    pub fn new(header: Json, body: Json) -> Self {
        Self { header, body }
    }

    /// Look up a header field, failing if the server did not send it.
    pub fn header_value(&self, key: &str) -> Result<&Value, KisError> {
        self.header.get(key).ok_or_else(|| KisError::MissingField {
            section: "header",
            key: key.to_string(),
        })
    }

    /// Look up a body field, failing if the server did not send it.
    pub fn body_value(&self, key: &str) -> Result<&Value, KisError> {
        self.body.get(key).ok_or_else(|| KisError::MissingField {
            section: "body",
            key: key.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Column-named rows of JSON cells, the decoded form of one or more pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from an array of JSON objects, one row per object.
    pub fn from_records(records: &[Value]) -> Result<Self, KisError> {
        let mut table = Table::default();
        for (idx, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                KisError::Decode(format!("record {} is not a JSON object", idx))
            })?;
            table.push_record(obj);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Append one record. Unknown keys become new columns, back-filled with nulls.
    pub fn push_record(&mut self, record: &Json) {
        let mut row = vec![Value::Null; self.columns.len()];
        for (key, value) in record {
            let col = self.ensure_column(key);
            if col >= row.len() {
                row.resize(col + 1, Value::Null);
            }
            row[col] = value.clone();
        }
        self.rows.push(row);
    }

    /// Append all rows of `other`, aligning columns by name.
    pub fn append(&mut self, other: Table) {
        let mapping: Vec<usize> = other
            .columns
            .iter()
            .map(|name| self.ensure_column(name))
            .collect();

        for src in other.rows {
            let mut row = vec![Value::Null; self.columns.len()];
            for (value, &dst) in src.into_iter().zip(&mapping) {
                row[dst] = value;
            }
            self.rows.push(row);
        }
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        self.columns.len() - 1
    }
}

impl Tabular for Table {
    fn concat(pages: Vec<Self>) -> Self {
        let mut iter = pages.into_iter();
        let mut out = iter.next().unwrap_or_default();
        for page in iter {
            out.append(page);
        }
        out
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}
