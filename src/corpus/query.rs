//! @ai:module:intent Query and instrument records for quality runs
//! @ai:module:layer domain
//! @ai:module:public_api Query, QueryField, QueryKey, Instrument, SKIP_SENTINEL
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// Expected-name value meaning "not evaluated against ground truth".
pub const SKIP_SENTINEL: &str = "_SKIP_";

/// @ai:intent Corpus column a query is matched against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryField {
    Symbol,
    Name,
    Isin,
    /// Unrecognised field text, kept verbatim so result keys line up
    Other(String),
}

impl QueryField {
    /// @ai:intent Parse field text as written in the queries file
    /// @ai:effects pure
    pub fn parse(raw: &str) -> Self {
        match raw {
            "symbol" => QueryField::Symbol,
            "name" => QueryField::Name,
            "isin" => QueryField::Isin,
            other => QueryField::Other(other.to_string()),
        }
    }

    /// @ai:intent Convert field to the text sent to matchers
    /// @ai:effects pure
    pub fn as_str(&self) -> &str {
        match self {
            QueryField::Symbol => "symbol",
            QueryField::Name => "name",
            QueryField::Isin => "isin",
            QueryField::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for QueryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A single search string plus the field and category it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub field: QueryField,
    pub category: String,
    /// Ground-truth name; `None` when the query is not evaluated
    pub expected: Option<String>,
}

impl Query {
    /// @ai:intent Lookup key shared by every matcher's result table
    /// @ai:effects pure
    pub fn key(&self) -> QueryKey {
        QueryKey::new(&self.text, self.field.as_str())
    }

    /// @ai:intent Line sent to batch matchers (without trailing newline)
    /// @ai:effects pure
    pub fn wire_line(&self) -> String {
        format!("{}\t{}", self.text, self.field)
    }
}

/// @ai:intent Identity of a query in result tables: (query text, field text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    pub text: String,
    pub field: String,
}

impl QueryKey {
    /// @ai:effects pure
    pub fn new(text: &str, field: &str) -> Self {
        Self {
            text: text.to_string(),
            field: field.to_string(),
        }
    }

    /// @ai:intent Snapshot key form `"{query}\t{field}"`
    /// @ai:effects pure
    pub fn to_snapshot_key(&self) -> String {
        format!("{}\t{}", self.text, self.field)
    }

    /// @ai:intent Inverse of `to_snapshot_key`
    /// @ai:effects pure
    pub fn from_snapshot_key(raw: &str) -> Option<Self> {
        raw.split_once('\t').map(|(text, field)| Self::new(text, field))
    }
}

/// @ai:intent Corpus record searched by matchers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub isin: String,
}

impl Instrument {
    /// @ai:intent Column value a filter matcher sees for the given field
    /// @ai:effects pure
    pub fn column(&self, field: &QueryField) -> &str {
        match field {
            QueryField::Symbol => &self.symbol,
            QueryField::Isin => &self.isin,
            QueryField::Name | QueryField::Other(_) => &self.name,
        }
    }
}
