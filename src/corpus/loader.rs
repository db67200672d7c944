//! @ai:module:intent TSV loaders for the query set and the instrument corpus
//! @ai:module:layer infrastructure
//! @ai:module:public_api CorpusLoader, parse_queries, parse_instruments
//! @ai:module:stateless true

use crate::corpus::query::{Instrument, Query, QueryField, SKIP_SENTINEL};
use crate::error::{HarnessError, Result};
use std::path::Path;

/// @ai:intent Parse a queries TSV: `query \t field [\t category [\t expected]]`
/// @ai:post blank lines and lines with fewer than two columns are dropped
/// @ai:effects pure
pub fn parse_queries(content: &str) -> Vec<Query> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('\t').collect();

            let (category, expected) = match parts.len() {
                0 | 1 => return None,
                2 => ("other", SKIP_SENTINEL),
                3 => (parts[2], SKIP_SENTINEL),
                _ => (parts[2], parts[3]),
            };

            Some(Query {
                text: parts[0].to_string(),
                field: QueryField::parse(parts[1]),
                category: category.to_string(),
                expected: (expected != SKIP_SENTINEL).then(|| expected.to_string()),
            })
        })
        .collect()
}

/// @ai:intent Parse the instrument corpus TSV (header row, then symbol/name/isin/...)
/// @ai:post rows with fewer than three columns are skipped
/// @ai:effects pure
pub fn parse_instruments(content: &str) -> Vec<Instrument> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();

            if cols.len() < 3 {
                return None;
            }

            Some(Instrument {
                symbol: cols[0].to_string(),
                name: cols[1].to_string(),
                isin: cols[2].to_string(),
            })
        })
        .collect()
}

/// @ai:intent Loads queries and instruments from disk
/// @ai:effects pure (stateless)
pub struct CorpusLoader;

impl CorpusLoader {
    /// @ai:intent Create a new corpus loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Fail early with a named error when an input file is absent
    /// @ai:effects fs:read
    pub fn require(kind: &'static str, path: &Path) -> Result<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(HarnessError::MissingInput {
                kind,
                path: path.to_path_buf(),
            })
        }
    }

    /// @ai:intent Load the query list
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load_queries(&self, path: &Path) -> Result<Vec<Query>> {
        let content = std::fs::read_to_string(path)?;
        let queries = parse_queries(&content);
        tracing::debug!("Parsed {} queries from {}", queries.len(), path.display());
        Ok(queries)
    }

    /// @ai:intent Load the instrument corpus
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load_instruments(&self, path: &Path) -> Result<Vec<Instrument>> {
        let content = std::fs::read_to_string(path)?;
        let instruments = parse_instruments(&content);
        tracing::debug!(
            "Parsed {} instruments from {}",
            instruments.len(),
            path.display()
        );
        Ok(instruments)
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_queries_column_counts() {
        let content = "AAPL\tsymbol\texact_symbol\tApple Inc\n\
                       Aple\tname\ttypo\n\
                       \n\
                       MSFT\tsymbol\n\
                       lonely\n";

        let queries = parse_queries(content);
        assert_eq!(queries.len(), 3);

        assert_eq!(queries[0].expected.as_deref(), Some("Apple Inc"));
        assert_eq!(queries[0].category, "exact_symbol");

        assert_eq!(queries[1].category, "typo");
        assert_eq!(queries[1].expected, None);

        assert_eq!(queries[2].category, "other");
        assert_eq!(queries[2].field, QueryField::Symbol);
    }

    #[test]
    fn test_parse_queries_drops_single_column_line() {
        let queries = parse_queries("justonecolumn\n");
        assert!(queries.is_empty());
    }

    #[test]
    fn test_explicit_skip_sentinel_is_not_evaluated() {
        let queries = parse_queries("goog\tsymbol\tprefix\t_SKIP_\n");
        assert_eq!(queries[0].expected, None);
    }

    #[test]
    fn test_parse_instruments_skips_header_and_short_rows() {
        let content = "symbol\tname\tisin\texchange\n\
                       AAPL\tApple Inc\tUS0378331005\tXNAS\n\
                       BROKEN\tOnly two\n\
                       MSFT\tMicrosoft Corp\tUS5949181045\n";

        let instruments = parse_instruments(content);
        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[0].symbol, "AAPL");
        assert_eq!(instruments[1].isin, "US5949181045");
    }

    #[test]
    fn test_load_from_files() {
        let temp = TempDir::new().unwrap();
        let queries = create_test_file(temp.path(), "queries.tsv", "Aple\tname\ttypo\tApple\n");
        let corpus = create_test_file(
            temp.path(),
            "corpus.tsv",
            "symbol\tname\tisin\nAAPL\tApple Inc\tUS0378331005\n",
        );

        let loader = CorpusLoader::new();
        assert_eq!(loader.load_queries(&queries).unwrap().len(), 1);
        assert_eq!(loader.load_instruments(&corpus).unwrap().len(), 1);
    }

    #[test]
    fn test_require_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.tsv");

        let err = CorpusLoader::require("queries", &missing).unwrap_err();
        assert!(matches!(err, HarnessError::MissingInput { kind: "queries", .. }));
    }
}
