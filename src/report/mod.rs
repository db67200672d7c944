//! @ai:module:intent Report generation for quality runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ConsoleReport, JsonReporter, MarkdownReporter

pub mod console;
pub mod json_report;
pub mod markdown_report;

pub use console::{format_cell, ConsoleReport};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::QualitySummary;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined file report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    /// @ai:intent Write summary.json and summary.md into the output directory
    /// @ai:effects fs:write
    pub fn generate_all(&self, summary: &QualitySummary, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(summary, &output_dir.join("summary.json"))?;
        self.markdown
            .generate(summary, &output_dir.join("summary.md"))?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::corpus::{parse_queries, QueryKey};
    use crate::metrics::{QualityAggregator, QualityAggregatorTrait};
    use crate::results::{MatcherResults, ResultEntry, ResultTable};
    use crate::selection::MatcherId;
    use tempfile::TempDir;

    /// Two matchers over two queries; the second matcher misses the typo query.
    pub(crate) fn sample_summary() -> QualitySummary {
        let queries = parse_queries(
            "AAPL\tsymbol\texact_symbol\tApple Inc\n\
             Aple\tname\ttypo\tApple Inc\n",
        );
        let apple = ResultEntry {
            rank: 1,
            score: "100".to_string(),
            symbol: "AAPL".to_string(),
            name: "Apple Inc".to_string(),
            kind: None,
        };

        let mut a = ResultTable::new();
        a.push(QueryKey::new("AAPL", "symbol"), apple.clone());
        a.push(QueryKey::new("Aple", "name"), apple.clone());
        let mut b = ResultTable::new();
        b.push(QueryKey::new("AAPL", "symbol"), apple);

        let results = vec![
            MatcherResults::new(MatcherId::FuzzyMatcher, a),
            MatcherResults::new(MatcherId::Nucleo, b),
        ];
        QualityAggregator::new().aggregate(&queries, &results, 1)
    }

    #[test]
    fn test_generate_all_writes_both_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("reports");

        ReportGenerator::new()
            .generate_all(&sample_summary(), &dir)
            .unwrap();

        assert!(dir.join("summary.json").exists());
        assert!(dir.join("summary.md").exists());
    }
}
