//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::QualitySummary;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from a summary
    fn generate(&self, summary: &QualitySummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes the quality summary as pretty-printed JSON
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, summary: &QualitySummary, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_summary;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("summary.json");

        let summary = sample_summary();
        reporter.generate(&summary, &output).unwrap();
        assert!(output.exists());

        let content = std::fs::read_to_string(&output).unwrap();
        let parsed: QualitySummary = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, summary);

        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["pairwise"][0]["count"], 1);
        assert_eq!(value["ground_truth"]["total_hits"][1], 1);
    }
}
