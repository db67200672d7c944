//! @ai:module:intent Markdown summary of a quality run
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{percent, QualitySummary};
use anyhow::Result;
use std::fmt::{self, Write as FmtWrite};
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a summary
    fn generate(&self, summary: &QualitySummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown tables for agreement and ground truth
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format `hits/total (pct%)`
    /// @ai:effects pure
    fn format_ratio(hits: usize, total: usize) -> String {
        format!("{}/{} ({}%)", hits, total, percent(hits, total))
    }

    /// @ai:effects pure
    fn table_rule(columns: usize) -> String {
        format!("|{}", "---|".repeat(columns))
    }

    /// @ai:intent Header block and per-matcher result counts
    /// @ai:effects pure
    fn generate_summary(summary: &QualitySummary) -> Result<String, fmt::Error> {
        let mut output = String::new();

        writeln!(output, "# Fuzzy Matching Quality Comparison")?;
        writeln!(output)?;
        writeln!(output, "**Date:** {}", summary.timestamp.to_rfc3339())?;
        writeln!(output, "**Corpus:** {} instruments", summary.corpus_size)?;
        writeln!(output, "**Queries:** {}", summary.query_count)?;
        writeln!(output, "**Matchers:** {}", summary.matchers.join(", "))?;
        writeln!(output)?;

        writeln!(output, "## Queries Returning Results")?;
        writeln!(output)?;
        writeln!(output, "| Matcher | Queries |")?;
        writeln!(output, "{}", Self::table_rule(2))?;
        for (name, count) in summary.matchers.iter().zip(&summary.results_counts) {
            writeln!(
                output,
                "| {} | {} |",
                name,
                Self::format_ratio(*count, summary.query_count)
            )?;
        }
        writeln!(output)?;

        Ok(output)
    }

    /// @ai:intent Pairwise, all-agree and N-1 agreement
    /// @ai:effects pure
    fn generate_agreement_section(summary: &QualitySummary) -> Result<String, fmt::Error> {
        let mut output = String::new();
        let total = summary.query_count;

        writeln!(output, "## Top-1 Agreement")?;
        writeln!(output)?;

        let Some(all_agree) = summary.all_agree else {
            writeln!(output, "Need at least 2 matchers for agreement comparison.")?;
            writeln!(output)?;
            return Ok(output);
        };

        writeln!(output, "| Comparison | Agreement |")?;
        writeln!(output, "{}", Self::table_rule(2))?;
        for pair in &summary.pairwise {
            writeln!(
                output,
                "| {} vs {} | {} |",
                pair.a,
                pair.b,
                Self::format_ratio(pair.count, total)
            )?;
        }
        writeln!(
            output,
            "| All {} agree | {} |",
            summary.matcher_count(),
            Self::format_ratio(all_agree, total)
        )?;
        for subset in &summary.all_but_one {
            writeln!(
                output,
                "| {} | {} |",
                subset.label(),
                Self::format_ratio(subset.count, total)
            )?;
        }
        writeln!(output)?;

        writeln!(output, "### By Category")?;
        writeln!(output)?;
        let reference = &summary.matchers[0];
        write!(output, "| Category | Queries |")?;
        for other in &summary.matchers[1..] {
            write!(output, " {reference} = {other} |")?;
        }
        writeln!(output, " All agree |")?;
        writeln!(output, "{}", Self::table_rule(summary.matchers.len() + 2))?;
        for row in &summary.categories {
            write!(output, "| {} | {} |", row.display, row.queries)?;
            for count in &row.pair_counts {
                write!(output, " {}/{} |", count, row.queries)?;
            }
            writeln!(output, " {}/{} |", row.all_agree, row.queries)?;
        }
        writeln!(output)?;

        Ok(output)
    }

    /// @ai:intent Ground-truth hits per category and in total
    /// @ai:effects pure
    fn generate_ground_truth_section(summary: &QualitySummary) -> Result<String, fmt::Error> {
        let mut output = String::new();
        let gt = &summary.ground_truth;
        if !gt.has_evaluations() {
            return Ok(output);
        }

        writeln!(output, "## Ground Truth")?;
        writeln!(output)?;
        write!(output, "| Category | Queries |")?;
        for name in &summary.matchers {
            write!(output, " {name} |")?;
        }
        writeln!(output)?;
        writeln!(output, "{}", Self::table_rule(summary.matchers.len() + 2))?;

        for row in &gt.rows {
            write!(output, "| {} | {} |", row.display_label(), row.evaluated)?;
            for hits in &row.hits {
                write!(output, " {} |", Self::format_ratio(*hits, row.evaluated))?;
            }
            writeln!(output)?;
        }

        write!(output, "| **Total** | {} |", gt.total_evaluated)?;
        for hits in &gt.total_hits {
            write!(output, " {} |", Self::format_ratio(*hits, gt.total_evaluated))?;
        }
        writeln!(output)?;
        writeln!(output)?;
        write!(output, "{} queries without an expected name were skipped", gt.skipped)?;
        if gt.skipped_categories.is_empty() {
            writeln!(output, ".")?;
        } else {
            writeln!(output, " ({}).", gt.skipped_categories.join(", "))?;
        }
        writeln!(output)?;

        Ok(output)
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, summary: &QualitySummary, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_summary(summary)?);
        content.push_str(&Self::generate_agreement_section(summary)?);
        content.push_str(&Self::generate_ground_truth_section(summary)?);

        std::fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_summary;
    use tempfile::TempDir;

    #[test]
    fn test_format_ratio() {
        assert_eq!(MarkdownReporter::format_ratio(1, 3), "1/3 (33%)");
        assert_eq!(MarkdownReporter::format_ratio(0, 0), "0/0 (0%)");
    }

    #[test]
    fn test_generate_markdown_report() {
        let reporter = MarkdownReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("summary.md");

        reporter.generate(&sample_summary(), &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("# Fuzzy Matching Quality Comparison"));
        assert!(content.contains("| FuzzyMatcher vs nucleo | 1/2 (50%) |"));
        assert!(content.contains("| Category | Queries | FuzzyMatcher = nucleo | All agree |"));
        assert!(content.contains("| Typo / misspelling (top-5) | 1 | 1/1 (100%) | 0/1 (0%) |"));
        assert!(content.contains("| **Total** | 2 | 2/2 (100%) | 1/2 (50%) |"));
    }

    #[test]
    fn test_single_matcher_has_no_agreement_table() {
        let mut summary = sample_summary();
        summary.matchers.truncate(1);
        summary.all_agree = None;

        let section = MarkdownReporter::generate_agreement_section(&summary).unwrap();
        assert!(section.contains("Need at least 2 matchers"));
        assert!(!section.contains("| Comparison |"));
    }
}
