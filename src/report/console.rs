//! @ai:module:intent Fixed-width console report for a quality run
//! @ai:module:layer infrastructure
//! @ai:module:public_api ConsoleReport, format_cell
//! @ai:module:stateless true

use crate::corpus::{display_name, ordered_categories, Query};
use crate::metrics::{percent, QualitySummary};
use crate::results::{MatcherResults, ResultEntry};
use crate::runner::process::truncate_chars;
use crate::selection::Protocol;
use std::collections::HashMap;
use std::fmt::{self, Write};
use std::path::PathBuf;

const RANK_WIDTH: usize = 6;
const SYMBOL_CHARS: usize = 10;
const MIN_NAME_CHARS: usize = 5;
const FILTER_NAME_CHARS: usize = 20;
const MAX_ROWS: usize = 5;
const ELLIPSIS: &str = "...";

/// @ai:intent Cut `text` to `max` chars, marking the cut with an ellipsis
/// @ai:effects pure
fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!(
            "{}{}",
            truncate_chars(text, max.saturating_sub(ELLIPSIS.len())),
            ELLIPSIS
        )
    } else {
        text.to_string()
    }
}

/// @ai:intent Render one ranked entry as a table cell
/// @ai:post batch cells read `score symbol name`, filter cells `symbol name`
/// @ai:effects pure
pub fn format_cell(entry: &ResultEntry, column_width: usize, protocol: Protocol) -> String {
    let symbol = truncate_chars(&entry.symbol, SYMBOL_CHARS);

    match protocol {
        Protocol::Filter => format!("{} {}", symbol, shorten(&entry.name, FILTER_NAME_CHARS)),
        Protocol::Batch => {
            let max_name = column_width
                .saturating_sub(entry.score.chars().count())
                .saturating_sub(symbol.chars().count())
                .saturating_sub(3)
                .max(MIN_NAME_CHARS);
            format!("{} {} {}", entry.score, symbol, shorten(&entry.name, max_name))
        }
    }
}

/// @ai:intent Everything needed to print the console report
pub struct ConsoleReport<'a> {
    pub summary: &'a QualitySummary,
    pub queries: &'a [Query],
    pub results: &'a [MatcherResults],
    pub snapshot_paths: &'a [PathBuf],
    pub column_width: usize,
}

impl ConsoleReport<'_> {
    /// @ai:intent Total line width: rank column, one column per matcher, margin
    /// @ai:effects pure
    pub fn total_width(&self) -> usize {
        RANK_WIDTH + self.column_width * self.results.len() + 12
    }

    fn separator(&self) -> String {
        "=".repeat(self.total_width())
    }

    /// @ai:intent Write every section in order
    /// @ai:effects pure
    pub fn render(&self, out: &mut impl Write) -> fmt::Result {
        self.write_banner(out)?;
        self.write_query_details(out)?;
        self.write_category_summary(out)?;
        self.write_ground_truth(out)?;
        self.write_overall(out)?;
        self.write_snapshot_paths(out)
    }

    /// @ai:intent Render into a new string
    /// @ai:effects pure
    pub fn to_text(&self) -> Result<String, fmt::Error> {
        let mut text = String::new();
        self.render(&mut text)?;
        Ok(text)
    }

    fn write_banner(&self, out: &mut impl Write) -> fmt::Result {
        let sep = self.separator();
        let summary = self.summary;

        writeln!(out, "{sep}")?;
        writeln!(out, "FUZZY MATCHING QUALITY COMPARISON")?;
        writeln!(out, "{sep}")?;
        if summary.corpus_size > 0 {
            writeln!(out, "Corpus: {} instruments", summary.corpus_size)?;
        }
        writeln!(out, "Queries: {}", summary.query_count)?;
        writeln!(out, "Matchers: {}", summary.matchers.join(", "))?;
        writeln!(out)?;

        let counts: Vec<String> = summary
            .matchers
            .iter()
            .zip(&summary.results_counts)
            .map(|(name, count)| format!("{}={}/{}", name, count, summary.query_count))
            .collect();
        writeln!(out, "Queries with results:  {}", counts.join("  "))?;
        writeln!(out)
    }

    fn write_query_details(&self, out: &mut impl Write) -> fmt::Result {
        let width = self.total_width();
        let mut by_category: HashMap<&str, Vec<&Query>> = HashMap::new();
        for query in self.queries {
            by_category.entry(query.category.as_str()).or_default().push(query);
        }

        for category in ordered_categories(by_category.keys().copied()) {
            let members = by_category.get(category.as_str()).map(Vec::as_slice).unwrap_or(&[]);

            writeln!(out, "\n{}", "─".repeat(width))?;
            writeln!(out, "  {} ({} queries)", display_name(&category), members.len())?;
            writeln!(out, "{}", "─".repeat(width))?;

            for query in members {
                self.write_query_block(out, query)?;
            }
        }
        Ok(())
    }

    fn write_query_block(&self, out: &mut impl Write, query: &Query) -> fmt::Result {
        let col = self.column_width;
        let rule = "─".repeat(self.total_width().saturating_sub(4));
        let key = query.key();
        let per_matcher: Vec<&[ResultEntry]> =
            self.results.iter().map(|r| r.table.get(&key)).collect();

        writeln!(out, "\n  Query: \"{}\" (field: {})", query.text, query.field)?;
        writeln!(out, "  {rule}")?;
        let mut header = format!("  {:<RANK_WIDTH$}", "Rank");
        for result in self.results {
            write!(header, " {:<col$}", result.label())?;
        }
        writeln!(out, "{header}")?;
        writeln!(out, "  {rule}")?;

        let rows = per_matcher.iter().map(|e| e.len()).max().unwrap_or(0).min(MAX_ROWS);
        for i in 0..rows {
            let mut row = format!("  {:<RANK_WIDTH$}", i + 1);
            for (result, entries) in self.results.iter().zip(&per_matcher) {
                let cell = entries
                    .get(i)
                    .map(|entry| format_cell(entry, col, result.matcher.protocol()))
                    .unwrap_or_default();
                write!(row, " {cell:<col$}")?;
            }
            writeln!(out, "{row}")?;
        }

        if per_matcher.iter().all(|e| e.is_empty()) {
            let mut row = format!("  {:<RANK_WIDTH$}", "—");
            for _ in self.results {
                write!(row, " {:<col$}", "(no results)")?;
            }
            writeln!(out, "{row}")?;
        }
        Ok(())
    }

    fn write_category_summary(&self, out: &mut impl Write) -> fmt::Result {
        let sep = self.separator();
        let summary = self.summary;

        writeln!(out, "\n{sep}")?;
        writeln!(out, "CATEGORY SUMMARY — Top-1 Agreement")?;
        writeln!(out, "{sep}")?;
        writeln!(out)?;

        if !summary.has_agreement() {
            return writeln!(out, "(Need at least 2 matchers for agreement comparison)");
        }

        let reference = &summary.matchers[0];
        let mut header = format!("{:<30} {:>7}", "Category", "Queries");
        for other in &summary.matchers[1..] {
            let pair = format!(
                "{}={}",
                truncate_chars(reference, 2),
                truncate_chars(other, 3)
            );
            write!(header, "  {pair:>6}")?;
        }
        write!(header, "  {:>9}", "All agree")?;
        writeln!(out, "{header}")?;
        writeln!(out, "{}", "─".repeat(header.chars().count()))?;

        for row in &summary.categories {
            let n = row.queries;
            let mut line = format!("{:<30} {:>7}", row.display, n);
            for count in &row.pair_counts {
                write!(line, "  {count:>3}/{n:<3}")?;
            }
            write!(line, "  {:>4}/{}", row.all_agree, n)?;
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn write_ground_truth(&self, out: &mut impl Write) -> fmt::Result {
        let gt = &self.summary.ground_truth;
        if !gt.has_evaluations() {
            return Ok(());
        }
        let sep = self.separator();

        writeln!(out, "\n{sep}")?;
        writeln!(out, "GROUND TRUTH EVALUATION — Top-1 (Top-5 for typo)")?;
        writeln!(out, "{sep}")?;
        writeln!(out)?;

        let mut header = format!("{:<30} {:>7}", "Category", "Queries");
        for name in &self.summary.matchers {
            write!(header, "  {name:>14}")?;
        }
        let rule = "─".repeat(header.chars().count());
        writeln!(out, "{header}")?;
        writeln!(out, "{rule}")?;

        for row in &gt.rows {
            let n = row.evaluated;
            let mut line = format!("{:<30} {:>7}", row.display_label(), n);
            for hits in &row.hits {
                write!(line, "  {:>3}/{} {:>3}%", hits, n, percent(*hits, n))?;
            }
            writeln!(out, "{line}")?;
        }

        let n = gt.total_evaluated;
        let mut total = format!("{:<30} {:>7}", "TOTAL", n);
        for hits in &gt.total_hits {
            write!(total, "  {:>3}/{} {:>3}%", hits, n, percent(*hits, n))?;
        }
        writeln!(out, "{rule}")?;
        writeln!(out, "{total}")?;
        writeln!(out)?;
        let kinds = if gt.skipped_categories.is_empty() {
            String::new()
        } else {
            format!(": {}", gt.skipped_categories.join(", "))
        };
        writeln!(
            out,
            "Note: {} queries skipped (no expected name){}.",
            gt.skipped, kinds
        )?;
        writeln!(
            out,
            "Typo, prefix, and abbreviation categories use top-5 (correct result in first 5); all others use top-1."
        )
    }

    fn write_overall(&self, out: &mut impl Write) -> fmt::Result {
        let sep = self.separator();
        let summary = self.summary;
        let total = summary.query_count;

        writeln!(out, "\n{sep}")?;
        writeln!(out, "OVERALL SUMMARY")?;
        writeln!(out, "{sep}")?;
        writeln!(out)?;
        writeln!(out, "{:<45} {:>10}", "Metric", "Count")?;
        writeln!(out, "{}", "─".repeat(57))?;

        for (name, count) in summary.matchers.iter().zip(&summary.results_counts) {
            let label = format!("Queries returning results ({name})");
            writeln!(out, "{label:<45} {count:>5}/{total}")?;
        }
        writeln!(out)?;

        if let Some(all_agree) = summary.all_agree {
            for pair in &summary.pairwise {
                let label = format!("Top-1 agreement {} vs {}", pair.a, pair.b);
                writeln!(out, "{:<45} {:>5}/{}", label, pair.count, total)?;
            }

            let label = format!("All {} agree on top-1", summary.matcher_count());
            writeln!(out, "{label:<45} {all_agree:>5}/{total}")?;

            if !summary.all_but_one.is_empty() {
                writeln!(out)?;
                for subset in &summary.all_but_one {
                    writeln!(out, "{:<45} {:>5}/{}", subset.label(), subset.count, total)?;
                }
            }
        }
        writeln!(out)
    }

    fn write_snapshot_paths(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "Quality results saved to:")?;
        for path in self.snapshot_paths {
            writeln!(out, "  {}", path.display())?;
        }
        Ok(())
    }
}
