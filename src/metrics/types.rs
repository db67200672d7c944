//! @ai:module:intent Summary types produced by quality aggregation
//! @ai:module:layer domain
//! @ai:module:public_api QualitySummary, PairAgreement, SubsetAgreement, CategoryAgreement, GroundTruthReport, GroundTruthRow
//! @ai:module:stateless true

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// @ai:intent Integer percentage, truncated toward zero; 0 when the total is 0
/// @ai:effects pure
pub fn percent(hits: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        hits * 100 / total
    }
}

/// @ai:intent Top-1 agreement between two matchers over all queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairAgreement {
    pub a: String,
    pub b: String,
    pub count: usize,
}

/// @ai:intent Agreement among all matchers except one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetAgreement {
    pub excluded: String,
    pub others: Vec<String>,
    pub count: usize,
}

impl SubsetAgreement {
    /// @ai:intent Label such as `nucleo + fzf agree`
    /// @ai:effects pure
    pub fn label(&self) -> String {
        format!("{} agree", self.others.join(" + "))
    }
}

/// @ai:intent Reference-vs-others agreement within one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAgreement {
    pub category: String,
    pub display: String,
    pub queries: usize,
    /// Agreement of the reference matcher with each other matcher, in selection order
    pub pair_counts: Vec<usize>,
    pub all_agree: usize,
}

/// @ai:intent Ground-truth hits for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthRow {
    pub category: String,
    pub display: String,
    /// Ranked entries inspected per query
    pub top_n: usize,
    pub evaluated: usize,
    /// Hits per matcher, in selection order
    pub hits: Vec<usize>,
}

impl GroundTruthRow {
    /// @ai:intent Display name annotated with the top-N policy when it is not top-1
    /// @ai:effects pure
    pub fn display_label(&self) -> String {
        if self.top_n > 1 {
            format!("{} (top-{})", self.display, self.top_n)
        } else {
            self.display.clone()
        }
    }
}

/// @ai:intent Ground-truth evaluation across categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthReport {
    pub rows: Vec<GroundTruthRow>,
    pub total_evaluated: usize,
    /// Total hits per matcher, in selection order
    pub total_hits: Vec<usize>,
    /// Queries without an expected name
    pub skipped: usize,
    /// Categories of the skipped queries, in report order
    #[serde(default)]
    pub skipped_categories: Vec<String>,
}

impl GroundTruthReport {
    /// @ai:effects pure
    pub fn has_evaluations(&self) -> bool {
        self.total_evaluated > 0
    }
}

/// @ai:intent Everything the reporters render, computed once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub timestamp: DateTime<Utc>,
    pub corpus_size: usize,
    pub query_count: usize,
    /// Matcher labels in selection order
    pub matchers: Vec<String>,
    /// Queries with at least one result, per matcher
    pub results_counts: Vec<usize>,
    pub pairwise: Vec<PairAgreement>,
    /// Present when at least two matchers were selected
    pub all_agree: Option<usize>,
    /// Populated when at least three matchers were selected
    pub all_but_one: Vec<SubsetAgreement>,
    pub categories: Vec<CategoryAgreement>,
    pub ground_truth: GroundTruthReport,
}

impl QualitySummary {
    /// @ai:effects pure
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// @ai:intent Whether agreement sections have anything to compare
    /// @ai:effects pure
    pub fn has_agreement(&self) -> bool {
        self.matchers.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(1, 1), 100);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_labels() {
        let subset = SubsetAgreement {
            excluded: "fzf".to_string(),
            others: vec!["FuzzyMatcher".to_string(), "nucleo".to_string()],
            count: 3,
        };
        assert_eq!(subset.label(), "FuzzyMatcher + nucleo agree");

        let row = GroundTruthRow {
            category: "typo".to_string(),
            display: "Typo / misspelling".to_string(),
            top_n: 5,
            evaluated: 1,
            hits: vec![1],
        };
        assert_eq!(row.display_label(), "Typo / misspelling (top-5)");
    }
}
