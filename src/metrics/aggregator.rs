//! @ai:module:intent Agreement and ground-truth aggregation over matcher results
//! @ai:module:layer application
//! @ai:module:public_api QualityAggregator, QualityAggregatorTrait
//! @ai:module:stateless true

use crate::corpus::{display_name, ground_truth_depth, ordered_categories, Query, QueryKey};
use crate::metrics::types::{
    CategoryAgreement, GroundTruthReport, GroundTruthRow, PairAgreement, QualitySummary,
    SubsetAgreement,
};
use crate::results::{MatcherResults, ResultTable};
use chrono::Utc;
use std::collections::HashMap;

/// @ai:intent Trait for quality aggregation
pub trait QualityAggregatorTrait: Send + Sync {
    /// @ai:intent Aggregate matcher results into a quality summary
    fn aggregate(
        &self,
        queries: &[Query],
        results: &[MatcherResults],
        corpus_size: usize,
    ) -> QualitySummary;
}

/// @ai:intent Computes agreement and ground-truth counts; holds no state
pub struct QualityAggregator;

impl QualityAggregator {
    /// @ai:intent Create a new quality aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Queries where both matchers have a top-1 and it is the same
    /// @ai:effects pure
    pub fn pairwise_agreement(queries: &[Query], a: &ResultTable, b: &ResultTable) -> usize {
        queries
            .iter()
            .filter(|q| {
                let key = q.key();
                matches!((a.top1(&key), b.top1(&key)), (Some(x), Some(y)) if x == y)
            })
            .count()
    }

    /// @ai:intent Whether every table has the same top-1 for a query
    /// @ai:post false when any table has no result or there are no tables
    /// @ai:effects pure
    fn unanimous(query: &Query, tables: &[&ResultTable]) -> bool {
        let key = query.key();
        let mut tops = tables.iter().map(|t| t.top1(&key));

        let Some(Some(first)) = tops.next() else {
            return false;
        };
        tops.all(|t| t == Some(first))
    }

    /// @ai:intent Queries on which every given matcher agrees
    /// @ai:effects pure
    pub fn all_agree(queries: &[Query], tables: &[&ResultTable]) -> usize {
        queries
            .iter()
            .filter(|q| Self::unanimous(q, tables))
            .count()
    }

    /// @ai:intent Reference (first) matcher versus each other matcher, per category
    /// @ai:pre at least two tables
    /// @ai:effects pure
    pub fn category_agreement(queries: &[Query], tables: &[&ResultTable]) -> Vec<CategoryAgreement> {
        let by_category = group_by_category(queries);
        let Some((reference, others)) = tables.split_first() else {
            return vec![];
        };

        ordered_categories(by_category.keys().copied())
            .into_iter()
            .map(|category| {
                let members = by_category
                    .get(category.as_str())
                    .cloned()
                    .unwrap_or_default();

                let pair_counts = others
                    .iter()
                    .map(|other| {
                        members
                            .iter()
                            .filter(|q| {
                                let key = q.key();
                                matches!(
                                    (reference.top1(&key), other.top1(&key)),
                                    (Some(x), Some(y)) if x == y
                                )
                            })
                            .count()
                    })
                    .collect();

                let all_agree = members
                    .iter()
                    .filter(|q| Self::unanimous(q, tables))
                    .count();

                CategoryAgreement {
                    display: display_name(&category).to_string(),
                    queries: members.len(),
                    category,
                    pair_counts,
                    all_agree,
                }
            })
            .collect()
    }

    /// @ai:intent Whether the expected name occurs in any of the first `top_n` names
    /// @ai:post case-insensitive substring match
    /// @ai:effects pure
    pub fn ground_truth_hit(table: &ResultTable, query: &Query, expected: &str, top_n: usize) -> bool {
        let expected = expected.to_lowercase();
        table
            .get(&query.key())
            .iter()
            .take(top_n)
            .any(|entry| entry.name.to_lowercase().contains(&expected))
    }

    /// @ai:intent Per-category and total ground-truth hits for each matcher
    /// @ai:post repeated `(text, field)` lines count once; the last line's category and expected name win
    /// @ai:post skipped is every query line not evaluated, duplicates included
    /// @ai:effects pure
    pub fn ground_truth(queries: &[Query], tables: &[&ResultTable]) -> GroundTruthReport {
        let mut latest: HashMap<QueryKey, &Query> = HashMap::new();
        for query in queries {
            latest.insert(query.key(), query);
        }

        let (evaluated, unevaluated): (Vec<&Query>, Vec<&Query>) =
            latest.into_values().partition(|q| q.expected.is_some());
        let skipped = queries.len() - evaluated.len();
        let skipped_categories =
            ordered_categories(unevaluated.iter().map(|q| q.category.as_str()));

        let mut by_category: HashMap<&str, Vec<&Query>> = HashMap::new();
        for query in evaluated.iter().copied() {
            by_category
                .entry(query.category.as_str())
                .or_default()
                .push(query);
        }

        let mut total_hits = vec![0; tables.len()];
        let rows: Vec<GroundTruthRow> = ordered_categories(by_category.keys().copied())
            .into_iter()
            .map(|category| {
                let members = by_category
                    .get(category.as_str())
                    .cloned()
                    .unwrap_or_default();
                let top_n = ground_truth_depth(&category);

                let hits: Vec<usize> = tables
                    .iter()
                    .map(|table| {
                        members
                            .iter()
                            .filter(|q| {
                                q.expected.as_deref().is_some_and(|expected| {
                                    Self::ground_truth_hit(table, q, expected, top_n)
                                })
                            })
                            .count()
                    })
                    .collect();

                for (total, h) in total_hits.iter_mut().zip(&hits) {
                    *total += h;
                }

                GroundTruthRow {
                    display: display_name(&category).to_string(),
                    category,
                    top_n,
                    evaluated: members.len(),
                    hits,
                }
            })
            .collect();

        GroundTruthReport {
            rows,
            total_evaluated: evaluated.len(),
            total_hits,
            skipped,
            skipped_categories,
        }
    }
}

impl Default for QualityAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityAggregatorTrait for QualityAggregator {
    fn aggregate(
        &self,
        queries: &[Query],
        results: &[MatcherResults],
        corpus_size: usize,
    ) -> QualitySummary {
        let tables: Vec<&ResultTable> = results.iter().map(|r| &r.table).collect();
        let labels: Vec<String> = results.iter().map(|r| r.label().to_string()).collect();

        let results_counts = tables
            .iter()
            .map(|t| t.queries_with_results(queries))
            .collect();

        let mut pairwise = Vec::new();
        for i in 0..results.len() {
            for j in (i + 1)..results.len() {
                pairwise.push(PairAgreement {
                    a: labels[i].clone(),
                    b: labels[j].clone(),
                    count: Self::pairwise_agreement(queries, tables[i], tables[j]),
                });
            }
        }

        let all_agree = (tables.len() >= 2).then(|| Self::all_agree(queries, &tables));

        let all_but_one = if tables.len() >= 3 {
            (0..tables.len())
                .map(|excluded| {
                    let others: Vec<&ResultTable> = tables
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != excluded)
                        .map(|(_, t)| *t)
                        .collect();
                    SubsetAgreement {
                        excluded: labels[excluded].clone(),
                        others: labels
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != excluded)
                            .map(|(_, l)| l.clone())
                            .collect(),
                        count: Self::all_agree(queries, &others),
                    }
                })
                .collect()
        } else {
            vec![]
        };

        let categories = if tables.len() >= 2 {
            Self::category_agreement(queries, &tables)
        } else {
            vec![]
        };

        QualitySummary {
            timestamp: Utc::now(),
            corpus_size,
            query_count: queries.len(),
            matchers: labels,
            results_counts,
            pairwise,
            all_agree,
            all_but_one,
            categories,
            ground_truth: Self::ground_truth(queries, &tables),
        }
    }
}

/// @ai:effects pure
fn group_by_category(queries: &[Query]) -> HashMap<&str, Vec<&Query>> {
    let mut groups: HashMap<&str, Vec<&Query>> = HashMap::new();
    for query in queries {
        groups.entry(query.category.as_str()).or_default().push(query);
    }
    groups
}
