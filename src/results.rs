//! @ai:module:intent Normalised matcher results shared by runner, aggregator and reporter
//! @ai:module:layer domain
//! @ai:module:public_api ResultEntry, ResultTable, TopHit, MatcherResults, UNKNOWN_SCORE
//! @ai:module:stateless true

use crate::corpus::{Query, QueryKey};
use crate::selection::MatcherId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score recorded for matchers that do not report one.
pub const UNKNOWN_SCORE: &str = "-";

/// @ai:intent One ranked hit returned by a matcher for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Rank as reported by the matcher; never recomputed
    pub rank: u32,
    /// Raw score text as emitted by the matcher
    pub score: String,
    pub symbol: String,
    pub name: String,
    /// Match classifier, only emitted by matchers with a 7+ column output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ResultEntry {
    /// @ai:effects pure
    pub fn top_hit(&self) -> TopHit<'_> {
        TopHit {
            symbol: &self.symbol,
            name: &self.name,
        }
    }
}

/// @ai:intent The (symbol, name) identity of a ranked hit, compared structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopHit<'a> {
    pub symbol: &'a str,
    pub name: &'a str,
}

/// @ai:intent Ranked entries per query key for a single matcher
/// @ai:invariant at most one entry sequence per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    entries: HashMap<QueryKey, Vec<ResultEntry>>,
}

impl ResultTable {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Append an entry to a key's sequence, preserving arrival order
    /// @ai:effects state:write
    pub fn push(&mut self, key: QueryKey, entry: ResultEntry) {
        self.entries.entry(key).or_default().push(entry);
    }

    /// @ai:intent Replace a key's whole sequence
    /// @ai:effects state:write
    pub fn insert(&mut self, key: QueryKey, entries: Vec<ResultEntry>) {
        self.entries.insert(key, entries);
    }

    /// @ai:intent Ranked entries for a key; empty when the matcher returned nothing
    /// @ai:effects pure
    pub fn get(&self, key: &QueryKey) -> &[ResultEntry] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// @ai:intent First-ranked (symbol, name) for a key, or `None` if absent
    /// @ai:effects pure
    pub fn top1(&self, key: &QueryKey) -> Option<TopHit<'_>> {
        self.get(key).first().map(ResultEntry::top_hit)
    }

    /// @ai:intent Number of keys present (including keys with an empty sequence)
    /// @ai:effects pure
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// @ai:effects pure
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// @ai:intent Count queries for which this matcher returned at least one entry
    /// @ai:effects pure
    pub fn queries_with_results(&self, queries: &[Query]) -> usize {
        queries
            .iter()
            .filter(|q| !self.get(&q.key()).is_empty())
            .count()
    }

    /// @ai:effects pure
    pub fn iter(&self) -> impl Iterator<Item = (&QueryKey, &Vec<ResultEntry>)> {
        self.entries.iter()
    }
}

impl FromIterator<(QueryKey, Vec<ResultEntry>)> for ResultTable {
    fn from_iter<I: IntoIterator<Item = (QueryKey, Vec<ResultEntry>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// @ai:intent A matcher's complete result table for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherResults {
    pub matcher: MatcherId,
    pub table: ResultTable,
}

impl MatcherResults {
    /// @ai:effects pure
    pub fn new(matcher: MatcherId, table: ResultTable) -> Self {
        Self { matcher, table }
    }

    /// @ai:effects pure
    pub fn label(&self) -> &'static str {
        self.matcher.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_queries;

    fn entry(rank: u32, score: &str, symbol: &str, name: &str) -> ResultEntry {
        ResultEntry {
            rank,
            score: score.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            kind: None,
        }
    }

    #[test]
    fn test_top1_absent_for_missing_and_empty_keys() {
        let mut table = ResultTable::new();
        let empty = QueryKey::new("zzz", "name");
        table.insert(empty.clone(), vec![]);

        assert!(table.top1(&empty).is_none());
        assert!(table.top1(&QueryKey::new("missing", "symbol")).is_none());
    }

    #[test]
    fn test_push_preserves_order_and_top1() {
        let mut table = ResultTable::new();
        let key = QueryKey::new("appl", "name");
        table.push(key.clone(), entry(1, "98", "AAPL", "Apple Inc"));
        table.push(key.clone(), entry(2, "80", "APLE", "Apple Hospitality"));

        assert_eq!(table.get(&key).len(), 2);
        assert_eq!(
            table.top1(&key),
            Some(TopHit {
                symbol: "AAPL",
                name: "Apple Inc"
            })
        );
    }

    #[test]
    fn test_queries_with_results_excludes_absent_and_empty() {
        let queries = parse_queries("AAPL\tsymbol\tx\nMSFT\tsymbol\tx\nIBM\tsymbol\tx\n");
        let mut table = ResultTable::new();
        table.push(queries[0].key(), entry(1, "1", "AAPL", "Apple Inc"));
        table.insert(queries[1].key(), vec![]);

        assert_eq!(table.queries_with_results(&queries), 1);
    }
}
