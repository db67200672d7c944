//! @ai:module:intent Per-query filter protocol (fzf-style `--filter <query>`)
//! @ai:module:layer infrastructure
//! @ai:module:public_api FilterRunner, candidate_list, match_filter_output
//! @ai:module:stateless true

use crate::corpus::{Instrument, Query, QueryField};
use crate::error::{HarnessError, Result};
use crate::results::{ResultEntry, ResultTable, UNKNOWN_SCORE};
use crate::runner::process::{run_with_deadline, ProcessOutcome};
use crate::runner::MatcherRunner;
use crate::selection::MatcherId;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// @ai:intent Newline-joined corpus column the filter ranks for a field
/// @ai:effects pure
pub fn candidate_list(instruments: &[Instrument], field: &QueryField) -> String {
    instruments
        .iter()
        .map(|inst| inst.column(field))
        .collect::<Vec<_>>()
        .join("\n")
}

/// @ai:intent Map filter output lines back to corpus records
/// @ai:post at most `max_lines` output lines are considered; repeated values are skipped
/// @ai:post ranks are synthetic and 1-based, scores are unknown
/// @ai:effects pure
pub fn match_filter_output(
    stdout: &str,
    instruments: &[Instrument],
    field: &QueryField,
    max_lines: usize,
) -> Vec<ResultEntry> {
    let mut matches: Vec<ResultEntry> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for line in stdout.trim().lines().take(max_lines) {
        if line.is_empty() || seen.contains(line) {
            continue;
        }

        if let Some(inst) = instruments.iter().find(|inst| inst.column(field) == line) {
            seen.insert(inst.column(field));
            matches.push(ResultEntry {
                rank: matches.len() as u32 + 1,
                score: UNKNOWN_SCORE.to_string(),
                symbol: inst.symbol.clone(),
                name: inst.name.clone(),
                kind: None,
            });
        }
    }

    matches
}

/// @ai:intent Runs one filter process per query against corpus candidates
pub struct FilterRunner<'a> {
    matcher: MatcherId,
    binary: PathBuf,
    instruments: &'a [Instrument],
    deadline: Duration,
    max_lines: usize,
    available: bool,
}

impl<'a> FilterRunner<'a> {
    /// @ai:intent Create a filter runner over the loaded corpus
    /// @ai:effects pure
    pub fn new(
        matcher: MatcherId,
        binary: PathBuf,
        instruments: &'a [Instrument],
        deadline: Duration,
        max_lines: usize,
    ) -> Self {
        Self {
            matcher,
            binary,
            instruments,
            deadline,
            max_lines,
            available: true,
        }
    }

    /// @ai:intent Record the availability probe result; unavailable means every query is empty
    /// @ai:effects pure
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// @ai:intent Filter one query; timeouts and a missing binary yield no entries
    /// @ai:effects io
    async fn run_single(&self, query: &Query) -> Result<Vec<ResultEntry>> {
        let candidates = candidate_list(self.instruments, &query.field);

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--filter").arg(&query.text);

        let outcome = match run_with_deadline(cmd, candidates.as_bytes(), self.deadline).await {
            Ok(outcome) => outcome,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} not found, no results for {:?}", self.binary.display(), query.text);
                return Ok(vec![]);
            }
            Err(source) => {
                return Err(HarnessError::Spawn {
                    binary: self.binary.clone(),
                    source,
                })
            }
        };

        match outcome {
            ProcessOutcome::Finished(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(match_filter_output(
                    &stdout,
                    self.instruments,
                    &query.field,
                    self.max_lines,
                ))
            }
            ProcessOutcome::TimedOut => {
                tracing::debug!("{} timed out on {:?}", self.matcher, query.text);
                Ok(vec![])
            }
        }
    }
}

impl MatcherRunner for FilterRunner<'_> {
    fn matcher(&self) -> MatcherId {
        self.matcher
    }

    /// @ai:intent Filter every query in turn, one process per query
    /// @ai:post every query key is present, possibly with an empty list
    /// @ai:effects io
    async fn run(&self, queries: &[Query]) -> Result<ResultTable> {
        let mut table = ResultTable::new();

        for query in queries {
            let entries = if self.available {
                self.run_single(query).await?
            } else {
                vec![]
            };
            table.insert(query.key(), entries);
        }

        Ok(table)
    }
}
