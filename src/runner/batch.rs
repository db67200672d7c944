//! @ai:module:intent Batch stdin protocol: whole query set in, ranked TSV lines out
//! @ai:module:layer infrastructure
//! @ai:module:public_api BatchRunner, parse_batch_output, encode_queries
//! @ai:module:stateless true

use crate::corpus::{Query, QueryKey};
use crate::error::{HarnessError, Result};
use crate::results::{ResultEntry, ResultTable};
use crate::runner::process::{run_with_deadline, truncate_chars, ProcessOutcome};
use crate::runner::MatcherRunner;
use crate::selection::MatcherId;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

const MIN_FIELDS: usize = 6;
const KIND_FIELDS: usize = 7;
const STDERR_PREVIEW_CHARS: usize = 300;

/// @ai:intent Serialise queries as `"{text}\t{field}\n"` lines
/// @ai:effects pure
pub fn encode_queries(queries: &[Query]) -> String {
    queries
        .iter()
        .map(|q| format!("{}\n", q.wire_line()))
        .collect()
}

/// @ai:intent Parse `query \t field \t rank \t score [\t kind] ... \t symbol \t name` lines
/// @ai:post lines with fewer than six fields or a non-numeric rank are dropped
/// @ai:effects pure
pub fn parse_batch_output(stdout: &str) -> ResultTable {
    let mut table = ResultTable::new();

    for line in stdout.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < MIN_FIELDS {
            continue;
        }

        let Ok(rank) = parts[2].trim().parse::<u32>() else {
            tracing::debug!("Dropping line with non-numeric rank: {}", line);
            continue;
        };

        let entry = ResultEntry {
            rank,
            score: parts[3].to_string(),
            symbol: parts[parts.len() - 2].to_string(),
            name: parts[parts.len() - 1].to_string(),
            kind: (parts.len() >= KIND_FIELDS).then(|| parts[4].to_string()),
        };

        table.push(QueryKey::new(parts[0], parts[1]), entry);
    }

    table
}

/// @ai:intent Runs a matcher that reads the whole query batch from stdin
pub struct BatchRunner {
    matcher: MatcherId,
    binary: PathBuf,
    corpus_file: PathBuf,
    extra_args: Vec<String>,
    deadline: Duration,
}

impl BatchRunner {
    /// @ai:intent Create a runner with the matcher's default extra arguments
    /// @ai:effects pure
    pub fn new(matcher: MatcherId, binary: PathBuf, corpus_file: PathBuf, deadline: Duration) -> Self {
        Self {
            matcher,
            binary,
            corpus_file,
            extra_args: matcher.extra_args().iter().map(|s| s.to_string()).collect(),
            deadline,
        }
    }

    /// @ai:effects pure
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(&self.corpus_file).args(&self.extra_args);
        cmd
    }
}

impl MatcherRunner for BatchRunner {
    fn matcher(&self) -> MatcherId {
        self.matcher
    }

    /// @ai:intent Invoke the matcher once and parse its output
    /// @ai:post nonzero exit is a warning; stdout is still parsed
    /// @ai:effects io
    async fn run(&self, queries: &[Query]) -> Result<ResultTable> {
        let input = encode_queries(queries);

        let outcome = run_with_deadline(self.command(), input.as_bytes(), self.deadline)
            .await
            .map_err(|source| HarnessError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let output = match outcome {
            ProcessOutcome::Finished(output) => output,
            ProcessOutcome::TimedOut => {
                return Err(HarnessError::Timeout {
                    matcher: self.matcher.label().to_string(),
                    secs: self.deadline.as_secs(),
                })
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() && !stderr.is_empty() {
            tracing::warn!(
                "{} exited with {}: {}",
                self.matcher,
                output.status,
                truncate_chars(&stderr, STDERR_PREVIEW_CHARS)
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_batch_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_queries;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_queries() {
        let queries = parse_queries("AAPL\tsymbol\texact_symbol\nAple\tname\ttypo\n");
        assert_eq!(encode_queries(&queries), "AAPL\tsymbol\nAple\tname\n");
    }

    #[test]
    fn test_parse_six_and_seven_field_lines() {
        let stdout = "AAPL\tsymbol\t1\t100\tAAPL\tApple Inc\n\
                      Aple\tname\t1\t0.92\tprefix\tAAPL\tApple Inc\n\
                      Aple\tname\t2\t0.80\tfuzzy\tAPLE\tApple Hospitality REIT\n";

        let table = parse_batch_output(stdout);

        let exact = table.get(&QueryKey::new("AAPL", "symbol"));
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].kind, None);
        assert_eq!(exact[0].score, "100");

        let typo = table.get(&QueryKey::new("Aple", "name"));
        assert_eq!(typo.len(), 2);
        assert_eq!(typo[0].kind.as_deref(), Some("prefix"));
        assert_eq!(typo[1].rank, 2);
        assert_eq!(typo[1].name, "Apple Hospitality REIT");
    }

    #[test]
    fn test_parse_drops_short_and_malformed_lines() {
        let stdout = "AAPL\tsymbol\t1\t100\tAAPL\n\
                      \n\
                      AAPL\tsymbol\tfirst\t100\tAAPL\tApple Inc\n";

        let table = parse_batch_output(stdout);
        assert!(table.is_empty());
    }

    #[cfg(unix)]
    fn write_stub(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_stub_matcher_with_extra_args() {
        let temp = tempfile::TempDir::new().unwrap();
        // Echo every query back as a rank-1 hit, tagging the score with the scorer flag.
        let stub = write_stub(
            temp.path(),
            "matcher.sh",
            r#"while IFS="$(printf '\t')" read -r q f; do
  printf '%s\t%s\t1\t%s\tSYM\t%s\n' "$q" "$f" "$3" "$q"
done"#,
        );

        let queries = parse_queries("Aple\tname\ttypo\nMSFT\tsymbol\texact_symbol\n");
        let runner = BatchRunner::new(
            MatcherId::RfPartial,
            stub,
            PathBuf::from("corpus.tsv"),
            Duration::from_secs(10),
        );

        let table = runner.run(&queries).await.unwrap();
        let hits = table.get(&QueryKey::new("Aple", "name"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, "partial_ratio");
        assert_eq!(hits[0].name, "Aple");
        assert_eq!(table.queries_with_results(&queries), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_still_parses_stdout() {
        let temp = tempfile::TempDir::new().unwrap();
        let stub = write_stub(
            temp.path(),
            "failing.sh",
            r#"printf 'AAPL\tsymbol\t1\t99\tAAPL\tApple Inc\n'
echo "index corrupted" >&2
exit 3"#,
        );

        let queries = parse_queries("AAPL\tsymbol\texact_symbol\n");
        let runner = BatchRunner::new(
            MatcherId::Nucleo,
            stub,
            PathBuf::from("corpus.tsv"),
            Duration::from_secs(10),
        );

        let table = runner.run(&queries).await.unwrap();
        assert_eq!(table.queries_with_results(&queries), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let stub = write_stub(temp.path(), "slow.sh", "sleep 5");

        let queries = parse_queries("AAPL\tsymbol\texact_symbol\n");
        let runner = BatchRunner::new(
            MatcherId::Ifrit,
            stub,
            PathBuf::from("corpus.tsv"),
            Duration::from_millis(200),
        );

        let err = runner.run(&queries).await.unwrap_err();
        assert!(matches!(err, HarnessError::Timeout { .. }));
    }
}
