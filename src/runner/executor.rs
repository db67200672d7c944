//! @ai:module:intent Sequential execution of every selected matcher
//! @ai:module:layer application
//! @ai:module:public_api QualityExecutor
//! @ai:module:stateless false

use crate::config::QualityConfig;
use crate::corpus::{Instrument, Query};
use crate::error::Result;
use crate::results::MatcherResults;
use crate::runner::batch::BatchRunner;
use crate::runner::filter::FilterRunner;
use crate::runner::MatcherRunner;
use crate::selection::{MatcherId, Protocol, Selection};

/// @ai:intent Runs selected matchers one after another against the shared query set
pub struct QualityExecutor<'a> {
    config: &'a QualityConfig,
    instruments: &'a [Instrument],
    filter_available: bool,
}

impl<'a> QualityExecutor<'a> {
    /// @ai:intent Create an executor over the loaded corpus
    /// @ai:effects pure
    pub fn new(config: &'a QualityConfig, instruments: &'a [Instrument], filter_available: bool) -> Self {
        Self {
            config,
            instruments,
            filter_available,
        }
    }

    /// @ai:intent Run a single matcher through the protocol it speaks
    /// @ai:effects io
    async fn execute_one(&self, matcher: MatcherId, queries: &[Query]) -> Result<MatcherResults> {
        let binary = self.config.binary_for(matcher);

        match matcher.protocol() {
            Protocol::Batch => {
                let runner = BatchRunner::new(
                    matcher,
                    binary,
                    self.config.paths.corpus_file.clone(),
                    self.config.run.batch_deadline(matcher),
                );
                collect(&runner, queries).await
            }
            Protocol::Filter => {
                let runner = FilterRunner::new(
                    matcher,
                    binary,
                    self.instruments,
                    self.config.run.filter_deadline(),
                    self.config.run.filter_max_lines,
                )
                .with_availability(self.filter_available);
                collect(&runner, queries).await
            }
        }
    }

    /// @ai:intent Execute all selected matchers in selection order
    /// @ai:post a batch timeout aborts the whole run
    /// @ai:effects io
    pub async fn execute_all(
        &self,
        selection: &Selection,
        queries: &[Query],
    ) -> Result<Vec<MatcherResults>> {
        let mut all_results = Vec::with_capacity(selection.matchers.len());
        let total = selection.matchers.len();

        for (i, matcher) in selection.matchers.iter().enumerate() {
            tracing::info!("[{}/{}] Running {}...", i + 1, total, matcher);

            let started = std::time::Instant::now();
            let results = self.execute_one(*matcher, queries).await?;

            tracing::info!(
                "  Got results for {} queries in {:.1}s",
                results.table.queries_with_results(queries),
                started.elapsed().as_secs_f64()
            );
            all_results.push(results);
        }

        Ok(all_results)
    }
}

/// @ai:effects io
async fn collect(runner: &impl MatcherRunner, queries: &[Query]) -> Result<MatcherResults> {
    let table = runner.run(queries).await?;
    Ok(MatcherResults::new(runner.matcher(), table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{parse_instruments, parse_queries};
    use crate::selection::MatcherFlags;

    #[tokio::test]
    async fn test_unavailable_filter_only_run() {
        let config = QualityConfig::default();
        let instruments = parse_instruments("symbol\tname\tisin\nAAPL\tApple Inc\tUS0378331005\n");
        let queries = parse_queries("AAPL\tsymbol\texact_symbol\nAple\tname\ttypo\tApple Inc\n");
        let selection = Selection::from_flags(
            &MatcherFlags {
                fzf: true,
                ..Default::default()
            },
            true,
        );

        let executor = QualityExecutor::new(&config, &instruments, false);
        let results = executor.execute_all(&selection, &queries).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matcher, MatcherId::Fzf);
        assert_eq!(results[0].table.len(), 2);
        assert_eq!(results[0].table.queries_with_results(&queries), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_batch_matchers_run_in_selection_order() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let tool_dir = temp.path().join("quality-fuzzymatch");
        std::fs::create_dir_all(&tool_dir).unwrap();
        let stub = tool_dir.join("stub.sh");
        std::fs::write(
            &stub,
            "#!/bin/sh\nwhile IFS=\"$(printf '\\t')\" read -r q f; do printf '%s\\t%s\\t1\\t9\\tAAPL\\tApple Inc\\n' \"$q\" \"$f\"; done\n",
        )
        .unwrap();
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = QualityConfig::default();
        config.paths.harness_dir = temp.path().to_path_buf();
        config.tools.fuzzymatch.binary = "stub.sh".into();

        let queries = parse_queries("Aple\tname\ttypo\tApple Inc\n");
        let selection = Selection::from_flags(
            &MatcherFlags {
                fm: true,
                ..Default::default()
            },
            true,
        );

        let executor = QualityExecutor::new(&config, &[], true);
        let results = executor.execute_all(&selection, &queries).await.unwrap();

        let order: Vec<_> = results.iter().map(|r| r.matcher).collect();
        assert_eq!(order, vec![MatcherId::FuzzyMatcher, MatcherId::FmSw]);
        assert!(results
            .iter()
            .all(|r| r.table.queries_with_results(&queries) == 1));
    }
}
