//! @ai:module:intent Fuzzy matcher quality harness library
//! @ai:module:layer application
//! @ai:module:public_api config, corpus, selection, runner, snapshot, metrics, report, toolchain

pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod report;
pub mod results;
pub mod runner;
pub mod selection;
pub mod snapshot;
pub mod toolchain;

pub use config::QualityConfig;
pub use corpus::{CorpusLoader, Instrument, Query, QueryKey};
pub use error::{HarnessError, Result};
pub use metrics::{QualityAggregator, QualitySummary};
pub use report::{ConsoleReport, ReportGenerator};
pub use results::{MatcherResults, ResultEntry, ResultTable};
pub use runner::{BatchRunner, FilterRunner, MatcherRunner, QualityExecutor};
pub use selection::{MatcherId, Selection};
pub use snapshot::SnapshotStore;
pub use toolchain::{HarnessBuilder, ToolchainStatus};
