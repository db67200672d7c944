//! @ai:module:intent Drive external matchers and normalise their output
//! @ai:module:layer infrastructure
//! @ai:module:public_api MatcherRunner, BatchRunner, FilterRunner, QualityExecutor

pub mod batch;
pub mod executor;
pub mod filter;
pub mod process;

pub use batch::{encode_queries, parse_batch_output, BatchRunner};
pub use executor::QualityExecutor;
pub use filter::{candidate_list, match_filter_output, FilterRunner};
pub use process::{run_with_deadline, ProcessOutcome};

use crate::corpus::Query;
use crate::error::Result;
use crate::results::ResultTable;
use crate::selection::MatcherId;

/// @ai:intent Trait for invoking one matcher over the full query set
#[allow(async_fn_in_trait)]
pub trait MatcherRunner {
    /// @ai:intent Matcher this runner drives
    fn matcher(&self) -> MatcherId;

    /// @ai:intent Run every query and collect a result table
    async fn run(&self, queries: &[Query]) -> Result<ResultTable>;
}
