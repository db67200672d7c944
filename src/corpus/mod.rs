//! @ai:module:intent Query set and instrument corpus definitions and loading
//! @ai:module:layer domain
//! @ai:module:public_api Query, QueryField, QueryKey, Instrument, CorpusLoader, category helpers

pub mod category;
pub mod loader;
pub mod query;

pub use category::{display_name, ground_truth_depth, ordered_categories, CATEGORY_ORDER};
pub use loader::{parse_instruments, parse_queries, CorpusLoader};
pub use query::{Instrument, Query, QueryField, QueryKey, SKIP_SENTINEL};
