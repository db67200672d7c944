//! @ai:module:intent Agreement and ground-truth metrics
//! @ai:module:layer application
//! @ai:module:public_api QualitySummary, QualityAggregator, GroundTruthReport, CategoryAgreement

pub mod aggregator;
pub mod types;

pub use aggregator::{QualityAggregator, QualityAggregatorTrait};
pub use types::{
    percent, CategoryAgreement, GroundTruthReport, GroundTruthRow, PairAgreement, QualitySummary,
    SubsetAgreement,
};
