//! Demand scoring for ingredient-combination content.
//!
//! Takes the videos a platform search returned for a set of ingredients, plus
//! an optional search-trend signal, and decides how much audience demand
//! exists, how hard the market is to enter, and what kind of video would fill
//! a gap. Scoring is pure and synchronous: no I/O, no shared mutable state,
//! and an explicit evaluation clock via [`ScoringContext`].

pub mod barrier;
pub mod calibration;
pub mod classifier;
pub mod composer;
pub mod freshness;
pub mod matcher;
pub mod metrics;
pub mod opportunities;
pub mod opportunity_score;
pub mod pipeline;
pub mod quality;
pub mod relevance;
pub mod types;

mod stats;

pub use calibration::{
    CalibrationBucket, CalibrationError, CalibrationFile, CalibrationSource, StaticCalibration,
};
pub use matcher::{matches, AliasTable};
pub use pipeline::{compute_demand_signal, compute_demand_signal_with, ScoringContext};
pub use types::{
    ContentGap, ContentOpportunity, DemandBand, DemandSignal, FreshnessAnalysis, MarketMetrics,
    MarketType, OpportunityKind, Priority, QualityDistribution, SearchTerms,
};
