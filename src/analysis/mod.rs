//! Analysis modules.
//!
//! Tally and duration aggregation over the loaded incident records.

pub mod aggregator;
pub mod duration;

pub use aggregator::*;
pub use duration::DurationPolicy;
