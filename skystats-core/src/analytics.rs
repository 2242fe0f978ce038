//! The analytics engine: pure projections of a snapshot sequence into
//! derived statistics.
//!
//! Every function here is stateless; wall-clock time enters only as an
//! explicit `now` argument where trailing lookback windows need it.
//! Nothing in this module touches storage, and nothing it returns
//! outlives the call that produced it.

pub mod bucketize;
pub mod compare;
pub mod export;
pub mod patterns;
pub mod stats;
pub mod trend;

pub use bucketize::{Bucket, BucketKey, Window, bucketize};
pub use compare::{ComparisonEntry, ComparisonResult, Metric, compare};
pub use export::export;
pub use patterns::{CorrelationLabel, FieldStats, PatternResult, analyze_patterns};
pub use trend::{TrendDirection, TrendResult, analyze_trend};
