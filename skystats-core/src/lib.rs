//! Core library for the `skystats` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The snapshot repository abstraction and its file-backed archive
//! - An ingest source for the upstream weather provider
//! - The analytics engine: windowed bucketing, trend classification,
//!   humidity/pressure patterns, multi-location comparison, and
//!   bounded-range export
//!
//! It is used by `skystats-cli`, but can also be reused by other binaries
//! or services.

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod repository;
pub mod service;
pub mod validate;

pub use analytics::{
    Bucket, BucketKey, ComparisonEntry, ComparisonResult, CorrelationLabel, FieldStats, Metric,
    PatternResult, TrendDirection, TrendResult, Window, analyze_patterns, analyze_trend,
    bucketize, compare, export,
};
pub use config::Config;
pub use error::AnalyticsError;
pub use ingest::{Observation, ObservationSource};
pub use model::{Granularity, Location, Snapshot};
pub use repository::SnapshotRepository;
pub use service::{AnalyticsService, ExportReport};
