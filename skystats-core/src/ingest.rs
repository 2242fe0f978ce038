use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod openweather;

/// One current observation as reported by an upstream provider, before it
/// is tied to a registered location.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Canonical location name as the provider spells it.
    pub location_name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub temperature_c: f64,
    pub humidity_pct: Option<u8>,
    pub pressure_hpa: Option<u32>,
    pub condition: Option<String>,
    pub observed_at: DateTime<Utc>,
}

/// Upstream source of current observations. The analytics engine never
/// calls this; only the ingest path does.
#[async_trait]
pub trait ObservationSource: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> anyhow::Result<Observation>;
}
