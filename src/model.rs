use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

pub type KW = f64;

pub const API_URL: &str = "https://api.zaptec.com";

/// Unit reported by every sensor.
///
/// Charge and total energy are labelled with the power unit too.
pub const UNIT_OF_MEASUREMENT: &str = "kW";

#[derive(Debug, Clone)]
pub struct Api {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub installation_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Power,
    Charge,
    TotalEnergy,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Power, MetricKind::Charge, MetricKind::TotalEnergy];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Power => "power",
            MetricKind::Charge => "charge",
            MetricKind::TotalEnergy => "total_energy",
        }
    }

    pub fn unit_of_measurement(&self) -> &'static str {
        UNIT_OF_MEASUREMENT
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bearer token returned by the password grant. Fetched on every update, never stored.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Time range of a single `energySensorData` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TelemetryWindow {
    pub fn span() -> Duration {
        Duration::hours(3)
    }

    /// Window covering the three hours up to `now`.
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        TelemetryWindow {
            from: now - Self::span(),
            to: now,
        }
    }

    pub fn from_param(&self) -> String {
        format_timestamp(&self.from)
    }

    pub fn to_param(&self) -> String {
        format_timestamp(&self.to)
    }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Last observed outcome of a sensor update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: Option<KW>,
    pub available: bool,
}

impl Default for Reading {
    fn default() -> Self {
        Reading {
            value: None,
            available: true,
        }
    }
}

/// Point-in-time view of a sensor as presented to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub name: String,
    pub unique_id: String,
    pub kind: MetricKind,
    pub available: bool,
    pub state: Option<KW>,
    pub unit_of_measurement: &'static str,
}
