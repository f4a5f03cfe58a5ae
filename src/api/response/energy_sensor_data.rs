use chrono::{DateTime, Utc};
use serde::Deserialize;

/* Instantaneous power sample, irregular intervals */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reading {
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub power: f64,
}

/* Energy charged within the interval starting at `interval_start` */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChargeEnergy {
    #[serde(with = "super::timestamp")]
    pub interval_start: DateTime<Utc>,
    pub value: f64,
}

/* Cumulative meter total, oldest first */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TotalEnergy {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnergySensorData {
    pub readings: Vec<Reading>,
    pub charge_energy: Vec<ChargeEnergy>,
    pub total_energy: Vec<TotalEnergy>,
}

impl EnergySensorData {
    pub fn power_samples(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.readings.iter().map(|r| (r.timestamp, r.power))
    }

    pub fn charge_samples(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.charge_energy.iter().map(|c| (c.interval_start, c.value))
    }

    pub fn latest_total_energy(&self) -> Option<f64> {
        self.total_energy.last().map(|t| t.value)
    }
}
