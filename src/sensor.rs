use crate::api::{self, response::EnergySensorData, Error};
use crate::model::{Api, MetricKind, Reading, SensorSnapshot, TelemetryWindow, KW};
use crate::resample;
use chrono::Utc;
use reqwest::Client;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One Zaptec metric, refreshed by the host through [`Sensor::update`].
#[derive(Debug)]
pub struct Sensor {
    client: Client,
    api: Arc<Api>,
    kind: MetricKind,
    unique_id: String,
    name: String,
    reading: Mutex<Reading>,
}

impl Sensor {
    pub fn new(client: Client, api: Arc<Api>, kind: MetricKind) -> Self {
        let unique_id = format!("{}_{}", api.installation_id, kind);
        Sensor {
            client,
            api,
            kind,
            unique_id,
            name: format!("Zaptec {}", kind),
            reading: Mutex::new(Reading::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn unit_of_measurement(&self) -> &'static str {
        self.kind.unit_of_measurement()
    }

    pub fn available(&self) -> bool {
        self.lock_reading().available
    }

    pub fn state(&self) -> Option<KW> {
        self.lock_reading().value
    }

    pub fn reading(&self) -> Reading {
        *self.lock_reading()
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        let reading = self.reading();
        SensorSnapshot {
            name: self.name.clone(),
            unique_id: self.unique_id.clone(),
            kind: self.kind,
            available: reading.available,
            state: reading.value,
            unit_of_measurement: self.unit_of_measurement(),
        }
    }

    fn lock_reading(&self) -> MutexGuard<'_, Reading> {
        self.reading.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Authenticate, fetch the last three hours of telemetry and aggregate it for this metric.
    pub async fn fetch(&self) -> Result<KW, Error> {
        let token = api::authenticate(&self.client, &self.api).await?;
        let window = TelemetryWindow::ending_at(Utc::now());
        let data = api::energy_sensor_data(&self.client, &self.api, &token, &window).await?;
        aggregate(self.kind, &data)
    }

    /// Refresh the reading. Failures only flip availability; the previous value is kept.
    pub async fn update(&self) {
        let result = self.fetch().await;
        self.apply(result);
    }

    pub fn apply(&self, result: Result<KW, Error>) {
        let mut reading = self.lock_reading();
        match result {
            Ok(value) => {
                log::debug!("{}: {} {}", self.unique_id, value, self.unit_of_measurement());
                reading.value = Some(value);
                reading.available = true;
            }
            Err(e) => {
                log::error!("Error retrieving data from Zaptec for {}: {}", self.unique_id, e);
                reading.available = false;
            }
        }
    }
}

/// Reduce a telemetry response to the current value of `kind`.
pub fn aggregate(kind: MetricKind, data: &EnergySensorData) -> Result<KW, Error> {
    let value = match kind {
        MetricKind::Power => resample::last_mean(data.power_samples(), resample::resample_width()),
        MetricKind::Charge => resample::last_mean(data.charge_samples(), resample::resample_width()),
        MetricKind::TotalEnergy => Ok(data.latest_total_energy()),
    }
    .map_err(|e| Error::InvalidResponse(format!("{} series", kind), e.to_string()))?;
    value.ok_or(Error::EmptyData(kind))
}
