use crate::model::SensorSnapshot;
use crate::sensor::Sensor;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Registration callback handed to [`crate::setup_platform`].
pub trait AddEntities {
    /// Take ownership of `sensors`; with `update_before_add` each one is refreshed first.
    fn add_entities(&self, sensors: Vec<Sensor>, update_before_add: bool) -> impl Future<Output = ()> + Send;
}

/// Sensors registered by the integration, shared between the scheduler and HTTP handlers.
#[derive(Debug, Default)]
pub struct Platform {
    sensors: RwLock<Vec<Arc<Sensor>>>,
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensors(&self) -> Vec<Arc<Sensor>> {
        match self.sensors.read() {
            Ok(sensors) => sensors.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn get(&self, unique_id: &str) -> Option<Arc<Sensor>> {
        self.sensors()
            .into_iter()
            .find(|sensor| sensor.unique_id() == unique_id)
    }

    pub fn snapshots(&self) -> Vec<SensorSnapshot> {
        self.sensors().iter().map(|sensor| sensor.snapshot()).collect()
    }

    /// Refresh every registered sensor each `scan_interval`, one task per sensor.
    ///
    /// The first refresh happens one interval from now; registration already performed the
    /// initial one.
    pub fn schedule(&self, scan_interval: Duration) -> Vec<JoinHandle<()>> {
        self.sensors()
            .into_iter()
            .map(|sensor| {
                tokio::spawn(async move {
                    let mut interval = time::interval_at(Instant::now() + scan_interval, scan_interval);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        interval.tick().await;
                        log::debug!("Updating {}", sensor.unique_id());
                        sensor.update().await;
                    }
                })
            })
            .collect()
    }
}

impl AddEntities for Platform {
    async fn add_entities(&self, sensors: Vec<Sensor>, update_before_add: bool) {
        let sensors: Vec<Arc<Sensor>> = sensors.into_iter().map(Arc::new).collect();

        if update_before_add {
            let updates: Vec<JoinHandle<()>> = sensors
                .iter()
                .cloned()
                .map(|sensor| tokio::spawn(async move { sensor.update().await }))
                .collect();
            for update in updates {
                if let Err(e) = update.await {
                    log::error!("Initial sensor update did not complete: {}", e);
                }
            }
        }

        for sensor in &sensors {
            log::info!(
                "Registered {} ({}), available: {}",
                sensor.name(),
                sensor.unique_id(),
                sensor.available()
            );
        }

        match self.sensors.write() {
            Ok(mut registered) => registered.extend(sensors),
            Err(poisoned) => poisoned.into_inner().extend(sensors),
        }
    }
}
