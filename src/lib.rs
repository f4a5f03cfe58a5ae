pub mod api;
pub mod model;
pub mod platform;
pub mod resample;
pub mod sensor;
pub mod settings;

use model::MetricKind;
use platform::AddEntities;
use sensor::Sensor;

pub use api::Error;

use std::sync::Arc;

/// Build one sensor per metric of the installation configured in `api` and register them.
///
/// Sensors share `client` and `api`; the host refreshes them before they are first shown.
pub async fn setup_platform<A: AddEntities>(client: reqwest::Client, api: model::Api, add_entities: &A) {
    let api = Arc::new(api);
    let sensors = MetricKind::ALL
        .iter()
        .map(|kind| Sensor::new(client.clone(), api.clone(), *kind))
        .collect();

    add_entities.add_entities(sensors, true).await;
}
