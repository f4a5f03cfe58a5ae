#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};
use std::sync::Arc;
use zaptec_rs::model::SensorSnapshot;
use zaptec_rs::platform::Platform;
use zaptec_rs::settings;

mod metrics;

/// Structure containing state for API handlers.
pub struct StateData {
    platform: Arc<Platform>,
}

#[get("/metrics")]
async fn metrics_route(state: &State<StateData>) -> Result<String, zaptec_rs::Error> {
    metrics::collect(&state.platform);
    metrics::read()
}

#[get("/sensors")]
async fn sensors_route(state: &State<StateData>) -> Json<Vec<SensorSnapshot>> {
    Json(state.platform.snapshots())
}

#[get("/sensors/<unique_id>")]
async fn sensor_route(state: &State<StateData>, unique_id: &str) -> Option<Json<SensorSnapshot>> {
    state
        .platform
        .get(unique_id)
        .map(|sensor| Json(sensor.snapshot()))
}

fn rocket(platform: Arc<Platform>) -> Rocket<Build> {
    rocket::build()
        .manage(StateData { platform })
        .mount("/", routes![metrics_route, sensors_route, sensor_route])
}

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    env_logger::init();

    let settings = match settings::read_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let platform = Arc::new(Platform::new());
    zaptec_rs::setup_platform(reqwest::Client::new(), settings.api(), platform.as_ref()).await;
    let _updates = platform.schedule(settings.scan_interval());

    log::info!(
        "Updating {} sensors every {} seconds",
        platform.sensors().len(),
        settings.interval
    );

    rocket(platform).launch().await?;
    Ok(())
}
