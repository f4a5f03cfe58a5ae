pub type Endpoint = str;

pub const TOKEN: &Endpoint = "/oauth/token";

/// `/api/installation/{installation_id}/energySensorData`
pub fn energy_sensor_data(installation_id: &str) -> String {
    format!("/api/installation/{}/energySensorData", installation_id)
}
