use prometheus::{Encoder, GaugeVec, TextEncoder};
use zaptec_rs::platform::Platform;
use zaptec_rs::sensor::Sensor;

lazy_static! {
    static ref SENSOR_VALUE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "zaptec_sensor_value",
            "last value reported by a Zaptec sensor, kept while the sensor is unavailable",
        ),
        &["unique_id", "kind", "unit"],
    )
    .unwrap();
    static ref SENSOR_AVAILABLE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "zaptec_sensor_available",
            "1 if the last update of a Zaptec sensor succeeded, 0 otherwise",
        ),
        &["unique_id", "kind"],
    )
    .unwrap();
}

/// Feed the current reading of `sensor` to Prometheus metrics.
fn process_sensor(sensor: &Sensor) {
    let reading = sensor.reading();
    let kind = sensor.kind().to_string();

    if let Some(value) = reading.value {
        SENSOR_VALUE_GAUGE
            .with_label_values(&[sensor.unique_id(), &kind, sensor.unit_of_measurement()])
            .set(value);
    }

    SENSOR_AVAILABLE_GAUGE
        .with_label_values(&[sensor.unique_id(), &kind])
        .set(if reading.available { 1.0 } else { 0.0 });
}

/// Copy every registered sensor into the Prometheus exporter registry.
pub fn collect(platform: &Platform) {
    for sensor in platform.sensors() {
        process_sensor(&sensor);
    }
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, zaptec_rs::Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(zaptec_rs::Error::FormatError))?;
    String::from_utf8(buffer).or(Err(zaptec_rs::Error::FormatError))
}
