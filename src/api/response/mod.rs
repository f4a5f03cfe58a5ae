pub mod energy_sensor_data;
mod timestamp;
pub mod token;

pub use energy_sensor_data::EnergySensorData;
pub use token::Token;
