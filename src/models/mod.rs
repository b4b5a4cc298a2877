mod reading;
mod sensor;

pub use reading::{SensorReading, TemperatureReading, VelocityReading};
pub use sensor::{AssembledSensor, SensorCreate, SensorIdentity, SensorMetadata, SensorType};
