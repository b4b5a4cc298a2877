pub mod geo;
mod sensors;

pub use sensors::{SensorService, MAX_PAGE_LIMIT};
