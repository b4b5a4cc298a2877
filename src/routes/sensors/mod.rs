mod handlers;
mod types;

pub use handlers::{
    deregister_sensor, get_reading, get_sensor, list_sensors, record_reading, register_sensor,
    sensors_near,
};
pub use types::{IdentityResponse, ListQuery, NearQuery, SensorResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_deregister_sensor, __path_get_reading, __path_get_sensor, __path_list_sensors,
    __path_record_reading, __path_register_sensor, __path_sensors_near,
};
