//! Radius queries approximated as a lat/lon box.
//!
//! One degree of latitude is taken as 111.12 km and the same figure is used
//! for longitude, so the box is only square-ish near the equator. The box is
//! inclusive on every edge and is never trimmed down to a circle.

/// Kilometres per degree of latitude at the equator.
pub const KM_PER_DEGREE: f64 = 111.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Box of half-width `radius_km` (converted to degrees) around a point.
    #[must_use]
    pub fn around(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        let delta = radius_to_degrees(radius_km);
        Self {
            lat_min: latitude - delta,
            lat_max: latitude + delta,
            lon_min: longitude - delta,
            lon_max: longitude + delta,
        }
    }

    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

#[must_use]
pub fn radius_to_degrees(radius_km: f64) -> f64 {
    radius_km / KM_PER_DEGREE
}
