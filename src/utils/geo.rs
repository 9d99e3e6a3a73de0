//! Geodesy helpers
//!
//! Great-circle distance used by the earthquake proximity filter.

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

use crate::models::Location;

/// Haversine great-circle distance between two locations, in kilometers.
///
/// Malformed input measures as infinitely distant instead of raising, so
/// the proximity filter degrades to "no nearby events". The haversine term
/// is clamped into [0, 1] before the square roots, which keeps antipodal
/// and identical points out of the domain-error zone.
pub fn haversine_km(a: Location, b: Location) -> f64 {
    if !a.is_valid() || !b.is_valid() {
        return f64::INFINITY;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
