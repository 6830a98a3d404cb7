// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Observer coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, for the geometric horizon dip.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic position of an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Geodetic latitude in degrees, north positive.
    pub latitude: f64,
    /// Geodetic longitude in degrees, east positive.
    pub longitude: f64,
    /// Height above mean sea level in meters.
    #[serde(default)]
    pub elevation: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Geometric dip of the horizon in degrees, `sqrt(2h/R)`.
    ///
    /// Zero at or below sea level.
    pub fn horizon_dip_deg(&self) -> f64 {
        if self.elevation <= 0.0 {
            return 0.0;
        }
        (2.0 * self.elevation / EARTH_RADIUS_M).sqrt().to_degrees()
    }
}

/// A named observer position, as shown on screen and persisted in settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(flatten)]
    pub coordinate: GeoCoordinate,
}

impl Location {
    /// Name given to positions reported by the device.
    pub const LOCAL_NAME: &'static str = "Lokal plats";

    pub fn new(name: impl Into<String>, coordinate: GeoCoordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }

    /// Stockholm, the location used whenever none is configured.
    pub fn stockholm() -> Self {
        Self::new("Stockholm", GeoCoordinate::new(59.3293, 18.0686, 0.0))
    }

    /// A device-reported position.
    pub fn local(coordinate: GeoCoordinate) -> Self {
        Self::new(Self::LOCAL_NAME, coordinate)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::stockholm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stockholm() {
        let loc = Location::default();
        assert_eq!(loc.name, "Stockholm");
        assert_eq!(loc.coordinate, GeoCoordinate::new(59.3293, 18.0686, 0.0));
    }

    #[test]
    fn dip_grows_with_elevation() {
        assert_eq!(GeoCoordinate::new(0.0, 0.0, 0.0).horizon_dip_deg(), 0.0);
        assert_eq!(GeoCoordinate::new(0.0, 0.0, -20.0).horizon_dip_deg(), 0.0);
        // ≈ 1.76° at 3000 m
        let dip = GeoCoordinate::new(0.0, 0.0, 3000.0).horizon_dip_deg();
        assert!((dip - 1.76).abs() < 0.01, "dip = {dip}");
    }

    #[test]
    fn location_serializes_flat() {
        let json = serde_json::to_value(Location::stockholm()).unwrap();
        assert_eq!(json["name"], "Stockholm");
        assert_eq!(json["latitude"], 59.3293);
        assert_eq!(json["elevation"], 0.0);
    }

    #[test]
    fn missing_elevation_defaults_to_zero() {
        let loc: Location =
            serde_json::from_str(r#"{"name":"x","latitude":1.5,"longitude":2.5}"#).unwrap();
        assert_eq!(loc.coordinate.elevation, 0.0);
    }
}
