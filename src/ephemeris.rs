// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Ephemeris Provider
//!
//! The calendar needs four things from an ephemeris: the apparent ecliptic
//! longitude of the Sun and of the Moon, and forward searches for sunrise /
//! sunset and for the Sun's upper transit.  [`Ephemeris`] is that seam;
//! everything downstream ([`equinox`](crate::equinox),
//! [`resh`](crate::resh), [`Context`](crate::Context)) is generic over it.
//!
//! [`Meeus`] is the built-in provider: truncated analytic series from
//! J. Meeus, *Astronomical Algorithms* (2nd ed.), chapters 22, 25 and 47.
//!
//! | Quantity | Source | Accuracy |
//! |----------|--------|----------|
//! | Sun longitude | ch. 25, low accuracy, with nutation + aberration | ≈ 0.01° |
//! | Moon longitude | ch. 47, principal periodic terms | ≈ 0.05° |
//! | Obliquity | ch. 22, mean + principal nutation term | ≈ 1″ |
//! | Sidereal time | ch. 12, GMST | ≪ 1 s |
//!
//! All series take their time argument on the TT axis
//! ([`JulianDate`](crate::JulianDate)); sidereal time is evaluated on UT.

use crate::coordinates::GeoCoordinate;
use crate::riseset::{self, RiseSet};
use crate::{JulianDate, UniversalTime};
use qtty::*;

/// Source of solar and lunar positions and of solar horizon events.
pub trait Ephemeris {
    /// Apparent geocentric ecliptic longitude of the Sun, in `[0°, 360°)`.
    fn sun_longitude(&self, jd: JulianDate) -> Degrees;

    /// Apparent geocentric ecliptic longitude of the Moon, in `[0°, 360°)`.
    fn moon_longitude(&self, jd: JulianDate) -> Degrees;

    /// First sunrise or sunset in `[start, start + limit]`.
    ///
    /// `None` when the Sun does not cross the horizon in that window
    /// (polar day or polar night).
    fn search_rise_set(
        &self,
        observer: &GeoCoordinate,
        direction: RiseSet,
        start: JulianDate,
        limit: Days,
    ) -> Option<JulianDate>;

    /// First upper transit of the Sun over the local meridian in
    /// `[start, start + limit]`.
    fn search_transit(
        &self,
        observer: &GeoCoordinate,
        start: JulianDate,
        limit: Days,
    ) -> Option<JulianDate>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn sun_longitude(&self, jd: JulianDate) -> Degrees {
        (**self).sun_longitude(jd)
    }

    fn moon_longitude(&self, jd: JulianDate) -> Degrees {
        (**self).moon_longitude(jd)
    }

    fn search_rise_set(
        &self,
        observer: &GeoCoordinate,
        direction: RiseSet,
        start: JulianDate,
        limit: Days,
    ) -> Option<JulianDate> {
        (**self).search_rise_set(observer, direction, start, limit)
    }

    fn search_transit(
        &self,
        observer: &GeoCoordinate,
        start: JulianDate,
        limit: Days,
    ) -> Option<JulianDate> {
        (**self).search_transit(observer, start, limit)
    }
}

/// Built-in low-precision analytic ephemeris.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meeus;

impl Ephemeris for Meeus {
    fn sun_longitude(&self, jd: JulianDate) -> Degrees {
        sun_apparent_longitude(jd)
    }

    fn moon_longitude(&self, jd: JulianDate) -> Degrees {
        moon_apparent_longitude(jd)
    }

    fn search_rise_set(
        &self,
        observer: &GeoCoordinate,
        direction: RiseSet,
        start: JulianDate,
        limit: Days,
    ) -> Option<JulianDate> {
        riseset::search_rise_set(observer, direction, start, limit)
    }

    fn search_transit(
        &self,
        observer: &GeoCoordinate,
        start: JulianDate,
        limit: Days,
    ) -> Option<JulianDate> {
        riseset::search_transit(observer, start, limit)
    }
}

// ------------------------------------------------------------------------------------
// Series
// ------------------------------------------------------------------------------------

/// Longitude of the Moon's ascending node, Ω.
#[inline]
fn ascending_node(t: f64) -> Degrees {
    Degrees::new(125.04 - 1_934.136 * t)
}

/// Apparent longitude of the Sun (Meeus 25.2–25.8).
pub fn sun_apparent_longitude(jd: JulianDate) -> Degrees {
    let t = jd.julian_centuries().value();
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = Degrees::new(357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t);
    let m2 = Degrees::new(2.0 * m.value());
    let m3 = Degrees::new(3.0 * m.value());

    let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * m2.sin()
        + 0.000_289 * m3.sin();

    // Aberration (−20.5″) and nutation in longitude (principal term).
    let apparent = l0 + center - 0.005_69 - 0.004_78 * ascending_node(t).sin();
    Degrees::new(apparent).wrap_pos()
}

/// Principal periodic terms of the lunar longitude, Meeus table 47.A.
///
/// Columns: multiples of `D`, `M`, `M'`, `F`, then the coefficient in degrees.
const MOON_LONGITUDE_TERMS: [(f64, f64, f64, f64, f64); 19] = [
    (0.0, 0.0, 1.0, 0.0, 6.288_774),
    (2.0, 0.0, -1.0, 0.0, 1.274_027),
    (2.0, 0.0, 0.0, 0.0, 0.658_314),
    (0.0, 0.0, 2.0, 0.0, 0.213_618),
    (0.0, 1.0, 0.0, 0.0, -0.185_116),
    (0.0, 0.0, 0.0, 2.0, -0.114_332),
    (2.0, 0.0, -2.0, 0.0, 0.058_793),
    (2.0, -1.0, -1.0, 0.0, 0.057_066),
    (2.0, 0.0, 1.0, 0.0, 0.053_322),
    (2.0, -1.0, 0.0, 0.0, 0.045_758),
    (0.0, 1.0, -1.0, 0.0, -0.040_923),
    (1.0, 0.0, 0.0, 0.0, -0.034_720),
    (0.0, 1.0, 1.0, 0.0, -0.030_383),
    (2.0, 0.0, 0.0, -2.0, 0.015_327),
    (0.0, 0.0, 1.0, 2.0, -0.012_528),
    (0.0, 0.0, 1.0, -2.0, 0.010_980),
    (4.0, 0.0, -1.0, 0.0, 0.010_675),
    (0.0, 0.0, 3.0, 0.0, 0.010_034),
    (4.0, 0.0, -2.0, 0.0, 0.008_548),
];

/// Apparent longitude of the Moon (Meeus 47.1–47.5, principal terms).
pub fn moon_apparent_longitude(jd: JulianDate) -> Degrees {
    let t = jd.julian_centuries().value();
    let mean_longitude = 218.316_447_7 + 481_267.881_234_21 * t;
    let d = 297.850_192_1 + 445_267.111_403_4 * t;
    let m = 357.529_109_2 + 35_999.050_290_9 * t;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t;
    let f = 93.272_095_0 + 483_202.017_523_3 * t;

    let periodic: f64 = MOON_LONGITUDE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coeff)| {
            coeff * Degrees::new(cd * d + cm * m + cmp * mp + cf * f).sin()
        })
        .sum();

    let apparent = mean_longitude + periodic - 0.004_78 * ascending_node(t).sin();
    Degrees::new(apparent).wrap_pos()
}

/// True obliquity of the ecliptic, ε.
pub fn obliquity(jd: JulianDate) -> Degrees {
    let t = jd.julian_centuries().value();
    Degrees::new(23.439_291 - 0.013_004_2 * t + 0.002_56 * ascending_node(t).cos())
}

/// Apparent right ascension and declination of the Sun.
///
/// Right ascension is returned in `(-180°, 180°]`.
pub fn sun_equatorial(jd: JulianDate) -> (Degrees, Degrees) {
    let lambda = sun_apparent_longitude(jd);
    let eps = obliquity(jd);
    let (sin_l, cos_l) = lambda.sin_cos();
    let ra = (eps.cos() * sin_l).atan2(cos_l).to_degrees();
    let dec = (eps.sin() * sin_l).asin().to_degrees();
    (Degrees::new(ra), Degrees::new(dec))
}

/// Greenwich mean sidereal time (Meeus 12.4), in `[0°, 360°)`.
pub fn greenwich_mean_sidereal_time(jd_ut: UniversalTime) -> Degrees {
    let d = jd_ut.value() - JulianDate::J2000.value();
    let t = d / JulianDate::JULIAN_CENTURY.value();
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    Degrees::new(gmst).wrap_pos()
}
