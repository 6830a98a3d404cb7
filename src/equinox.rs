// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Vernal Equinox Solver
//!
//! The vernal equinox is the instant the Sun's apparent ecliptic longitude
//! passes through 0°.  Wrapping the longitude to `(−180°, 180°]` turns that
//! crossing into an ordinary sign change, which is located by bisection:
//!
//! 1. bracket: March 19 to March 22, 00:00 UT;
//! 2. while both ends have the same sign, widen by one day on each side,
//!    at most [`MAX_WIDENINGS`] times;
//! 3. bisect for at most [`MAX_ITERATIONS`] steps, returning early once
//!    `|λ☉| <` [`TOLERANCE_DEG`].
//!
//! A bracket that never changes sign is reported as
//! [`CalendarError::EquinoxNotBracketed`].

use crate::ephemeris::Ephemeris;
use crate::error::{CalendarError, Result};
use crate::{JulianDate, Period, Time, UT};
use chrono::{DateTime, Utc};
use qtty::Days;

/// Bisection stops once the wrapped longitude is this close to zero.
pub const TOLERANCE_DEG: f64 = 1e-7;

/// Upper bound on bisection steps.
pub const MAX_ITERATIONS: usize = 60;

/// Upper bound on one-day bracket widenings.
pub const MAX_WIDENINGS: usize = 4;

/// Apparent solar longitude wrapped to `(−180°, 180°]`, in degrees.
pub fn wrapped_sun_longitude<E: Ephemeris + ?Sized>(ephemeris: &E, jd: JulianDate) -> f64 {
    ephemeris.sun_longitude(jd).wrap_signed().value()
}

/// Instant of the March equinox of `year`, on the TT axis.
///
/// Any `i32` year is accepted.
///
/// ```
/// use thelema_calendar::{find_vernal_equinox, Meeus};
///
/// let eq = find_vernal_equinox(&Meeus, 2024).unwrap();
/// let utc = eq.to_utc().unwrap();
/// assert_eq!(utc.format("%Y-%m-%d %H").to_string(), "2024-03-20 03");
/// ```
pub fn find_vernal_equinox<E: Ephemeris + ?Sized>(ephemeris: &E, year: i32) -> Result<JulianDate> {
    let f = |t: JulianDate| wrapped_sun_longitude(ephemeris, t);

    let mut bracket = Period::new(
        Time::<UT>::from_gregorian(year, 3, 19).to::<crate::JD>(),
        Time::<UT>::from_gregorian(year, 3, 22).to::<crate::JD>(),
    );
    let mut fa = f(bracket.start);
    let mut fb = f(bracket.end);

    let mut widenings = 0;
    while fa * fb > 0.0 && widenings < MAX_WIDENINGS {
        bracket = bracket.widened(Days::new(1.0));
        fa = f(bracket.start);
        fb = f(bracket.end);
        widenings += 1;
    }
    if fa * fb > 0.0 {
        log::warn!(
            "no sign change of solar longitude over {bracket} for year {year}"
        );
        return Err(CalendarError::EquinoxNotBracketed { year });
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = bracket.midpoint();
        let fm = f(mid);
        if fm.abs() < TOLERANCE_DEG {
            return Ok(mid);
        }
        if fa * fm <= 0.0 {
            bracket = bracket.lower_half();
        } else {
            bracket = bracket.upper_half();
            fa = fm;
        }
    }
    Ok(bracket.midpoint())
}

/// [`find_vernal_equinox`] as a UTC timestamp.
pub fn vernal_equinox_utc<E: Ephemeris + ?Sized>(ephemeris: &E, year: i32) -> Result<DateTime<Utc>> {
    let jd = find_vernal_equinox(ephemeris, year)?;
    jd.to_utc()
        .ok_or(CalendarError::UtcOutOfRange { jd: jd.value() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::GeoCoordinate;
    use crate::ephemeris::Meeus;
    use crate::riseset::RiseSet;
    use chrono::TimeZone;
    use qtty::Degrees;

    /// Solar longitude that never crosses zero.
    struct StuckSun;

    impl Ephemeris for StuckSun {
        fn sun_longitude(&self, _: JulianDate) -> Degrees {
            Degrees::new(90.0)
        }
        fn moon_longitude(&self, _: JulianDate) -> Degrees {
            Degrees::new(0.0)
        }
        fn search_rise_set(
            &self,
            _: &GeoCoordinate,
            _: RiseSet,
            _: JulianDate,
            _: Days,
        ) -> Option<JulianDate> {
            None
        }
        fn search_transit(&self, _: &GeoCoordinate, _: JulianDate, _: Days) -> Option<JulianDate> {
            None
        }
    }

    /// A Sun whose longitude is linear in time and crosses zero at `root`.
    struct LinearSun {
        root: f64,
    }

    impl Ephemeris for LinearSun {
        fn sun_longitude(&self, jd: JulianDate) -> Degrees {
            Degrees::new(0.9856 * (jd.value() - self.root)).wrap_pos()
        }
        fn moon_longitude(&self, _: JulianDate) -> Degrees {
            Degrees::new(0.0)
        }
        fn search_rise_set(
            &self,
            _: &GeoCoordinate,
            _: RiseSet,
            _: JulianDate,
            _: Days,
        ) -> Option<JulianDate> {
            None
        }
        fn search_transit(&self, _: &GeoCoordinate, _: JulianDate, _: Days) -> Option<JulianDate> {
            None
        }
    }

    #[test]
    fn equinox_2024() {
        let eq = vernal_equinox_utc(&Meeus, 2024).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        assert!((eq - expected).num_minutes().abs() <= 10, "equinox at {eq}");
    }

    #[test]
    fn equinox_of_the_epoch_year() {
        let eq = vernal_equinox_utc(&Meeus, 1904).unwrap();
        let expected = Utc.with_ymd_and_hms(1904, 3, 21, 1, 0, 0).unwrap();
        assert!((eq - expected).num_minutes().abs() <= 15, "equinox at {eq}");
    }

    #[test]
    fn residual_is_below_tolerance_across_two_centuries() {
        for year in (1900..=2100).step_by(7) {
            let eq = find_vernal_equinox(&Meeus, year).unwrap();
            let residual = wrapped_sun_longitude(&Meeus, eq).abs();
            assert!(residual < 1e-6, "year {year}: |λ☉| = {residual}");
        }
    }

    #[test]
    fn widening_finds_a_crossing_outside_the_initial_bracket() {
        // A day and a half before the March 19 start.
        let root = (Time::<UT>::from_gregorian(2024, 3, 17).to::<crate::JD>() + Days::new(0.5)).value();
        let eq = find_vernal_equinox(&LinearSun { root }, 2024).unwrap();
        assert!((eq.value() - root).abs() < 1e-6);
    }

    #[test]
    fn unbracketed_root_is_an_error() {
        assert_eq!(
            find_vernal_equinox(&StuckSun, 2024),
            Err(CalendarError::EquinoxNotBracketed { year: 2024 })
        );
    }

    #[test]
    fn crossing_beyond_four_widenings_is_an_error() {
        let root = Time::<UT>::from_gregorian(2024, 3, 10).to::<crate::JD>().value();
        assert_eq!(
            find_vernal_equinox(&LinearSun { root }, 2024),
            Err(CalendarError::EquinoxNotBracketed { year: 2024 })
        );
    }

    #[test]
    fn far_years_are_accepted() {
        assert!(find_vernal_equinox(&Meeus, -2000).is_ok());
        assert!(find_vernal_equinox(&Meeus, 3000).is_ok());
    }
}
