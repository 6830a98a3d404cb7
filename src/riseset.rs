// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sunrise, sunset and solar transit search.
//!
//! Both searches scan forward from `start` in one-hour steps looking for a
//! sign change of a scalar function of time, then refine the bracketing
//! hour by bisection:
//!
//! * rise/set: `altitude(t) − h₀`, with `h₀ = −50′ − dip(elevation)`
//!   (34′ refraction plus 16′ solar semidiameter, lowered by the geometric
//!   dip of the horizon for an elevated observer);
//! * transit: the local hour angle wrapped to `(−180°, 180°]`, crossing
//!   zero upwards.  The wrap from `+180°` to `−180°` is a discontinuity, not
//!   a crossing, and is rejected.
//!
//! No crossing inside the window yields `None`; this is how polar day and
//! polar night surface.

use crate::coordinates::GeoCoordinate;
use crate::ephemeris::{greenwich_mean_sidereal_time, sun_equatorial};
use crate::{JulianDate, Period, UT};
use qtty::*;

/// Horizon crossing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiseSet {
    /// Upper limb appears above the horizon.
    Rise,
    /// Upper limb disappears below the horizon.
    Set,
}

/// Refraction plus semidiameter, in degrees.
const HORIZON_DEPRESSION_DEG: f64 = 50.0 / 60.0;

/// Coarse scan step.
const SCAN_STEP: Days = Days::new(1.0 / 24.0);

/// Bisection steps on a one-hour bracket; 2⁻⁴⁰ h is far below a millisecond.
const REFINE_ITERATIONS: usize = 40;

/// Local hour angle of the Sun, wrapped to `(−180°, 180°]`, and its
/// declination.
fn hour_angle_and_declination(jd: JulianDate, observer: &GeoCoordinate) -> (Degrees, Degrees) {
    let (ra, dec) = sun_equatorial(jd);
    let gmst = greenwich_mean_sidereal_time(jd.to::<UT>());
    let lha = (gmst + Degrees::new(observer.longitude) - ra).wrap_signed();
    (lha, dec)
}

/// Geometric altitude of the Sun's centre above the horizon.
pub fn sun_altitude(jd: JulianDate, observer: &GeoCoordinate) -> Degrees {
    let (lha, dec) = hour_angle_and_declination(jd, observer);
    let phi = Degrees::new(observer.latitude);
    let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * lha.cos();
    Degrees::new(sin_alt.clamp(-1.0, 1.0).asin().to_degrees())
}

/// Local hour angle of the Sun in `(−180°, 180°]`; zero at upper transit.
pub fn sun_hour_angle(jd: JulianDate, observer: &GeoCoordinate) -> Degrees {
    hour_angle_and_declination(jd, observer).0
}

/// Altitude the Sun's centre has at the moment of rise or set.
fn standard_altitude(observer: &GeoCoordinate) -> f64 {
    -HORIZON_DEPRESSION_DEG - observer.horizon_dip_deg()
}

/// Scan `[start, start + limit]` for the first step over which `g` changes
/// sign in the requested sense and refine it.
///
/// `genuine` sees the values at both ends of a candidate step and may veto
/// it (used to reject wrap-around discontinuities).
fn find_crossing<G, V>(
    g: G,
    start: JulianDate,
    limit: Days,
    rising: bool,
    genuine: V,
) -> Option<JulianDate>
where
    G: Fn(JulianDate) -> f64,
    V: Fn(f64, f64) -> bool,
{
    let end = start + limit;
    let mut t0 = start;
    let mut g0 = g(t0);

    while t0 < end {
        let t1 = (t0 + SCAN_STEP).min(end);
        let g1 = g(t1);

        let crosses = if rising {
            g0 < 0.0 && g1 >= 0.0
        } else {
            g0 >= 0.0 && g1 < 0.0
        };
        if crosses && genuine(g0, g1) {
            return Some(refine(&g, Period::new(t0, t1), g0));
        }

        t0 = t1;
        g0 = g1;
    }
    None
}

/// Bisect a bracket known to contain a sign change of `g`.
fn refine<G>(g: &G, mut bracket: Period<crate::JD>, mut g_start: f64) -> JulianDate
where
    G: Fn(JulianDate) -> f64,
{
    for _ in 0..REFINE_ITERATIONS {
        let mid = bracket.midpoint();
        let g_mid = g(mid);
        if (g_start < 0.0) == (g_mid < 0.0) {
            bracket = bracket.upper_half();
            g_start = g_mid;
        } else {
            bracket = bracket.lower_half();
        }
    }
    bracket.midpoint()
}

/// First sunrise or sunset for `observer` in `[start, start + limit]`.
pub fn search_rise_set(
    observer: &GeoCoordinate,
    direction: RiseSet,
    start: JulianDate,
    limit: Days,
) -> Option<JulianDate> {
    let h0 = standard_altitude(observer);
    find_crossing(
        |t| sun_altitude(t, observer).value() - h0,
        start,
        limit,
        direction == RiseSet::Rise,
        |_, _| true,
    )
}

/// First upper transit of the Sun for `observer` in `[start, start + limit]`.
pub fn search_transit(
    observer: &GeoCoordinate,
    start: JulianDate,
    limit: Days,
) -> Option<JulianDate> {
    find_crossing(
        |t| sun_hour_angle(t, observer).value(),
        start,
        limit,
        true,
        // A real crossing moves ~15° per step; the wrap jumps ~360°.
        |a, b| (a - b).abs() < 270.0,
    )
}
