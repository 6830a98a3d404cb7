// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T): UT↔TT Correction Layer
//!
//! Polynomial expressions for **ΔT = TT − UT** by Espenak & Meeus (2006),
//! as published with the NASA *Five Millennium Canon of Solar Eclipses*.
//! Outside −500…+2150 the long-term parabola of Morrison & Stephenson
//! (2004) is used.
//!
//! The correction is applied automatically by the [`UT`](super::UT) scale;
//! [`Time::from_utc`](super::Time::from_utc) routes through it, so callers
//! never need this module directly.
//!
//! ## Accuracy
//! A few seconds in the 20th and 21st centuries, growing to minutes in
//! antiquity.  For a calendar that displays the equinox to ±2 h this is
//! far below the display resolution.

use qtty::{Days, Seconds};

/// JD(UT) of J2000.0, origin of the decimal-year approximation.
const J2000_JD: f64 = 2_451_545.0;

/// Mean Julian year in days.
const JULIAN_YEAR_D: f64 = 365.25;

/// Decimal year for a Julian Day on the UT axis.
#[inline]
fn decimal_year(jd_ut: Days) -> f64 {
    2000.0 + (jd_ut.value() - J2000_JD) / JULIAN_YEAR_D
}

/// Evaluate a polynomial with coefficients in ascending order.
#[inline]
fn poly(t: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

// ------------------------------------------------------------------------------------
// ΔT sections by year
// ------------------------------------------------------------------------------------

/// **Years < −500 and > 2150**: long-term parabola.
#[inline]
fn delta_t_long_term(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// **−500 … 500**
#[inline]
fn delta_t_ancient(y: f64) -> f64 {
    poly(
        y / 100.0,
        &[10_583.6, -1_014.41, 33.783_11, -5.952_053, -0.179_845_2, 0.022_174_192, 0.009_031_652_1],
    )
}

/// **500 … 1600**
#[inline]
fn delta_t_medieval(y: f64) -> f64 {
    poly(
        (y - 1000.0) / 100.0,
        &[1_574.2, -556.01, 71.234_72, 0.319_781, -0.850_346_3, -0.005_050_998, 0.008_357_207_3],
    )
}

/// **1600 … 1900**: four short telescopic-era fits.
#[inline]
fn delta_t_telescopic(y: f64) -> f64 {
    match y {
        y if y < 1700.0 => poly(y - 1600.0, &[120.0, -0.9808, -0.01532, 1.0 / 7_129.0]),
        y if y < 1800.0 => poly(
            y - 1700.0,
            &[8.83, 0.1603, -0.005_928_5, 0.000_133_36, -1.0 / 1_174_000.0],
        ),
        y if y < 1860.0 => poly(
            y - 1800.0,
            &[
                13.72,
                -0.332_447,
                0.006_861_2,
                0.004_111_6,
                -0.000_374_36,
                0.000_012_127_2,
                -0.000_000_169_9,
                0.000_000_000_875,
            ],
        ),
        y => poly(
            y - 1860.0,
            &[7.62, 0.5737, -0.251_754, 0.016_806_68, -0.000_447_362_4, 1.0 / 233_174.0],
        ),
    }
}

/// **1900 … 2005**: observed era.
#[inline]
fn delta_t_modern(y: f64) -> f64 {
    match y {
        y if y < 1920.0 => poly(y - 1900.0, &[-2.79, 1.494_119, -0.059_893_9, 0.006_196_6, -0.000_197]),
        y if y < 1941.0 => poly(y - 1920.0, &[21.20, 0.844_93, -0.076_100, 0.002_093_6]),
        y if y < 1961.0 => poly(y - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2_547.0]),
        y if y < 1986.0 => poly(y - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]),
        y => poly(
            y - 2000.0,
            &[63.86, 0.3345, -0.060_374, 0.001_727_5, 0.000_651_814, 0.000_023_735_99],
        ),
    }
}

/// **2005 … 2150**: predictions.
#[inline]
fn delta_t_predicted(y: f64) -> f64 {
    if y < 2050.0 {
        poly(y - 2000.0, &[62.92, 0.322_17, 0.005_589])
    } else {
        delta_t_long_term(y) - 0.5628 * (2150.0 - y)
    }
}

/// Returns **ΔT** in seconds for a Julian Day on the **UT** axis.
pub(crate) fn delta_t_seconds_from_ut(jd_ut: Days) -> Seconds {
    let y = decimal_year(jd_ut);
    let dt = match y {
        y if !(-500.0..2150.0).contains(&y) => delta_t_long_term(y),
        y if y < 500.0 => delta_t_ancient(y),
        y if y < 1600.0 => delta_t_medieval(y),
        y if y < 1900.0 => delta_t_telescopic(y),
        y if y < 2005.0 => delta_t_modern(y),
        y => delta_t_predicted(y),
    };
    Seconds::new(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_year(y: f64) -> f64 {
        delta_t_seconds_from_ut(Days::new(J2000_JD + (y - 2000.0) * JULIAN_YEAR_D)).value()
    }

    #[test]
    fn delta_t_2000() {
        assert!((at_year(2000.0) - 63.86).abs() < 1e-9);
    }

    #[test]
    fn delta_t_1900_is_small_and_negative() {
        assert!((at_year(1900.0) + 2.79).abs() < 1e-9);
    }

    #[test]
    fn delta_t_2024_matches_observation() {
        // Observed ≈ 69.2 s; the 2005 prediction runs a few seconds high.
        let dt = at_year(2024.0);
        assert!((65.0..=75.0).contains(&dt), "ΔT(2024) = {dt}");
    }

    #[test]
    fn delta_t_sections_are_continuous() {
        for boundary in [500.0, 1600.0, 1700.0, 1800.0, 1860.0, 1900.0, 1920.0, 1941.0, 1961.0, 1986.0, 2005.0, 2050.0, 2150.0] {
            let before = at_year(boundary - 1e-6);
            let after = at_year(boundary + 1e-6);
            assert!(
                (before - after).abs() < 5.0,
                "jump of {} s at {boundary}",
                (before - after).abs()
            );
        }
    }

    #[test]
    fn delta_t_long_term_is_parabolic() {
        assert!((at_year(1820.0 - 3000.0) - (-20.0 + 32.0 * 900.0)).abs() < 1e-6);
    }
}
