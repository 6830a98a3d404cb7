// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date specific extensions.

use qtty::*;

use super::instant::Time;
use super::scales::{JD, UT};

impl Time<JD> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT  (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian centuries since J2000.0, the time argument of every series in
    /// [`ephemeris`](crate::ephemeris).
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        Centuries::new((self.value() - Self::J2000.value()) / Self::JULIAN_CENTURY.value())
    }
}

impl Time<UT> {
    /// 00:00 UT of a proleptic Gregorian calendar date.
    ///
    /// `year` is an astronomical year number (1 BC is `0`).  Month and day
    /// are not range-checked; out-of-range values roll over arithmetically,
    /// so `from_gregorian(y, 3, 0)` is the last day of February.
    ///
    /// ```
    /// use thelema_calendar::{Time, UT};
    ///
    /// assert_eq!(Time::<UT>::from_gregorian(2000, 1, 1).value(), 2_451_544.5);
    /// ```
    pub fn from_gregorian(year: i32, month: u32, day: i32) -> Self {
        // Shift the year to start in March so the leap day is last.
        let (y, m) = if month <= 2 {
            (i64::from(year) - 1, i64::from(month) + 12)
        } else {
            (i64::from(year), i64::from(month))
        };
        let era = y.div_euclid(400);
        let yoe = y.rem_euclid(400);
        let doy = (153 * (m - 3) + 2) / 5 + i64::from(day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        // Day 0 of era 0 (0000-03-01) is JD 1 721 119.5.
        let days_since_0000_03_01 = era * 146_097 + doe;
        Self::new(1_721_119.5 + days_since_0000_03_01 as f64)
    }
}
