// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Epoch Calendar
//!
//! Years are counted from the vernal equinox of an epoch year and grouped
//! into fixed-length cycles.  With the defaults (epoch 1904, cycle 22) the
//! year that began at the 2024 equinox is offset 120: cycle 5, position 10,
//! written `Anno V:x`.
//!
//! A year starts at its vernal equinox, not on January 1: an instant in
//! early March still belongs to the previous year.

use crate::ephemeris::Ephemeris;
use crate::equinox::{find_vernal_equinox, vernal_equinox_utc};
use crate::error::Result;
use crate::JulianDate;
use chrono::{DateTime, Datelike, Utc};
use std::fmt;
use std::num::NonZeroU32;

/// Number of trumps in the tarot; Atu indices are taken modulo this.
pub const ATU_COUNT: u32 = 22;

/// Epoch year and cycle length of a cyclic year count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochCalendar {
    epoch_year: i32,
    cycle_length: NonZeroU32,
}

impl EpochCalendar {
    /// Epoch 1904, cycles of 22 years.
    pub const THELEMIC: Self = Self {
        epoch_year: 1904,
        cycle_length: match NonZeroU32::new(22) {
            Some(n) => n,
            None => unreachable!(),
        },
    };

    pub const fn new(epoch_year: i32, cycle_length: NonZeroU32) -> Self {
        Self {
            epoch_year,
            cycle_length,
        }
    }

    pub const fn epoch_year(&self) -> i32 {
        self.epoch_year
    }

    pub const fn cycle_length(&self) -> u32 {
        self.cycle_length.get()
    }

    /// Split a year offset from the epoch into cycle and position.
    ///
    /// The position is always in `[0, cycle_length)`, also for years before
    /// the epoch, and `cycle_index * cycle_length + position == offset`.
    ///
    /// ```
    /// use thelema_calendar::EpochCalendar;
    ///
    /// let pos = EpochCalendar::THELEMIC.position_for_offset(-1);
    /// assert_eq!((pos.cycle_index, pos.position_in_cycle), (-1, 21));
    /// ```
    pub fn position_for_offset(&self, offset: i64) -> EpochPosition {
        let length = i64::from(self.cycle_length.get());
        EpochPosition {
            offset,
            cycle_index: offset.div_euclid(length),
            position_in_cycle: offset.rem_euclid(length) as u32,
        }
    }

    /// Calendar year whose vernal equinox most recently began at `now`.
    pub fn start_year<E: Ephemeris + ?Sized>(&self, ephemeris: &E, now: DateTime<Utc>) -> Result<i32> {
        let year = now.year();
        let equinox = find_vernal_equinox(ephemeris, year)?;
        Ok(if JulianDate::from_utc(now) >= equinox {
            year
        } else {
            year - 1
        })
    }

    /// Position of `now` in the cycle.
    pub fn map<E: Ephemeris + ?Sized>(&self, ephemeris: &E, now: DateTime<Utc>) -> Result<EpochPosition> {
        let start_year = self.start_year(ephemeris, now)?;
        Ok(self.position_for_offset(i64::from(start_year) - i64::from(self.epoch_year)))
    }
}

impl Default for EpochCalendar {
    fn default() -> Self {
        Self::THELEMIC
    }
}

/// A year's place in the cyclic count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochPosition {
    /// Years since the epoch year.
    pub offset: i64,
    pub cycle_index: i64,
    pub position_in_cycle: u32,
}

impl EpochPosition {
    /// `"V:x"`: the cycle in upper-case and the position in lower-case
    /// Roman numerals.
    pub fn anno(&self) -> String {
        format!(
            "{}:{}",
            roman(self.cycle_index, true),
            roman(i64::from(self.position_in_cycle), false)
        )
    }

    /// Atu indices `(year, cycle)`: the year's card is read "in" the
    /// cycle's card.
    pub fn atu_indices(&self) -> (usize, usize) {
        (
            (self.position_in_cycle % ATU_COUNT) as usize,
            self.cycle_index.rem_euclid(i64::from(ATU_COUNT)) as usize,
        )
    }
}

impl fmt::Display for EpochPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.anno())
    }
}

const ROMAN_DIGITS: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Roman numeral for `n`; `"0"` for zero and a leading `-` for negatives.
pub fn roman(n: i64, upper: bool) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = String::new();
    if n < 0 {
        out.push('-');
    }
    let mut rest = n.unsigned_abs();
    for &(value, digits) in &ROMAN_DIGITS {
        let value = value as u64;
        while rest >= value {
            out.push_str(digits);
            rest -= value;
        }
    }
    if upper {
        out
    } else {
        out.to_lowercase()
    }
}

/// The next vernal equinox strictly after `now`.
pub fn next_equinox_after<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let year = now.year();
    let this_year = vernal_equinox_utc(ephemeris, year)?;
    if now < this_year {
        Ok(this_year)
    } else {
        vernal_equinox_utc(ephemeris, year + 1)
    }
}

/// Round to the nearest multiple of two hours since the Unix epoch.
///
/// Halves round away from zero.
pub fn round_to_nearest_two_hours(instant: DateTime<Utc>) -> DateTime<Utc> {
    const TWO_HOURS_MS: f64 = 2.0 * 3_600_000.0;
    let ms = instant.timestamp_millis() as f64;
    let rounded = (ms / TWO_HOURS_MS).round() * TWO_HOURS_MS;
    DateTime::<Utc>::from_timestamp_millis(rounded as i64).unwrap_or(instant)
}
