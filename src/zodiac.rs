// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zodiac signs and weekdays.
//!
//! Both are rendered with fixed Latin names that do not change with the
//! display language: signs in the genitive ("in 0.0° Arietis"), weekdays
//! as the planetary day names.

use chrono::Weekday;
use qtty::Degrees;
use std::fmt;

/// The twelve 30° sectors of the ecliptic, starting at the vernal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Zero-based index from Aries.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Latin genitive, as in "Sol in Arietis".
    pub fn latin_genitive(self) -> &'static str {
        match self {
            Sign::Aries => "Arietis",
            Sign::Taurus => "Tauri",
            Sign::Gemini => "Geminorum",
            Sign::Cancer => "Cancri",
            Sign::Leo => "Leonis",
            Sign::Virgo => "Virginis",
            Sign::Libra => "Librae",
            Sign::Scorpio => "Scorpii",
            Sign::Sagittarius => "Sagittarii",
            Sign::Capricorn => "Capricorni",
            Sign::Aquarius => "Aquarii",
            Sign::Pisces => "Piscium",
        }
    }
}

/// An ecliptic longitude expressed as a sign and a degree within it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignPosition {
    pub sign: Sign,
    /// Degrees into the sign, rounded to one decimal.
    pub degree: f64,
}

impl SignPosition {
    /// Split a longitude into sign and degree.
    ///
    /// The longitude is normalized to `[0°, 360°)` first.  The sign is chosen
    /// before rounding, so 29.96° Aries reads as "30.0° Arietis" rather than
    /// jumping to Taurus.
    ///
    /// ```
    /// use thelema_calendar::{Sign, SignPosition};
    /// use qtty::Degrees;
    ///
    /// let pos = SignPosition::from_longitude(Degrees::new(45.25));
    /// assert_eq!(pos.sign, Sign::Taurus);
    /// assert_eq!(pos.degree, 15.3);
    /// ```
    pub fn from_longitude(longitude: Degrees) -> Self {
        let lon = longitude.wrap_pos().value();
        let index = ((lon / 30.0).floor() as usize).min(11);
        let within = lon - 30.0 * index as f64;
        Self {
            sign: Sign::ALL[index],
            degree: (within * 10.0).round() / 10.0,
        }
    }
}

impl fmt::Display for SignPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}° {}", self.degree, self.sign.latin_genitive())
    }
}

/// Latin planetary name of a weekday, `Dies Solis` for Sunday.
pub fn latin_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Dies Solis",
        Weekday::Mon => "Dies Lunae",
        Weekday::Tue => "Dies Martis",
        Weekday::Wed => "Dies Mercurii",
        Weekday::Thu => "Dies Jovis",
        Weekday::Fri => "Dies Veneris",
        Weekday::Sat => "Dies Saturnii",
    }
}
