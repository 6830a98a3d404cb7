// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time period implementation.
//!
//! [`Period<S>`] is the closed interval `[start, end]` between two instants
//! on the same time scale.  The root finders in [`equinox`](crate::equinox)
//! and [`riseset`](crate::riseset) carry their search bracket as a `Period`
//! and shrink it with [`Period::lower_half`] / [`Period::upper_half`].

use super::{Time, TimeScale};
use qtty::Days;
use std::fmt;

/// Represents an interval between two instants on time scale `S`.
///
/// # Examples
///
/// ```
/// use thelema_calendar::{JulianDate, Period};
///
/// let period = Period::new(JulianDate::new(2451545.0), JulianDate::new(2451546.5));
/// assert_eq!(period.midpoint(), JulianDate::new(2451545.75));
/// assert_eq!(period.lower_half().end, period.upper_half().start);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period<S: TimeScale> {
    pub start: Time<S>,
    pub end: Time<S>,
}

impl<S: TimeScale> Period<S> {
    /// Creates a new period between two instants.
    pub fn new(start: Time<S>, end: Time<S>) -> Self {
        Period { start, end }
    }

    /// Instant halfway between `start` and `end`.
    pub fn midpoint(&self) -> Time<S> {
        self.start.mean(self.end)
    }

    /// The period extended by `margin` on both sides.
    pub fn widened(&self, margin: Days) -> Self {
        Self::new(self.start - margin, self.end + margin)
    }

    /// `[start, midpoint]`.
    pub fn lower_half(&self) -> Self {
        Self::new(self.start, self.midpoint())
    }

    /// `[midpoint, end]`.
    pub fn upper_half(&self) -> Self {
        Self::new(self.midpoint(), self.end)
    }
}

impl<S: TimeScale> fmt::Display for Period<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JulianDate;

    fn period(a: f64, b: f64) -> Period<crate::JD> {
        Period::new(JulianDate::new(a), JulianDate::new(b))
    }

    #[test]
    fn test_midpoint() {
        let p = period(10.0, 14.0);
        assert_eq!(p.midpoint(), JulianDate::new(12.0));
    }

    #[test]
    fn test_widened() {
        let p = period(10.0, 14.0).widened(Days::new(1.0));
        assert_eq!(p, period(9.0, 15.0));
    }

    #[test]
    fn test_halves_share_the_midpoint() {
        let p = period(10.0, 14.0);
        assert_eq!(p.lower_half(), period(10.0, 12.0));
        assert_eq!(p.upper_half(), period(12.0, 14.0));
    }

    #[test]
    fn test_display() {
        let s = format!("{}", period(10.0, 14.0));
        assert!(s.contains(" to "));
    }
}
