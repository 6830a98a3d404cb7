// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunar phase from the Sun–Moon elongation.

use qtty::{Days, Degrees};

/// Mean synodic month.
pub const SYNODIC_MONTH: Days = Days::new(29.530_588_853);

/// The eight named phases, each centred on a multiple of 45°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    pub const ALL: [PhaseName; 8] = [
        PhaseName::NewMoon,
        PhaseName::WaxingCrescent,
        PhaseName::FirstQuarter,
        PhaseName::WaxingGibbous,
        PhaseName::FullMoon,
        PhaseName::WaningGibbous,
        PhaseName::LastQuarter,
        PhaseName::WaningCrescent,
    ];

    /// Zero-based index from new moon.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Moon phase glyph.
    pub fn icon(self) -> &'static str {
        ["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"][self.index()]
    }
}

/// Phase of the Moon as displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhase {
    /// Elongation of the Moon east of the Sun, in `[0°, 360°)`.
    pub phase_angle: Degrees,
    pub name: PhaseName,
    /// Illuminated fraction in whole percent.
    pub illumination_pct: u8,
    /// Time since new moon, rounded to 0.1 day.
    pub age: Days,
}

impl MoonPhase {
    pub fn from_longitudes(sun: Degrees, moon: Degrees) -> Self {
        let phase_angle = (moon - sun).wrap_pos();
        let phi = phase_angle.value();
        let illumination = (1.0 - phase_angle.cos()) / 2.0;
        let index = ((phi / 45.0).round() as usize) % 8;
        let age = phi / 360.0 * SYNODIC_MONTH.value();
        Self {
            phase_angle,
            name: PhaseName::ALL[index],
            illumination_pct: (illumination * 100.0).round().clamp(0.0, 100.0) as u8,
            age: Days::new((age * 10.0).round() / 10.0),
        }
    }
}
