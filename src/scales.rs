// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale marker types.
//!
//! | Marker | Description |
//! |--------|-------------|
//! | [`JD`] | Julian Date on the uniform TT axis (ephemeris time) |
//! | [`UT`] | Julian Date on the Earth-rotation UT axis (civil time) |
//!
//! The ephemeris is evaluated on [`JD`]; sidereal time and calendar dates
//! are evaluated on [`UT`].

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date on the TT axis, the identity scale.
///
/// `to_jd_tt(v) = v`, i.e. the quantity *is* a Julian Day number in TT.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "JD(TT)";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time, the civil time scale tied to Earth's rotation.
///
/// The conversion to JD(TT) adds the epoch-dependent **ΔT** from
/// [`delta_t`](super::delta_t); the inverse uses a three-iteration
/// fixed-point solver.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "JD(UT)";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let dt_secs = super::delta_t::delta_t_seconds_from_ut(ut_value);
        ut_value + dt_secs.to::<qtty::Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // dΔT/dJD ≈ 3×10⁻⁸, so three iterations are plenty.
        let mut ut = jd_tt;
        for _ in 0..3 {
            let dt_days = super::delta_t::delta_t_seconds_from_ut(ut).to::<qtty::Day>();
            ut = jd_tt - dt_days;
        }
        ut
    }
}
