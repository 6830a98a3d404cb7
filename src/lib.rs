// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Thelemic Calendar
//!
//! Astronomy behind a single-page Thelemic calendar: the year count from the
//! vernal equinox, the Sun and Moon in the zodiac, the phase of the Moon and
//! the four daily Resh adorations with a countdown to the next one.
//!
//! # Core
//!
//! - [`find_vernal_equinox`]: bisection on the Sun's apparent longitude.
//! - [`EpochCalendar`]: maps an instant, through the equinox that began its
//!   year, to a cycle and a position in the cycle ([`EpochPosition`]).
//! - [`select_next_event`] / [`next_resh`]: picks the next of the day's
//!   [`ReshEvent`]s, recomputing the following day when today is over.
//!
//! # Time
//!
//! - [`Time<S>`]: generic instant parameterised by a [`TimeScale`] marker.
//! - [`JulianDate`]: type alias for `Time<JD>`, the TT axis every series is
//!   evaluated on.
//! - [`Period<S>`]: closed interval, the search bracket of the root finders.
//!
//! The difference **ΔT = TT − UT** is applied automatically by the [`UT`]
//! time scale; `Time::from_utc` and `Time::to_utc` route through it.
//!
//! # Ephemeris
//!
//! Everything astronomical goes through the [`Ephemeris`] trait.  [`Meeus`]
//! is the built-in analytic provider.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use thelema_calendar::{EpochCalendar, Meeus};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//! let anno = EpochCalendar::THELEMIC.map(&Meeus, now).unwrap();
//! assert_eq!(anno.to_string(), "V:x");
//! ```
//!
//! # Application state
//!
//! [`Context`] ties the pieces to a [`SettingsStore`] and a time zone and
//! produces one [`Snapshot`] per tick.

mod delta_t;
pub(crate) mod instant;
mod julian_date_ext;
mod period;
pub(crate) mod scales;

pub mod context;
pub mod coordinates;
pub mod ephemeris;
pub mod epoch;
pub mod equinox;
pub mod error;
pub mod geolocation;
pub mod moon_phase;
pub mod resh;
pub mod riseset;
pub mod settings;
pub mod zodiac;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use instant::{Time, TimeScale};
pub use period::Period;
pub use scales::{JD, UT};

pub use context::{Context, Snapshot};
pub use coordinates::{GeoCoordinate, Location};
pub use ephemeris::{Ephemeris, Meeus};
pub use epoch::{next_equinox_after, round_to_nearest_two_hours, EpochCalendar, EpochPosition};
pub use equinox::{find_vernal_equinox, vernal_equinox_utc};
pub use error::{CalendarError, SettingsError};
pub use geolocation::{GeolocationOutcome, GeolocationRequest};
pub use moon_phase::{MoonPhase, PhaseName};
pub use resh::{
    local_day_start, next_resh, select_next_event, Countdown, NextEventSelection, ReshDay,
    ReshEvent, ReshKind, ReshSchedule,
};
pub use riseset::RiseSet;
pub use settings::{JsonFileStore, Language, MemoryStore, Settings, SettingsStore};
pub use zodiac::{Sign, SignPosition};

/// Julian Date on the TT axis.
///
/// This is a type alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;

/// Universal Time, the Earth-rotation civil time scale.
///
/// This is a type alias for [`Time<UT>`].
pub type UniversalTime = Time<UT>;
