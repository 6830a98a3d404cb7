// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.

use thiserror::Error;

/// Result alias for calendar computations.
pub type Result<T> = std::result::Result<T, CalendarError>;

/// Errors raised by the calendar computations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CalendarError {
    /// Solar longitude did not change sign over the widened March bracket.
    #[error("vernal equinox of {year} could not be bracketed")]
    EquinoxNotBracketed { year: i32 },

    /// The instant cannot be represented as a `chrono::DateTime<Utc>`.
    #[error("instant {jd} is outside the representable UTC range")]
    UtcOutOfRange { jd: f64 },
}

/// Errors raised by a [`SettingsStore`](crate::SettingsStore).
///
/// Loading never surfaces these to the caller of
/// [`Settings::load_or_default`](crate::Settings::load_or_default); they are
/// logged and the defaults are used instead.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
