// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Single-shot device position requests.
//!
//! A request is issued synchronously and answered later, possibly after the
//! user has asked again.  Each request carries an id; only the answer to the
//! most recent request is applied, once.

use crate::coordinates::{GeoCoordinate, Location};
use std::time::Duration;

/// Parameters passed along to the position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    /// The source should give up and report [`GeolocationOutcome::TimedOut`]
    /// after this long.
    pub timeout: Duration,
    /// A cached position no older than this is acceptable.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(300),
        }
    }
}

/// Handle for an outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationRequest {
    id: u64,
    pub options: GeolocationOptions,
}

impl GeolocationRequest {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// What the position source reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    Success {
        latitude: f64,
        longitude: f64,
        /// Metres above sea level, when known.
        altitude: Option<f64>,
    },
    /// The user refused access.
    Denied,
    /// No position source, or it could not produce a fix.
    Unavailable,
    TimedOut,
}

impl GeolocationOutcome {
    /// The location this outcome switches to: the reported position, or the
    /// default location on any failure.
    pub fn location(&self) -> Location {
        match *self {
            GeolocationOutcome::Success {
                latitude,
                longitude,
                altitude,
            } => Location::local(GeoCoordinate::new(
                latitude,
                longitude,
                altitude.unwrap_or(0.0),
            )),
            _ => Location::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GeolocationOutcome::Success { .. })
    }
}

/// Issues request ids and recognises the one still awaited.
#[derive(Debug, Clone, Default)]
pub struct GeolocationTracker {
    last_issued: u64,
    pending: Option<u64>,
}

impl GeolocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any outstanding one.
    pub fn request(&mut self, options: GeolocationOptions) -> GeolocationRequest {
        self.last_issued += 1;
        self.pending = Some(self.last_issued);
        GeolocationRequest {
            id: self.last_issued,
            options,
        }
    }

    /// Whether `request` is the one awaited; consumes it if so.
    pub fn accept(&mut self, request: &GeolocationRequest) -> bool {
        if self.pending == Some(request.id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_request_is_accepted_once() {
        let mut tracker = GeolocationTracker::new();
        let first = tracker.request(GeolocationOptions::default());
        let second = tracker.request(GeolocationOptions::default());
        assert_ne!(first.id(), second.id());
        assert!(!tracker.accept(&first));
        assert!(tracker.is_pending());
        assert!(tracker.accept(&second));
        assert!(!tracker.accept(&second));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn outcome_locations() {
        let ok = GeolocationOutcome::Success {
            latitude: 1.0,
            longitude: 2.0,
            altitude: None,
        };
        assert!(ok.is_success());
        assert_eq!(ok.location(), Location::local(GeoCoordinate::new(1.0, 2.0, 0.0)));
        assert_eq!(ok.location().name, "Lokal plats");

        for failure in [
            GeolocationOutcome::Denied,
            GeolocationOutcome::Unavailable,
            GeolocationOutcome::TimedOut,
        ] {
            assert!(!failure.is_success());
            assert_eq!(failure.location(), Location::stockholm());
        }
    }

    #[test]
    fn default_options() {
        let opts = GeolocationOptions::default();
        assert!(!opts.high_accuracy);
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert_eq!(opts.maximum_age, Duration::from_secs(300));
    }
}
