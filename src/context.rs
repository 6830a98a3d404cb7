// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Application state and the per-tick snapshot.
//!
//! [`Context`] owns the settings, the settings store, the ephemeris and the
//! local time zone.  [`Context::tick`] is called once per second and returns
//! a fresh [`Snapshot`].  The astronomical part of the snapshot is cached and
//! only recomputed when
//!
//! * there is no cached result,
//! * the cached result is older than [`HEAVY_REFRESH_SECS`], or
//! * the cached next Resh event is no longer in the future.
//!
//! Between recomputations only the countdown is refreshed.  User actions
//! persist the settings and recompute immediately.

use crate::coordinates::Location;
use crate::ephemeris::Ephemeris;
use crate::epoch::{next_equinox_after, round_to_nearest_two_hours, EpochCalendar, EpochPosition};
use crate::error::Result;
use crate::geolocation::{GeolocationOptions, GeolocationOutcome, GeolocationRequest, GeolocationTracker};
use crate::moon_phase::MoonPhase;
use crate::resh::{next_resh, Countdown, NextEventSelection, ReshDay};
use crate::settings::{Language, Settings, SettingsStore};
use crate::zodiac::{latin_weekday, SignPosition};
use crate::JulianDate;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

/// Maximum age of the cached astronomical state, in seconds.
pub const HEAVY_REFRESH_SECS: i64 = 30;

/// Everything shown on screen for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub now: DateTime<Utc>,
    /// When the astronomical fields were computed.
    pub computed_at: DateTime<Utc>,
    pub lang: Language,
    pub location: Location,
    /// Local weekday and date of `computed_at`.
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub sun: SignPosition,
    pub moon: SignPosition,
    pub moon_phase: MoonPhase,
    pub epoch: EpochPosition,
    pub resh: ReshDay,
    pub next_resh: Option<NextEventSelection>,
    pub countdown: Option<Countdown>,
    /// Next vernal equinox, rounded to two hours.
    pub next_equinox: DateTime<Utc>,
}

impl Snapshot {
    pub fn latin_weekday(&self) -> &'static str {
        latin_weekday(self.weekday)
    }

    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.computed_at > Duration::seconds(HEAVY_REFRESH_SECS)
            || self.next_resh.is_some_and(|n| n.instant <= now)
    }

    fn at(&self, now: DateTime<Utc>) -> Self {
        Self {
            now,
            countdown: self.next_resh.map(|n| Countdown::until(now, n.instant)),
            ..self.clone()
        }
    }
}

/// Owner of settings, store, ephemeris and the cached snapshot.
pub struct Context<E, S, Tz>
where
    E: Ephemeris,
    S: SettingsStore,
    Tz: TimeZone,
{
    ephemeris: E,
    store: S,
    tz: Tz,
    calendar: EpochCalendar,
    settings: Settings,
    geolocation: GeolocationTracker,
    cache: Option<Snapshot>,
}

impl<E, S, Tz> Context<E, S, Tz>
where
    E: Ephemeris,
    S: SettingsStore,
    Tz: TimeZone,
{
    /// Load the settings from `store`; defaults on any failure.
    pub fn new(ephemeris: E, store: S, tz: Tz) -> Self {
        let settings = Settings::load_or_default(&store);
        log::debug!(
            "settings loaded: lang={}, location={}",
            settings.lang.code(),
            settings.location.name
        );
        Self {
            ephemeris,
            store,
            tz,
            calendar: EpochCalendar::default(),
            settings,
            geolocation: GeolocationTracker::new(),
            cache: None,
        }
    }

    /// Use a different epoch or cycle length.
    pub fn with_calendar(mut self, calendar: EpochCalendar) -> Self {
        self.calendar = calendar;
        self.cache = None;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot for `now`, recomputing the astronomy when due.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Snapshot> {
        let cached = match self.cache.take() {
            Some(snapshot) if !snapshot.is_stale(now) => snapshot,
            _ => self.compute(now)?,
        };
        let snapshot = cached.at(now);
        self.cache = Some(cached);
        Ok(snapshot)
    }

    /// Force a recomputation at `now`.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> Result<Snapshot> {
        self.cache = None;
        self.tick(now)
    }

    fn compute(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        let jd = JulianDate::from_utc(now);
        let sun = self.ephemeris.sun_longitude(jd);
        let moon = self.ephemeris.moon_longitude(jd);
        let local = now.with_timezone(&self.tz);
        let observer = self.settings.location.coordinate;

        let epoch = self.calendar.map(&self.ephemeris, now)?;
        let schedule = next_resh(&self.ephemeris, &observer, now, &self.tz);
        let next_equinox = round_to_nearest_two_hours(next_equinox_after(&self.ephemeris, now)?);

        log::debug!(
            "recomputed at {now} for {}: anno {epoch}, next resh {:?}",
            self.settings.location.name,
            schedule.next.map(|n| n.kind)
        );

        Ok(Snapshot {
            now,
            computed_at: now,
            lang: self.settings.lang,
            location: self.settings.location.clone(),
            weekday: local.weekday(),
            date: local.date_naive(),
            sun: SignPosition::from_longitude(sun),
            moon: SignPosition::from_longitude(moon),
            moon_phase: MoonPhase::from_longitudes(sun, moon),
            epoch,
            resh: schedule.today,
            next_resh: schedule.next,
            countdown: schedule.next.map(|n| Countdown::until(now, n.instant)),
            next_equinox,
        })
    }

    fn persist(&mut self) {
        if let Err(e) = self.settings.save(&mut self.store) {
            log::warn!("could not save settings: {e}");
        }
    }

    fn apply(&mut self, now: DateTime<Utc>) -> Result<Snapshot> {
        self.persist();
        self.refresh(now)
    }

    pub fn toggle_language(&mut self, now: DateTime<Utc>) -> Result<Snapshot> {
        self.settings.lang = self.settings.lang.toggle();
        self.apply(now)
    }

    pub fn set_language(&mut self, lang: Language, now: DateTime<Utc>) -> Result<Snapshot> {
        self.settings.lang = lang;
        self.apply(now)
    }

    /// Return to the default location.
    pub fn reset_location(&mut self, now: DateTime<Utc>) -> Result<Snapshot> {
        self.settings.location = Location::default();
        self.apply(now)
    }

    /// Ask for the device position; answer with [`Self::complete_geolocation`].
    pub fn request_geolocation(&mut self) -> GeolocationRequest {
        self.geolocation.request(GeolocationOptions::default())
    }

    /// Apply the answer to `request`.
    ///
    /// Answers to superseded or already answered requests are ignored and
    /// yield `Ok(None)`.
    pub fn complete_geolocation(
        &mut self,
        request: &GeolocationRequest,
        outcome: GeolocationOutcome,
        now: DateTime<Utc>,
    ) -> Result<Option<Snapshot>> {
        if !self.geolocation.accept(request) {
            log::debug!("ignoring answer to superseded geolocation request {}", request.id());
            return Ok(None);
        }
        if !outcome.is_success() {
            log::warn!("geolocation failed ({outcome:?}), using the default location");
        }
        self.settings.location = outcome.location();
        self.apply(now).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::GeoCoordinate;
    use crate::ephemeris::Meeus;
    use crate::settings::{MemoryStore, SETTINGS_KEY};
    use chrono::FixedOffset;

    fn context() -> Context<Meeus, MemoryStore, FixedOffset> {
        Context::new(Meeus, MemoryStore::new(), FixedOffset::east_opt(3600).unwrap())
    }

    fn t(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, h, m, s).unwrap()
    }

    #[test]
    fn snapshot_contents() {
        let mut ctx = context();
        let snap = ctx.tick(t(12, 0, 0)).unwrap();
        assert_eq!(snap.lang, Language::Sv);
        assert_eq!(snap.location, Location::stockholm());
        assert_eq!(snap.weekday, Weekday::Wed);
        assert_eq!(snap.latin_weekday(), "Dies Mercurii");
        assert_eq!(snap.epoch.anno(), "V:x");
        assert_eq!(snap.sun.sign, crate::zodiac::Sign::Aries);
        assert_eq!(snap.next_resh.unwrap().kind, crate::resh::ReshKind::Sunset);
        assert_eq!(
            snap.next_equinox,
            round_to_nearest_two_hours(crate::equinox::vernal_equinox_utc(&Meeus, 2025).unwrap())
        );
    }

    #[test]
    fn heavy_state_is_cached_for_thirty_seconds() {
        let mut ctx = context();
        let first = ctx.tick(t(12, 0, 0)).unwrap();
        let cached = ctx.tick(t(12, 0, 30)).unwrap();
        assert_eq!(cached.computed_at, first.computed_at);
        assert_eq!(cached.now, t(12, 0, 30));
        assert!(cached.countdown < first.countdown);

        let fresh = ctx.tick(t(12, 0, 31)).unwrap();
        assert_eq!(fresh.computed_at, t(12, 0, 31));
    }

    #[test]
    fn passing_the_next_event_recomputes() {
        let mut ctx = context();
        let snap = ctx.tick(t(12, 0, 0)).unwrap();
        let next = snap.next_resh.unwrap();

        let just_before = next.instant - Duration::seconds(10);
        let before = ctx.tick(just_before).unwrap();
        assert_eq!(before.next_resh.unwrap().kind, next.kind);

        let after = ctx.tick(next.instant).unwrap();
        assert_eq!(after.computed_at, next.instant);
        assert_ne!(after.next_resh.unwrap().kind, next.kind);
    }

    #[test]
    fn toggling_language_persists() {
        let mut ctx = context();
        let snap = ctx.toggle_language(t(12, 0, 0)).unwrap();
        assert_eq!(snap.lang, Language::En);
        let stored = ctx.store().load(SETTINGS_KEY).unwrap().unwrap();
        assert_eq!(stored["lang"], "en");

        let snap = ctx.set_language(Language::Sv, t(12, 0, 1)).unwrap();
        assert_eq!(snap.lang, Language::Sv);
    }

    #[test]
    fn geolocation_success_and_stale_answers() {
        let mut ctx = context();
        let stale = ctx.request_geolocation();
        let current = ctx.request_geolocation();

        let paris = GeolocationOutcome::Success {
            latitude: 48.85,
            longitude: 2.35,
            altitude: Some(35.0),
        };
        assert_eq!(ctx.complete_geolocation(&stale, paris, t(12, 0, 0)).unwrap(), None);
        assert_eq!(ctx.settings().location, Location::stockholm());

        let snap = ctx
            .complete_geolocation(&current, paris, t(12, 0, 0))
            .unwrap()
            .unwrap();
        assert_eq!(snap.location.name, "Lokal plats");
        assert_eq!(snap.location.coordinate, GeoCoordinate::new(48.85, 2.35, 35.0));
        let stored = ctx.store().load(SETTINGS_KEY).unwrap().unwrap();
        assert_eq!(stored["location"]["latitude"], 48.85);
    }

    #[test]
    fn geolocation_failures_reset_to_default() {
        for failure in [
            GeolocationOutcome::Denied,
            GeolocationOutcome::Unavailable,
            GeolocationOutcome::TimedOut,
        ] {
            let mut ctx = context();
            let req = ctx.request_geolocation();
            ctx.complete_geolocation(
                &req,
                GeolocationOutcome::Success {
                    latitude: 10.0,
                    longitude: 10.0,
                    altitude: None,
                },
                t(12, 0, 0),
            )
            .unwrap();

            let req = ctx.request_geolocation();
            let snap = ctx.complete_geolocation(&req, failure, t(12, 0, 1)).unwrap().unwrap();
            assert_eq!(snap.location, Location::stockholm());
            assert_eq!(Settings::load_or_default(ctx.store()).location, Location::stockholm());
        }
    }

    #[test]
    fn reset_location() {
        let mut store = MemoryStore::new();
        Settings {
            lang: Language::En,
            location: Location::new("Oslo", GeoCoordinate::new(59.91, 10.75, 0.0)),
        }
        .save(&mut store)
        .unwrap();

        let mut ctx = Context::new(Meeus, store, Utc);
        assert_eq!(ctx.settings().location.name, "Oslo");
        let snap = ctx.reset_location(t(12, 0, 0)).unwrap();
        assert_eq!(snap.location, Location::stockholm());
        assert_eq!(snap.lang, Language::En);
    }
}
