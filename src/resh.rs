// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Resh Scheduler
//!
//! The four daily adorations of the Sun and the countdown to the next one.
//!
//! | Kind | Instant |
//! |------|---------|
//! | [`Dawn`](ReshKind::Dawn) | first sunrise after the local day start |
//! | [`SolarNoon`](ReshKind::SolarNoon) | midpoint of sunrise and sunset; solar transit when either is missing or the sunset comes first |
//! | [`Sunset`](ReshKind::Sunset) | first sunset after the local day start |
//! | [`Midnight`](ReshKind::Midnight) | solar noon + 12 h |
//!
//! Sunrise and sunset are searched up to two days ahead of the day start.
//! When the Sun does not cross the horizon (polar day or night) the event is
//! absent and skipped by the scheduler.

use crate::coordinates::GeoCoordinate;
use crate::ephemeris::Ephemeris;
use crate::riseset::RiseSet;
use crate::JulianDate;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use qtty::Days;
use std::fmt;

/// How far ahead of the day start horizon events are searched.
pub const SEARCH_WINDOW: Days = Days::new(2.0);

/// The four Resh adorations, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReshKind {
    Dawn,
    SolarNoon,
    Sunset,
    Midnight,
}

impl ReshKind {
    pub const ALL: [ReshKind; 4] = [
        ReshKind::Dawn,
        ReshKind::SolarNoon,
        ReshKind::Sunset,
        ReshKind::Midnight,
    ];

    pub fn icon(self) -> &'static str {
        match self {
            ReshKind::Dawn => "🌅",
            ReshKind::SolarNoon => "☀️",
            ReshKind::Sunset => "🌇",
            ReshKind::Midnight => "🌌",
        }
    }
}

/// One adoration and its instant, `None` when it could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshEvent {
    pub kind: ReshKind,
    pub instant: Option<DateTime<Utc>>,
}

impl ReshEvent {
    pub const fn new(kind: ReshKind, instant: Option<DateTime<Utc>>) -> Self {
        Self { kind, instant }
    }
}

/// The four events of one local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshDay {
    pub day_start: DateTime<Utc>,
    pub events: [ReshEvent; 4],
}

impl ReshDay {
    /// Resolve the events of the local day beginning at `day_start`.
    pub fn compute<E: Ephemeris + ?Sized>(
        ephemeris: &E,
        observer: &GeoCoordinate,
        day_start: DateTime<Utc>,
    ) -> Self {
        let start = JulianDate::from_utc(day_start);
        let search = |direction| {
            ephemeris
                .search_rise_set(observer, direction, start, SEARCH_WINDOW)
                .and_then(|t| t.to_utc())
        };
        let sunrise = search(RiseSet::Rise);
        let sunset = search(RiseSet::Set);

        // A day start after the observer's sunrise finds tomorrow's sunrise,
        // which would put the midpoint at solar midnight.
        let noon = match (sunrise, sunset) {
            (Some(rise), Some(set)) if rise < set => rise + (set - rise) / 2,
            _ => ephemeris
                .search_transit(observer, start, SEARCH_WINDOW)
                .and_then(|t| t.to_utc())
                .unwrap_or_else(|| {
                    log::debug!("no solar transit after {day_start}, using day start + 12 h");
                    day_start + Duration::hours(12)
                }),
        };
        let midnight = noon + Duration::hours(12);

        log::debug!(
            "resh day from {day_start}: sunrise {sunrise:?}, noon {noon}, sunset {sunset:?}"
        );

        Self {
            day_start,
            events: [
                ReshEvent::new(ReshKind::Dawn, sunrise),
                ReshEvent::new(ReshKind::SolarNoon, Some(noon)),
                ReshEvent::new(ReshKind::Sunset, sunset),
                ReshEvent::new(ReshKind::Midnight, Some(midnight)),
            ],
        }
    }

    /// Instant of `kind`, if resolved.
    pub fn get(&self, kind: ReshKind) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .find(|e| e.kind == kind)
            .and_then(|e| e.instant)
    }
}

/// The event the countdown runs towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextEventSelection {
    pub kind: ReshKind,
    pub instant: DateTime<Utc>,
    /// No event was after `now`; this is the earliest of the set.
    pub wrapped: bool,
}

/// Pick the first event strictly after `now`.
///
/// Absent events are ignored.  Ties keep the order of `events`.  When every
/// event is at or before `now` the earliest one is returned with
/// `wrapped = true`; an empty set yields `None`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use thelema_calendar::{select_next_event, ReshEvent, ReshKind};
///
/// let at = |h| Some(Utc.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap());
/// let events = [
///     ReshEvent::new(ReshKind::Dawn, at(6)),
///     ReshEvent::new(ReshKind::Sunset, at(18)),
/// ];
/// let next = select_next_event(at(12).unwrap(), &events).unwrap();
/// assert_eq!(next.kind, ReshKind::Sunset);
/// assert!(!next.wrapped);
/// ```
pub fn select_next_event(now: DateTime<Utc>, events: &[ReshEvent]) -> Option<NextEventSelection> {
    let mut present: Vec<(ReshKind, DateTime<Utc>)> = events
        .iter()
        .filter_map(|e| e.instant.map(|t| (e.kind, t)))
        .collect();
    present.sort_by_key(|&(_, t)| t);

    let (kind, instant, wrapped) = match present.iter().find(|&&(_, t)| t > now) {
        Some(&(kind, t)) => (kind, t, false),
        None => {
            let &(kind, t) = present.first()?;
            (kind, t, true)
        }
    };
    Some(NextEventSelection {
        kind,
        instant,
        wrapped,
    })
}

/// Today's events together with the selected next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshSchedule {
    pub today: ReshDay,
    /// The following local day, computed only once today's events are over.
    pub tomorrow: Option<ReshDay>,
    pub next: Option<NextEventSelection>,
}

/// Compute the events of the local day containing `now` and the next one
/// after `now`.
///
/// When every event of today has passed, the following local day's events
/// are computed and the next event is chosen from those; only if that also
/// fails is the wrap-around guess from today's set kept.
pub fn next_resh<E: Ephemeris + ?Sized, Tz: TimeZone>(
    ephemeris: &E,
    observer: &GeoCoordinate,
    now: DateTime<Utc>,
    tz: &Tz,
) -> ReshSchedule {
    let day_start = local_day_start(now, tz);
    let today = ReshDay::compute(ephemeris, observer, day_start);
    let mut next = select_next_event(now, &today.events);
    let mut tomorrow = None;

    if next.is_some_and(|n| n.wrapped) {
        // 36 h lands inside the next local day for 23 h and 25 h days alike.
        let tomorrow_start = local_day_start(day_start + Duration::hours(36), tz);
        let day = ReshDay::compute(ephemeris, observer, tomorrow_start);
        match select_next_event(now, &day.events) {
            Some(n) if !n.wrapped => next = Some(n),
            _ => log::warn!("no Resh event after {now}, keeping wrap-around guess"),
        }
        tomorrow = Some(day);
    }

    ReshSchedule {
        today,
        tomorrow,
        next,
    }
}

/// Start of the local calendar day containing `now`, as a UTC instant.
///
/// Where local midnight does not exist (a DST gap at 00:00) the day starts
/// at the first instant after the gap.
pub fn local_day_start<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let local = now.with_timezone(tz);
    let midnight = local.date_naive().and_time(NaiveTime::MIN);
    (0..=MAX_GAP_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(midnight + Duration::minutes(m)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| {
            log::warn!("no local time after midnight of {}, using now", local.date_naive());
            now
        })
}

/// Longest local-time gap searched past midnight.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Non-negative time left until an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Countdown(Duration);

impl Countdown {
    /// `max(0, target − now)`.
    pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        Self((target - now).max(Duration::zero()))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for Countdown {
    /// `HH:MM:SS`, whole seconds; hours are not wrapped into days.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.num_seconds();
        write!(
            f,
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }
}
