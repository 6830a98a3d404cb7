// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Terminal Thelemic calendar.
//!
//! Prints the calendar panel, then refreshes the Resh countdown once per
//! second.  Logging goes to stderr; set `RUST_LOG=debug` to follow the
//! recomputations.

use std::path::PathBuf;
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Timelike, Utc};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use thelema_calendar::{
    Context, GeolocationOutcome, JsonFileStore, Language, Meeus, ReshKind, Snapshot,
};

#[derive(Parser)]
#[command(name = "thelema", about = "Thelemic calendar with Resh times")]
struct Cli {
    /// Display language (persisted)
    #[arg(long, value_enum)]
    lang: Option<LangArg>,
    /// Observer latitude in degrees, north positive (persisted with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees, east positive
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Observer elevation in meters
    #[arg(long, requires = "lat")]
    elevation: Option<f64>,
    /// Return to the default location (Stockholm)
    #[arg(long, conflicts_with = "lat")]
    reset_location: bool,
    /// Settings file
    #[arg(long, default_value = "thelema-settings.json")]
    settings: PathBuf,
    /// Instant to show instead of the clock (RFC 3339); the countdown then
    /// advances without waiting
    #[arg(long)]
    at: Option<DateTime<Utc>>,
    /// Print the panel once and exit
    #[arg(long)]
    once: bool,
    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    Sv,
    En,
}

impl From<LangArg> for Language {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::Sv => Language::Sv,
            LangArg::En => Language::En,
        }
    }
}

// ── String tables ─────────────────────────────────────────────────────────

struct Strings {
    sun: &'static str,
    moon: &'static str,
    moon_age: &'static str,
    tarot: &'static str,
    tarot_in: &'static str,
    anno: &'static str,
    ev: &'static str,
    day_unit: &'static str,
    equinox_next: &'static str,
    next_resh: &'static str,
    next_resh_in: &'static str,
    resh: [&'static str; 4],
    phases: [&'static str; 8],
    months: [&'static str; 12],
    atu: [&'static str; 22],
}

const SV: Strings = Strings {
    sun: "Sol",
    moon: "Måne",
    moon_age: "Månålder",
    tarot: "Tarot",
    tarot_in: "i",
    anno: "Anno",
    ev: "E.V.",
    day_unit: "dygn",
    equinox_next: "Nästa vårdagjämning ~±2h (lokal tid)",
    next_resh: "Nästa Resh",
    next_resh_in: "om",
    resh: ["Soluppgång", "Mitt på dagen", "Solnedgång", "Midnatt"],
    phases: [
        "Nymåne",
        "Tilltagande skära",
        "Första kvarteret",
        "Tilltagande gibbous",
        "Fullmåne",
        "Avtagande gibbous",
        "Sista kvarteret",
        "Avtagande skära",
    ],
    months: [
        "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti",
        "september", "oktober", "november", "december",
    ],
    atu: [
        "Narren", "Magikern", "Översteprästinnan", "Kejsarinnan", "Kejsaren",
        "Hierofanten", "De älskande", "Vagnen", "Justering", "Eremiten",
        "Förändring", "Lustan", "Den hängde", "Döden", "Konsten",
        "Djävulen", "Tornet", "Stjärnan", "Månen", "Solen",
        "Aeonen", "Universum",
    ],
};

const EN: Strings = Strings {
    sun: "Sun",
    moon: "Moon",
    moon_age: "Moon age",
    tarot: "Tarot",
    tarot_in: "in",
    anno: "Anno",
    ev: "E.V.",
    day_unit: "days",
    equinox_next: "Next vernal equinox ~±2h (local time)",
    next_resh: "Next Resh",
    next_resh_in: "in",
    resh: ["Sunrise", "Noon", "Sunset", "Midnight"],
    phases: [
        "New Moon",
        "Waxing Crescent",
        "First Quarter",
        "Waxing Gibbous",
        "Full Moon",
        "Waning Gibbous",
        "Last Quarter",
        "Waning Crescent",
    ],
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ],
    atu: [
        "The Fool", "The Magus", "The High Priestess", "The Empress", "The Emperor",
        "The Hierophant", "The Lovers", "The Chariot", "Adjustment", "The Hermit",
        "Fortune", "Lust", "The Hanged Man", "Death", "Art",
        "The Devil", "The Tower", "The Star", "The Moon", "The Sun",
        "Aeon", "The Universe",
    ],
};

fn strings(lang: Language) -> &'static Strings {
    match lang {
        Language::Sv => &SV,
        Language::En => &EN,
    }
}

fn resh_index(kind: ReshKind) -> usize {
    ReshKind::ALL.iter().position(|&k| k == kind).unwrap_or(0)
}

// ── Rendering ─────────────────────────────────────────────────────────────

fn fmt_time<Tz: TimeZone>(instant: Option<DateTime<Utc>>, tz: &Tz) -> String {
    match instant {
        Some(t) => {
            let local = t.with_timezone(tz);
            format!("{:02}:{:02}", local.hour(), local.minute())
        }
        None => "—".to_owned(),
    }
}

fn panel<Tz: TimeZone>(snap: &Snapshot, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let t = strings(snap.lang);
    let (year_atu, cycle_atu) = snap.epoch.atu_indices();
    let month = t.months[snap.date.month0() as usize];

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", snap.latin_weekday()));
    out.push_str(&format!("☉ {} in {}\n", t.sun, snap.sun));
    out.push_str(&format!("☾ {} in {}\n\n", t.moon, snap.moon));
    out.push_str(&format!("{} {}\n", t.anno, snap.epoch.anno()));
    out.push_str(&format!(
        "{}: {} {} {}\n",
        t.tarot, t.atu[year_atu], t.tarot_in, t.atu[cycle_atu]
    ));
    out.push_str(&format!(
        "{} {} {} {}\n\n",
        snap.date.day(),
        month,
        snap.date.year(),
        t.ev
    ));
    out.push_str(&format!(
        "{} {}: {} ({}%)\n",
        snap.moon_phase.name.icon(),
        t.moon,
        t.phases[snap.moon_phase.name.index()],
        snap.moon_phase.illumination_pct
    ));
    out.push_str(&format!(
        "{}: {:.1} {}\n\n",
        t.moon_age,
        snap.moon_phase.age.value(),
        t.day_unit
    ));

    out.push_str(&format!("Resh ({})\n", snap.location.name));
    let next = snap.next_resh.map(|n| (n.kind, n.instant));
    for event in &snap.resh.events {
        let marker = match (next, event.instant) {
            (Some(n), Some(t)) if n == (event.kind, t) => "›",
            _ => " ",
        };
        out.push_str(&format!(
            "{marker} {} {:<16} {}\n",
            event.kind.icon(),
            t.resh[resh_index(event.kind)],
            fmt_time(event.instant, tz)
        ));
    }

    let eq = snap.next_equinox.with_timezone(tz);
    out.push_str(&format!(
        "\n{}: {}\n",
        t.equinox_next,
        eq.format("%Y-%m-%d %H:%M")
    ));
    out
}

fn countdown_line(snap: &Snapshot) -> String {
    let t = strings(snap.lang);
    match (snap.next_resh, snap.countdown) {
        (Some(next), Some(countdown)) => format!(
            "{}: {} {} {} {}",
            t.next_resh,
            next.kind.icon(),
            t.resh[resh_index(next.kind)],
            t.next_resh_in,
            countdown
        ),
        _ => format!("{}: —", t.next_resh),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.settings);
    let mut ctx = Context::new(Meeus, store, Local);

    let clock = |tick: u64| match cli.at {
        Some(at) => at + Duration::seconds(tick as i64),
        None => Utc::now(),
    };
    let now = clock(0);

    if let Some(lang) = cli.lang {
        ctx.set_language(lang.into(), now)?;
    }
    if cli.reset_location {
        ctx.reset_location(now)?;
    }
    if let (Some(latitude), Some(longitude)) = (cli.lat, cli.lon) {
        let request = ctx.request_geolocation();
        let outcome = GeolocationOutcome::Success {
            latitude,
            longitude,
            altitude: cli.elevation,
        };
        ctx.complete_geolocation(&request, outcome, now)?;
    }
    log::info!(
        "showing {} from {}",
        ctx.settings().location.name,
        cli.settings.display()
    );

    let limit = if cli.once { Some(1) } else { cli.ticks };
    let mut computed_at = None;
    let mut tick = 0;
    loop {
        let snap = ctx
            .tick(clock(tick))
            .with_context(|| format!("computing the calendar for tick {tick}"))?;
        if computed_at != Some(snap.computed_at) {
            println!("{}", panel(&snap, &Local));
            computed_at = Some(snap.computed_at);
        }
        println!("{}", countdown_line(&snap));

        tick += 1;
        if limit.is_some_and(|n| tick >= n) {
            break;
        }
        if cli.at.is_none() {
            thread::sleep(StdDuration::from_secs(1));
        }
    }
    Ok(())
}
