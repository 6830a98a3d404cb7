use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use qtty::{Day, Seconds};
use tempfile::TempDir;
use thelema_calendar::equinox::wrapped_sun_longitude;
use thelema_calendar::{
    find_vernal_equinox, next_resh, select_next_event, vernal_equinox_utc,
    Context, Countdown, EpochCalendar, GeoCoordinate, GeolocationOutcome, JsonFileStore,
    JulianDate, Language, Location, Meeus, ReshEvent, ReshKind, Settings, UT,
};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[test]
fn utc_roundtrip_j2000_is_stable() {
    let datetime = DateTime::from_timestamp(946_728_000, 0).unwrap();
    let jd = JulianDate::from_utc(datetime);
    assert_eq!(jd.to_utc(), Some(datetime));
}

#[test]
fn ut_applies_delta_t_near_j2000() {
    let ut = thelema_calendar::Time::<UT>::new(2_451_545.0);
    let jd: JulianDate = ut.to::<thelema_calendar::JD>();
    let offset_s = (jd.quantity() - ut.quantity()).to::<Day>().to::<qtty::Second>();
    assert!((offset_s - Seconds::new(63.86)).abs() < Seconds::new(1.0));
}

#[test]
fn equinox_2024_and_its_year() {
    let eq = vernal_equinox_utc(&Meeus, 2024).unwrap();
    assert!((eq - utc(2024, 3, 20, 3, 6)).num_minutes().abs() <= 30);

    let pos = EpochCalendar::THELEMIC
        .map(&Meeus, eq + Duration::seconds(1))
        .unwrap();
    assert_eq!(pos.offset, 120);
    assert_eq!(pos.cycle_index, 5);
    assert_eq!(pos.position_in_cycle, 10);
}

#[test]
fn equinox_residual_1900_to_2100() {
    for year in 1900..=2100 {
        let eq = find_vernal_equinox(&Meeus, year).unwrap();
        let residual = wrapped_sun_longitude(&Meeus, eq).abs();
        assert!(residual < 1e-6, "{year}: {residual}");
    }
}

#[test]
fn years_before_the_epoch() {
    let pos = EpochCalendar::THELEMIC.map(&Meeus, utc(1900, 6, 1, 0, 0)).unwrap();
    assert_eq!(pos.offset, -4);
    assert_eq!((pos.cycle_index, pos.position_in_cycle), (-1, 18));
}

#[test]
fn evening_countdown_to_midnight() {
    let at = |d, h| Some(utc(2024, 6, d, h, 0));
    let events = [
        ReshEvent::new(ReshKind::Dawn, at(1, 6)),
        ReshEvent::new(ReshKind::SolarNoon, at(1, 12)),
        ReshEvent::new(ReshKind::Sunset, at(1, 18)),
        ReshEvent::new(ReshKind::Midnight, at(2, 0)),
    ];
    let now = utc(2024, 6, 1, 19, 0);
    let next = select_next_event(now, &events).unwrap();
    assert_eq!(next.kind, ReshKind::Midnight);
    assert_eq!(Countdown::until(now, next.instant).to_string(), "05:00:00");

    let exactly_at_sunset = utc(2024, 6, 1, 18, 0);
    let next = select_next_event(exactly_at_sunset, &events).unwrap();
    assert_eq!(next.kind, ReshKind::Midnight);
}

#[test]
fn polar_latitudes_do_not_break_scheduling() {
    for lat in [-89.0, -75.0, 75.0, 89.0] {
        let observer = GeoCoordinate::new(lat, 0.0, 0.0);
        for (month, day) in [(3, 20), (6, 21), (9, 22), (12, 21)] {
            let now = utc(2024, month, day, 12, 0);
            let schedule = next_resh(&Meeus, &observer, now, &Utc);
            let next = schedule.next.expect("noon and midnight are always present");
            assert!(next.instant > now || next.wrapped);
        }
    }
}

#[test]
fn context_over_a_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let cet = FixedOffset::east_opt(3600).unwrap();
    let now = utc(2024, 3, 20, 12, 0);

    let mut ctx = Context::new(Meeus, JsonFileStore::new(&path), cet);
    let snap = ctx.tick(now).unwrap();
    assert_eq!(snap.lang, Language::Sv);
    assert_eq!(snap.epoch.anno(), "V:x");

    ctx.toggle_language(now).unwrap();
    let request = ctx.request_geolocation();
    ctx.complete_geolocation(
        &request,
        GeolocationOutcome::Success {
            latitude: 55.6761,
            longitude: 12.5683,
            altitude: None,
        },
        now,
    )
    .unwrap();

    let reloaded = Settings::load_or_default(&JsonFileStore::new(&path));
    assert_eq!(reloaded.lang, Language::En);
    assert_eq!(
        reloaded.location,
        Location::local(GeoCoordinate::new(55.6761, 12.5683, 0.0))
    );

    let mut again = Context::new(Meeus, JsonFileStore::new(&path), cet);
    let snap = again.tick(now + Duration::seconds(1)).unwrap();
    assert_eq!(snap.location.name, "Lokal plats");
    assert_eq!(snap.lang, Language::En);
}
