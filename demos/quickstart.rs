use chrono::Utc;
use thelema_calendar::{
    next_resh, EpochCalendar, Ephemeris, JulianDate, Location, Meeus, MoonPhase, SignPosition,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let jd = JulianDate::from_utc(now);

    let anno = EpochCalendar::THELEMIC.map(&Meeus, now)?;
    let sun = Meeus.sun_longitude(jd);
    let moon = Meeus.moon_longitude(jd);

    println!("Anno {anno}");
    println!("☉ in {}", SignPosition::from_longitude(sun));
    println!("☾ in {}", SignPosition::from_longitude(moon));
    println!("Moon: {:?}", MoonPhase::from_longitudes(sun, moon).name);

    let here = Location::default();
    let schedule = next_resh(&Meeus, &here.coordinate, now, &Utc);
    if let Some(next) = schedule.next {
        println!("Next Resh: {:?} at {}", next.kind, next.instant);
    }
    Ok(())
}
