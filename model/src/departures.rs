use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use gtfs::StopID;

use crate::ScheduleIndex;

/// At most this many departures are shown per stop
pub const MAX_UPCOMING: usize = 3;
/// Departures this close are imminent instead of counting down
pub const IMMINENT_MINUTES: f64 = 1.0;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

#[derive(Clone, Debug, PartialEq)]
pub struct UpcomingDeparture {
    /// The route's short name
    pub line: String,
    /// The route's long name
    pub destination: String,
    /// Fractional; never negative
    pub minutes_until: f64,
    pub countdown: Countdown,
}

/// How to present the time until a departure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    Imminent,
    Minutes(i64),
}

impl Countdown {
    fn new(minutes_until: f64) -> Self {
        if minutes_until <= IMMINENT_MINUTES {
            Countdown::Imminent
        } else {
            Countdown::Minutes(minutes_until.round() as i64)
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Countdown::Imminent => write!(f, "imminent"),
            Countdown::Minutes(x) => write!(f, "in {x} min"),
        }
    }
}

impl fmt::Display for UpcomingDeparture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} → {}: {}", self.line, self.destination, self.countdown)
    }
}

impl ScheduleIndex {
    /// The next few departures from a stop, soonest first. Anything already gone today is
    /// treated as the same clock time tomorrow. Events with an unparseable time are skipped.
    pub fn upcoming_departures(
        &self,
        stop: &StopID,
        now: NaiveDateTime,
    ) -> Vec<UpcomingDeparture> {
        let mut candidates = Vec::new();
        for ev in self.departures(stop) {
            let at = match departure_instant(now.date(), &ev.time) {
                Some(at) => at,
                None => {
                    debug!("Skipping departure from {stop} at unparseable {:?}", ev.time);
                    continue;
                }
            };
            let mut minutes = (at - now).num_milliseconds() as f64 / 60_000.0;
            // Not calendar-accurate past one day; this only aims to show the rest of today
            if minutes < 0.0 {
                minutes += MINUTES_PER_DAY;
            }
            candidates.push((minutes, ev));
        }

        // Stable, so ties keep file order
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        candidates
            .into_iter()
            .filter(|(minutes, _)| *minutes >= 0.0)
            .take(MAX_UPCOMING)
            .map(|(minutes, ev)| UpcomingDeparture {
                line: ev.line_short_name.clone(),
                destination: ev.line_long_name.clone(),
                minutes_until: minutes,
                countdown: Countdown::new(minutes),
            })
            .collect()
    }
}

/// Applies a `H:M:S` (or `H:M`) schedule time to midnight of `date`. Any non-negative hour is
/// accepted, so `25:10:00` lands on the next day. Minutes and seconds past 59 carry over the same
/// way.
pub fn departure_instant(date: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let hours: i64 = parts[0].parse::<u32>().ok()?.into();
    let minutes: i64 = parts[1].parse::<u32>().ok()?.into();
    let seconds: i64 = match parts.get(2) {
        Some(x) => x.parse::<u32>().ok()?.into(),
        None => 0,
    };
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(hours * 3600 + minutes * 60 + seconds))
}
