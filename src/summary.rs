use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::WeatherError;
use crate::openweather::{DailyEntry, ForecastEntry};

pub const SECONDS_PER_DAY: i64 = 86_400;
/// Number of one-call days that take part in the daylight search.
pub const SUMMARY_DAYS: usize = 5;

const DAY_LABEL_FMT: &str = "%A, %B %d, %Y";

/// Which clock turns timestamps into human-readable text.
#[derive(ValueEnum, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    /// The city's own UTC offset, as reported by OpenWeather.
    #[default]
    City,
    /// The time zone of the machine running the program.
    System,
}

/* ============================ Night boundaries ============================ */

/// Indices of the slots that fall exactly on local midnight.
pub fn night_boundaries(entries: &[ForecastEntry], utc_offset: i32) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| (e.dt + i64::from(utc_offset)).rem_euclid(SECONDS_PER_DAY) == 0)
        .map(|(i, _)| i)
        .collect()
}

/// Boundaries with slot 0 prepended, so consecutive pairs delimit segments.
pub fn segment_starts(boundaries: &[usize]) -> Vec<usize> {
    let mut starts = Vec::with_capacity(boundaries.len() + 1);
    starts.push(0);
    starts.extend_from_slice(boundaries);
    starts
}

/* ============================ Temperature delta ============================ */

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TempDelta {
    /// `feels_like - night temp_min`, in Celsius, sign kept.
    pub delta: f64,
    pub dt: i64,
}

/// Compares every slot of a segment with the minimum temperature of the
/// boundary slot that closes it, and keeps the smallest magnitude. Equal
/// magnitudes keep the earlier slot.
pub fn min_delta(entries: &[ForecastEntry], starts: &[usize], units: &str) -> Option<TempDelta> {
    let mut best: Option<TempDelta> = None;

    for w in starts.windows(2) {
        let (from, to) = (w[0], w[1]);
        let Some(night) = entries.get(to) else { break };
        let night_min = to_celsius(night.main.temp_min, units);

        for slot in &entries[from..to] {
            let delta = to_celsius(slot.main.feels_like, units) - night_min;
            if best.is_none_or(|b| delta.abs() < b.delta.abs()) {
                best = Some(TempDelta { delta, dt: slot.dt });
            }
        }
    }
    best
}

/* ============================ Daylight ============================ */

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Daylight {
    pub seconds: i64,
    pub sunrise: i64,
}

/// The first `SUMMARY_DAYS` entries of a one-call response.
pub fn daily_window(daily: &[DailyEntry]) -> Result<&[DailyEntry], WeatherError> {
    daily.get(..SUMMARY_DAYS).ok_or(WeatherError::ShortDaily {
        got: daily.len(),
        want: SUMMARY_DAYS,
    })
}

/// Longest `sunset - sunrise`; the earliest day wins a tie.
pub fn max_daylight(days: &[DailyEntry]) -> Option<Daylight> {
    let mut best: Option<Daylight> = None;
    for day in days {
        let seconds = day.sunset - day.sunrise;
        if best.is_none_or(|b| seconds > b.seconds) {
            best = Some(Daylight { seconds, sunrise: day.sunrise });
        }
    }
    best
}

/* ============================ Formatting ============================ */

fn utc(ts: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::<Utc>::from_timestamp(ts, 0).ok_or(WeatherError::Timestamp(ts))
}

/// "Weekday, Month DD, YYYY" for a UNIX timestamp.
pub fn day_label(ts: i64, utc_offset: i32, clock: Clock) -> Result<String, WeatherError> {
    let when = utc(ts)?;
    Ok(match clock {
        Clock::City => {
            let offset = FixedOffset::east_opt(utc_offset)
                .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
            when.with_timezone(&offset).format(DAY_LABEL_FMT).to_string()
        }
        Clock::System => when.with_timezone(&Local).format(DAY_LABEL_FMT).to_string(),
    })
}

/// HH:MM:SS for a daylight length.
///
/// `Clock::System` renders the length as the local wall-clock time of that
/// many seconds after the epoch, which is only right on a UTC machine. It is
/// kept for output parity with older runs.
pub fn format_duration(seconds: i64, clock: Clock) -> Result<String, WeatherError> {
    match clock {
        Clock::City => {
            let s = seconds.max(0);
            Ok(format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60))
        }
        Clock::System => Local
            .timestamp_opt(seconds, 0)
            .single()
            .map(|t| t.format("%H:%M:%S").to_string())
            .ok_or(WeatherError::Timestamp(seconds)),
    }
}

pub fn format_delta(delta: f64) -> String {
    format!("{delta:.2}℃")
}

/* ============================ Utils ============================ */

/// Normalize temperatures to Celsius based on the configured units.
pub fn to_celsius(value: f64, units: &str) -> f64 {
    match units {
        "metric" => value,                        // already °C
        "imperial" => (value - 32.0) * 5.0 / 9.0, // °F -> °C
        "standard" => value - 273.15,             // K -> °C
        _ => value,                               // unknown -> assume metric
    }
}
