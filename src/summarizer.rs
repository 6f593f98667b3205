use reqwest::Client;
use serde::Serialize;

use crate::config::Config;
use crate::error::WeatherError;
use crate::openweather::{self, Coord, DailyEntry, ForecastEntry};
use crate::summary::{self, Clock, Daylight, TempDelta};

#[derive(Serialize, Debug, Clone)]
pub struct Location {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub utc_offset: i32, // seconds from UTC
}

#[derive(Serialize, Debug, Clone)]
pub struct DaylightSummary {
    #[serde(flatten)]
    pub raw: Daylight,
    pub duration: String, // HH:MM:SS
    pub day: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct DeltaSummary {
    #[serde(flatten)]
    pub raw: TempDelta,
    pub delta_label: String,
    pub day: String,
}

/// Resolves a city once and answers both summary questions for it.
pub struct WeatherSummarizer {
    client: Client,
    cfg: Config,
    location: Location,
}

impl WeatherSummarizer {
    /// Fails before touching the network when no API key is configured.
    pub async fn new(cfg: Config) -> Result<Self, WeatherError> {
        if cfg.api_key.is_empty() {
            return Err(WeatherError::MissingApiKey);
        }
        let client = Client::builder().build()?;

        let cur = openweather::fetch_current(&client, &cfg).await?;
        let location = Location {
            city: cfg.city.clone(),
            lat: cur.coord.lat,
            lon: cur.coord.lon,
            utc_offset: cur.timezone,
        };
        tracing::info!(
            city = %location.city,
            lat = location.lat,
            lon = location.lon,
            utc_offset = location.utc_offset,
            "resolved location"
        );

        Ok(Self { client, cfg, location })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub async fn forecast(&self) -> Result<Vec<ForecastEntry>, WeatherError> {
        let fc = openweather::fetch_forecast(&self.client, &self.cfg).await?;
        tracing::debug!(slots = fc.list.len(), "forecast received");
        Ok(fc.list)
    }

    /// Exactly `SUMMARY_DAYS` sunrise/sunset pairs.
    pub async fn daily(&self) -> Result<Vec<DailyEntry>, WeatherError> {
        let coord = Coord { lat: self.location.lat, lon: self.location.lon };
        let oc = openweather::fetch_one_call(&self.client, &self.cfg, coord).await?;
        Ok(summary::daily_window(&oc.daily)?.to_vec())
    }

    pub async fn max_daylight_and_day(&self, clock: Clock) -> Result<DaylightSummary, WeatherError> {
        let days = self.daily().await?;
        summarize_daylight(&days, self.location.utc_offset, clock)
    }

    pub async fn min_degrees_and_day(&self, clock: Clock) -> Result<DeltaSummary, WeatherError> {
        let entries = self.forecast().await?;
        summarize_delta(&entries, self.location.utc_offset, &self.cfg.units, clock)
    }
}

/* ============================ Pure summaries ============================ */

pub fn summarize_daylight(
    days: &[DailyEntry],
    utc_offset: i32,
    clock: Clock,
) -> Result<DaylightSummary, WeatherError> {
    let raw = summary::max_daylight(days).ok_or(WeatherError::NoDaylight)?;
    Ok(DaylightSummary {
        raw,
        duration: summary::format_duration(raw.seconds, clock)?,
        day: summary::day_label(raw.sunrise, utc_offset, clock)?,
    })
}

pub fn summarize_delta(
    entries: &[ForecastEntry],
    utc_offset: i32,
    units: &str,
    clock: Clock,
) -> Result<DeltaSummary, WeatherError> {
    let boundaries = summary::night_boundaries(entries, utc_offset);
    tracing::debug!(?boundaries, "night boundaries");
    if boundaries.len() != summary::SUMMARY_DAYS {
        tracing::warn!(
            found = boundaries.len(),
            expected = summary::SUMMARY_DAYS,
            "unexpected number of night boundaries"
        );
    }

    let starts = summary::segment_starts(&boundaries);
    let raw = summary::min_delta(entries, &starts, units).ok_or(WeatherError::NoSegments)?;
    Ok(DeltaSummary {
        raw,
        delta_label: summary::format_delta(raw.delta),
        day: summary::day_label(raw.dt, utc_offset, clock)?,
    })
}
