// Packages
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

mod config;
mod error;
mod openweather;
mod summarizer;
mod summary;

use config::{Config, API_KEY_ENV};
use summarizer::{DaylightSummary, DeltaSummary, Location, WeatherSummarizer};
use summary::Clock;

/// Longest daylight and smallest feels-like vs. night temperature gap
/// over the next five days, from OpenWeather.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to YAML config. Search order if not given:
    /// $WEATHER_CONFIG, ./config/rust.yaml, ./config.yaml, ~/.config/weather-summary/config.yaml
    #[arg(long)]
    config: Option<PathBuf>,

    /// City to summarize. Overrides app.city from the config (default: Dmitrov).
    #[arg(long)]
    city: Option<String>,

    /// Time zone used for day labels and the daylight duration.
    #[arg(long, value_enum, default_value_t = Clock::City)]
    clock: Clock,

    /// Also write the summary as pretty JSON here.
    #[arg(long)]
    out: Option<PathBuf>,
}

/* ============================ Output JSON ============================ */

#[derive(Serialize)]
struct Output {
    generated_at_utc: String,
    clock: Clock,
    location: Location,
    max_daylight: DaylightSummary,
    min_temperature_delta: DeltaSummary,
}

/* ============================ Main ============================ */

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let file_cfg = config::load_file_config(args.config)?;
    let cfg = Config::resolve(file_cfg, std::env::var(API_KEY_ENV).ok(), args.city);
    let city = cfg.city.clone();

    let summarizer = WeatherSummarizer::new(cfg)
        .await
        .with_context(|| format!("resolving location for {city}"))?;

    let daylight = summarizer
        .max_daylight_and_day(args.clock)
        .await
        .context("computing maximum daylight")?;
    println!("Maximum daylight is {} at day {}", daylight.duration, daylight.day);

    let delta = summarizer
        .min_degrees_and_day(args.clock)
        .await
        .context("computing minimum temperature difference")?;
    println!(
        "Minimum temperature differense between feels-like and night is {} at day {}",
        delta.delta_label, delta.day
    );

    if let Some(path) = args.out {
        let out = Output {
            generated_at_utc: Utc::now().format("%d-%m-%Y %H:%M").to_string(),
            clock: args.clock,
            location: summarizer.location().clone(),
            max_daylight: daylight,
            min_temperature_delta: delta,
        };
        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
