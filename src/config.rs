use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const DEFAULT_CITY: &str = "Dmitrov";
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_ONECALL_PATH: &str = "/data/2.5/onecall";

/* ============================ File config ============================ */

#[derive(Deserialize, Debug, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub openweather: OpenWeatherCfg,
    #[serde(default)]
    pub app: AppCfg,
}

#[derive(Deserialize, Debug)]
pub struct OpenWeatherCfg {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_units")]
    pub units: String, // "metric" | "imperial" | "standard"
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_onecall_path")]
    pub onecall_path: String,
}

impl Default for OpenWeatherCfg {
    fn default() -> Self {
        Self {
            api_key: None,
            units: default_units(),
            lang: default_lang(),
            base_url: default_base_url(),
            onecall_path: default_onecall_path(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AppCfg {
    #[serde(default = "default_city")]
    pub city: String,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self { city: default_city() }
    }
}

fn default_units() -> String { "metric".into() }
fn default_lang() -> String { "en".into() }
fn default_base_url() -> String { DEFAULT_BASE_URL.into() }
fn default_onecall_path() -> String { DEFAULT_ONECALL_PATH.into() }
fn default_city() -> String { DEFAULT_CITY.into() }

/// Looks for a YAML config in the usual places. A missing file is not an
/// error: everything has a default except the API key, which may come from
/// the environment instead.
pub fn load_file_config(explicit: Option<PathBuf>) -> Result<FileConfig> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(p) = explicit {
        // An explicitly named file must exist.
        let s = std::fs::read_to_string(&p)
            .with_context(|| format!("reading config from {}", p.display()))?;
        return parse_file_config(&s).with_context(|| format!("parsing YAML in {}", p.display()));
    }
    if let Ok(p) = std::env::var("WEATHER_CONFIG") { candidates.push(PathBuf::from(p)); }
    candidates.push(PathBuf::from("./config/rust.yaml"));
    candidates.push(PathBuf::from("./config.yaml"));
    if let Some(mut d) = dirs::config_dir() {
        d.push("weather-summary/config.yaml");
        candidates.push(d);
    }

    for path in candidates {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            let s = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            return parse_file_config(&s)
                .with_context(|| format!("parsing YAML in {}", path.display()));
        }
    }
    tracing::debug!("no config file found, using defaults");
    Ok(FileConfig::default())
}

pub fn parse_file_config(s: &str) -> Result<FileConfig> {
    Ok(serde_yaml::from_str(s)?)
}

/* ============================ Resolved config ============================ */

/// Everything the summarizer needs, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub city: String,
    pub units: String,
    pub lang: String,
    pub base_url: String,
    pub onecall_path: String,
}

impl Config {
    /// Merges the file config with the environment key and the CLI city.
    /// The environment key wins over the file key. The key may still be
    /// empty here; the summarizer rejects that before any request.
    pub fn resolve(file: FileConfig, env_key: Option<String>, city: Option<String>) -> Self {
        let api_key = env_key
            .filter(|k| !k.trim().is_empty())
            .or(file.openweather.api_key)
            .unwrap_or_default()
            .trim()
            .to_string();

        Config {
            api_key,
            city: city.unwrap_or(file.app.city),
            units: file.openweather.units.to_lowercase(),
            lang: file.openweather.lang.to_lowercase(),
            base_url: file.openweather.base_url.trim_end_matches('/').to_string(),
            onecall_path: file.openweather.onecall_path,
        }
    }
}
