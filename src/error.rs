use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("no OpenWeather API key: set WEATHER_API_KEY or openweather.api_key")]
    MissingApiKey,

    #[error("OpenWeather request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The one-call endpoint returned fewer daily entries than we summarize.
    #[error("one-call response has {got} daily entries, expected at least {want}")]
    ShortDaily { got: usize, want: usize },

    #[error("forecast has no night boundary to compare against")]
    NoSegments,

    #[error("no daily sunrise/sunset data")]
    NoDaylight,

    #[error("timestamp {0} is out of range")]
    Timestamp(i64),
}
