use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::air_quality::{default_levels, AqiLevel};
use crate::calendar::Locale;
use crate::theme::ThemeConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    #[serde(default = "default_openweathermap_base_url")]
    pub openweathermap_base_url: String,

    #[serde(default = "default_prayer_times_base_url")]
    pub prayer_times_base_url: String,

    /// Temperature units: metric, imperial, or standard
    #[serde(default = "default_units")]
    pub units: String,

    /// Advisory daily OpenWeatherMap call budget
    #[serde(default = "default_daily_call_budget")]
    pub daily_call_budget: u32,

    /// Upper bound for each optional lookup (air quality, prayer times, forecast)
    #[serde(default = "default_secondary_timeout_secs")]
    pub secondary_timeout_secs: u64,

    #[serde(default)]
    pub slideshow: SlideshowConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub air_quality: AirQualityConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SlideshowConfig {
    /// Milliseconds between background changes while no city is shown
    #[serde(default = "default_slide_interval_ms")]
    pub interval_ms: u64,

    /// Background identifiers, shown in order
    #[serde(default = "default_slides")]
    pub slides: Vec<String>,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_slide_interval_ms(),
            slides: default_slides(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClockConfig {
    /// First local hour counted as day
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,

    /// First local hour counted as night
    #[serde(default = "default_night_start_hour")]
    pub night_start_hour: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            night_start_hour: default_night_start_hour(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    /// Playback volume, 0.0 to 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Suffix of the upstream time label that marks the daily sample
    #[serde(default = "default_midday_marker")]
    pub midday_marker: String,

    #[serde(default = "default_max_days")]
    pub max_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            midday_marker: default_midday_marker(),
            max_days: default_max_days(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CalendarConfig {
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AirQualityConfig {
    #[serde(default = "default_levels")]
    pub levels: Vec<AqiLevel>,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_openweathermap_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_prayer_times_base_url() -> String {
    "https://api.aladhan.com".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_daily_call_budget() -> u32 {
    1000
}

fn default_secondary_timeout_secs() -> u64 {
    8
}

fn default_slide_interval_ms() -> u64 {
    3000
}

fn default_slides() -> Vec<String> {
    ["mountain-dawn", "ocean-horizon", "forest-path", "city-lights"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_day_start_hour() -> u32 {
    6
}

fn default_night_start_hour() -> u32 {
    19
}

fn default_volume() -> f32 {
    0.5
}

fn default_midday_marker() -> String {
    "12:00:00".to_string()
}

fn default_max_days() -> usize {
    5
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("units", default_units())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with WEATHERMOOD_)
            // Nested keys use a double underscore: WEATHERMOOD_CLOCK__NIGHT_START_HOUR
            .add_source(
                Environment::with_prefix("WEATHERMOOD")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let clock = &self.clock;
        if clock.night_start_hour > 24 || clock.day_start_hour >= clock.night_start_hour {
            return Err(ConfigError::Message(format!(
                "clock: expected day_start_hour < night_start_hour <= 24, got {} and {}",
                clock.day_start_hour, clock.night_start_hour
            )));
        }

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::Message(format!(
                "audio.volume must be between 0.0 and 1.0, got {}",
                self.audio.volume
            )));
        }

        if self.slideshow.slides.is_empty() {
            return Err(ConfigError::Message(
                "slideshow.slides must name at least one background".to_string(),
            ));
        }

        if self.slideshow.interval_ms == 0 {
            return Err(ConfigError::Message(
                "slideshow.interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.forecast.max_days == 0 {
            return Err(ConfigError::Message(
                "forecast.max_days must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        host: default_host(),
        port: default_port(),
        openweathermap_api_key: "test_api_key".to_string(),
        openweathermap_base_url: default_openweathermap_base_url(),
        prayer_times_base_url: default_prayer_times_base_url(),
        units: default_units(),
        daily_call_budget: default_daily_call_budget(),
        secondary_timeout_secs: default_secondary_timeout_secs(),
        slideshow: SlideshowConfig::default(),
        clock: ClockConfig::default(),
        audio: AudioConfig::default(),
        forecast: ForecastConfig::default(),
        calendar: CalendarConfig::default(),
        air_quality: AirQualityConfig::default(),
        theme: ThemeConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.slideshow.interval_ms, 3000);
        assert_eq!(config.clock.day_start_hour, 6);
        assert_eq!(config.clock.night_start_hour, 19);
        assert_eq!(config.forecast.midday_marker, "12:00:00");
        assert_eq!(config.forecast.max_days, 5);
        assert_eq!(config.air_quality.levels.len(), 5);
    }

    #[test]
    fn test_inverted_night_boundaries_rejected() {
        let mut config = test_config();
        config.clock.day_start_hour = 20;
        config.clock.night_start_hour = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        let mut config = test_config();
        config.audio.volume = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = test_config();
        config.slideshow.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_slides_rejected() {
        let mut config = test_config();
        config.slideshow.slides.clear();
        assert!(config.validate().is_err());
    }

    fn calendar_locale(toml: &str) -> Locale {
        let config = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let config: CalendarConfig = config.try_deserialize().unwrap();
        config.locale
    }

    #[test]
    fn test_locale_tags_fall_back_instead_of_failing() {
        assert_eq!(calendar_locale(r#"locale = "fa-IR""#), Locale::Fa);
        assert_eq!(calendar_locale(r#"locale = "de""#), Locale::En);
        assert_eq!(calendar_locale(r#"locale = "FA""#), Locale::Fa);
        assert_eq!(calendar_locale(""), Locale::En);
    }

    #[test]
    fn test_sections_deserialize_from_toml_source() {
        let config = Config::builder()
            .add_source(File::from_str(
                r#"
                openweathermap_api_key = "abc"

                [clock]
                night_start_hour = 20

                [slideshow]
                slides = ["one", "two"]

                [calendar]
                locale = "fa"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(config.clock.night_start_hour, 20);
        assert_eq!(config.clock.day_start_hour, 6);
        assert_eq!(config.slideshow.slides, vec!["one", "two"]);
        assert_eq!(config.slideshow.interval_ms, 3000);
        assert_eq!(config.calendar.locale, Locale::Fa);
        assert_eq!(config.theme.conditions.len(), 6);
    }
}
