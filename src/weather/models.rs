use serde::{Deserialize, Serialize, Serializer};

/// Weather condition group as reported by the upstream `weather[].main` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    /// Any group without a dedicated theme (Drizzle, Haze, Dust, ...)
    Other(String),
}

impl Condition {
    pub fn from_main(main: &str) -> Self {
        match main.trim() {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Thunderstorm" => Condition::Thunderstorm,
            "Snow" => Condition::Snow,
            "Mist" => Condition::Mist,
            other => Condition::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snow => "Snow",
            Condition::Mist => "Mist",
            Condition::Other(name) => name,
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one city. Replaced wholesale on every successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// Canonical city name as returned upstream
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub condition: Condition,
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent, 0-100
    pub humidity: u8,
    /// Metres per second
    pub wind_speed: f64,
    pub utc_offset_seconds: i32,
    pub sunrise: i64,
    pub sunset: i64,
    pub description: String,
    pub icon: String,
}
