use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::weather::Condition;

/// Visual and audio attributes shown for a (condition, time of day) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub background: String,
    pub icon: String,
    pub quote: String,
    /// Audio cue identifier; empty means silence
    #[serde(default)]
    pub sound: String,
}

impl ThemeDescriptor {
    fn new(background: &str, icon: &str, quote: &str, sound: &str) -> Self {
        Self {
            background: background.to_string(),
            icon: icon.to_string(),
            quote: quote.to_string(),
            sound: sound.to_string(),
        }
    }
}

/// Theme table as loaded from configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeConfig {
    /// Keyed by condition group name, matched case-insensitively
    #[serde(default = "default_conditions")]
    pub conditions: IndexMap<String, ThemeDescriptor>,

    /// Replaces the Clear entry at night
    #[serde(default = "default_clear_night")]
    pub clear_night: ThemeDescriptor,

    /// Used for any condition without an entry
    #[serde(default = "default_fallback")]
    pub fallback: ThemeDescriptor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            conditions: default_conditions(),
            clear_night: default_clear_night(),
            fallback: default_fallback(),
        }
    }
}

fn default_conditions() -> IndexMap<String, ThemeDescriptor> {
    [
        (
            "clear",
            ThemeDescriptor::new(
                "sunny-meadow",
                "sun",
                "Keep your face to the sunshine and you cannot see a shadow.",
                "birdsong",
            ),
        ),
        (
            "clouds",
            ThemeDescriptor::new(
                "overcast-sky",
                "cloud",
                "Clouds come floating into my life to add color to my sunset sky.",
                "soft-wind",
            ),
        ),
        (
            "rain",
            ThemeDescriptor::new(
                "rainy-window",
                "cloud-rain",
                "Let the rain kiss you.",
                "rainfall",
            ),
        ),
        (
            "thunderstorm",
            ThemeDescriptor::new(
                "lightning-storm",
                "cloud-lightning",
                "Storms make trees take deeper roots.",
                "thunder",
            ),
        ),
        (
            "snow",
            ThemeDescriptor::new(
                "snowy-forest",
                "snowflake",
                "Snowflakes are kisses from heaven.",
                "winter-wind",
            ),
        ),
        (
            "mist",
            ThemeDescriptor::new(
                "misty-lake",
                "fog",
                "In the mist, every path looks like a mystery.",
                "calm-ambient",
            ),
        ),
    ]
    .into_iter()
    .map(|(name, descriptor)| (name.to_string(), descriptor))
    .collect()
}

fn default_clear_night() -> ThemeDescriptor {
    ThemeDescriptor::new(
        "starry-night",
        "moon",
        "The night is more alive and more richly colored than the day.",
        "night-crickets",
    )
}

fn default_fallback() -> ThemeDescriptor {
    ThemeDescriptor::new(
        "default-gradient",
        "thermometer",
        "Whatever the weather, make it a good day.",
        "",
    )
}

/// Pure lookup from (condition, is_night) to a theme.
///
/// Night only changes the Clear entry; every other condition keeps its
/// daytime descriptor after dark.
#[derive(Debug, Clone)]
pub struct ThemeResolver {
    conditions: IndexMap<String, ThemeDescriptor>,
    clear_night: ThemeDescriptor,
    fallback: ThemeDescriptor,
}

impl ThemeResolver {
    pub fn new(config: &ThemeConfig) -> Self {
        let conditions = config
            .conditions
            .iter()
            .map(|(name, descriptor)| (name.to_ascii_lowercase(), descriptor.clone()))
            .collect();

        Self {
            conditions,
            clear_night: config.clear_night.clone(),
            fallback: config.fallback.clone(),
        }
    }

    pub fn resolve(&self, condition: &Condition, is_night: bool) -> ThemeDescriptor {
        if is_night && *condition == Condition::Clear {
            return self.clear_night.clone();
        }

        self.conditions
            .get(&condition.as_str().to_ascii_lowercase())
            .unwrap_or(&self.fallback)
            .clone()
    }
}

impl Default for ThemeResolver {
    fn default() -> Self {
        Self::new(&ThemeConfig::default())
    }
}
