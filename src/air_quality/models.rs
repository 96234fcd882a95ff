use serde::{Deserialize, Serialize};

// ============================================================================
// Air pollution API response (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AirPollutionResponse {
    pub list: Vec<AirPollutionItem>,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionItem {
    pub main: AirPollutionMain,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionMain {
    pub aqi: u8,
}

// ============================================================================
// Descriptor table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Severe,
}

/// One row of the configurable AQI descriptor table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiLevel {
    pub index: u8,
    pub label: String,
    pub severity: Severity,
}

/// Resolved air quality badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQuality {
    /// 1 (best) to 5 (worst)
    pub index: u8,
    pub label: String,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub struct AqiTable {
    levels: Vec<AqiLevel>,
}

impl AqiTable {
    pub fn new(levels: Vec<AqiLevel>) -> Self {
        Self { levels }
    }

    /// Look up a category; indices absent from the table yield `None`
    pub fn describe(&self, index: u8) -> Option<AirQuality> {
        self.levels
            .iter()
            .find(|level| level.index == index)
            .map(|level| AirQuality {
                index,
                label: level.label.clone(),
                severity: level.severity,
            })
    }
}

impl Default for AqiTable {
    fn default() -> Self {
        Self::new(default_levels())
    }
}

pub fn default_levels() -> Vec<AqiLevel> {
    [
        (1, "Good", Severity::Low),
        (2, "Fair", Severity::Low),
        (3, "Moderate", Severity::Moderate),
        (4, "Poor", Severity::High),
        (5, "Very Poor", Severity::Severe),
    ]
    .into_iter()
    .map(|(index, label, severity)| AqiLevel {
        index,
        label: label.to_string(),
        severity,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_one_to_five() {
        let table = AqiTable::default();
        for index in 1..=5 {
            assert!(table.describe(index).is_some(), "index {index}");
        }
        assert_eq!(table.describe(1).unwrap().label, "Good");
        assert_eq!(table.describe(5).unwrap().severity, Severity::Severe);
    }

    #[test]
    fn test_unknown_index_is_none() {
        let table = AqiTable::default();
        assert!(table.describe(0).is_none());
        assert!(table.describe(6).is_none());
    }

    #[test]
    fn test_severity_deserializes_from_config_names() {
        let level: AqiLevel =
            serde_json::from_str(r#"{"index": 3, "label": "Meh", "severity": "moderate"}"#)
                .unwrap();
        assert_eq!(level.severity, Severity::Moderate);
    }
}
