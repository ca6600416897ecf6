use serde::{Deserialize, Serialize};

/// A single weather observation for a city.
///
/// `city` acts as the natural key when searching a collection. The same field
/// names are used by the XML submission payload and the JSON retrieval payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub condition: String,
}

impl WeatherReport {
    pub fn new(city: impl Into<String>, temperature: f64, condition: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            temperature,
            condition: condition.into(),
        }
    }
}
