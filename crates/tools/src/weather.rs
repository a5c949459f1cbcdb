//! Weather lookup via Open-Meteo
//!
//! Maps WMO condition codes into a condition word and a child-friendly
//! description. Unknown locations fall back to the configured default.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use plushpal_config::WeatherSettings;

use crate::ToolError;

/// Known location coordinates
static LOCATIONS: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("stockholm", (59.3293, 18.0686));
    map.insert("gothenburg", (57.7089, 11.9746));
    map.insert("malmo", (55.6050, 13.0038));
    map
});

/// Current conditions for a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature_celsius: f64,
    pub condition: String,
    /// Child-friendly description of the conditions
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

pub struct WeatherClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
    default_location: String,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings) -> Result<Self, ToolError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ToolError::Weather(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            default_location: settings.default_location.clone(),
        })
    }

    /// Fetch current conditions for a location name
    pub async fn get_weather(&self, location: &str) -> Result<WeatherReport, ToolError> {
        let location_lower = location.to_lowercase();
        let (name, (lat, lon)) = match LOCATIONS.get_key_value(location_lower.as_str()) {
            Some((name, coords)) => (*name, *coords),
            None => {
                tracing::debug!(requested = location, "unknown location, using default");
                let default = self.default_location.to_lowercase();
                match LOCATIONS.get_key_value(default.as_str()) {
                    Some((name, coords)) => (*name, *coords),
                    None => ("stockholm", (59.3293, 18.0686)),
                }
            }
        };

        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", "temperature_2m,weather_code".to_string()),
                ("timezone", "Europe/Stockholm".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Weather(format!("HTTP {}: {}", status, body)));
        }

        let payload: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Weather(format!("invalid response: {}", e)))?;

        let temperature = payload.current.temperature_2m;
        let code = payload.current.weather_code;

        Ok(WeatherReport {
            location: titlecase(name),
            temperature_celsius: temperature,
            condition: condition_word(code).to_string(),
            description: child_friendly_description(temperature, code),
            timestamp: Utc::now(),
        })
    }
}

fn titlecase(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Condition word for a WMO weather code
fn condition_word(code: u32) -> &'static str {
    match code {
        0 => "sunny",
        1..=3 => "cloudy",
        51 | 53 | 55 | 61 | 63 | 65 | 80 | 81 | 82 => "rainy",
        71 | 73 | 75 | 77 => "snowy",
        _ => "variable",
    }
}

/// Child-friendly description: condition sentence plus a temperature clause
fn child_friendly_description(temperature: f64, code: u32) -> String {
    let mut desc = match code {
        0 => "It's bright and sunny outside! Perfect for playing!",
        1 | 2 => "There are some fluffy clouds in the sky today!",
        3 => "The sky is covered with soft, gray clouds!",
        45 | 48 => "It's foggy outside, like walking through a cloud!",
        51 | 53 | 55 | 61 | 63 | 65 => "It's raining! Don't forget your umbrella and rain boots!",
        71 | 73 | 75 | 77 => "It's snowing! Time to build a snowman!",
        80 | 81 | 82 => "There are rain showers today!",
        95 | 96 | 99 => "There's a thunderstorm! Let's stay inside and be cozy!",
        _ => "The weather is changing today!",
    }
    .to_string();

    desc.push(' ');
    desc.push_str(if temperature < 0.0 {
        "It's very cold, so bundle up warm!"
    } else if temperature < 10.0 {
        "It's chilly, wear a jacket!"
    } else if temperature < 20.0 {
        "It's nice and cool outside!"
    } else if temperature < 25.0 {
        "It's warm and pleasant!"
    } else {
        "It's hot! Stay cool and drink water!"
    });

    desc
}

// Open-Meteo API types

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    weather_code: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_word_mapping() {
        assert_eq!(condition_word(0), "sunny");
        assert_eq!(condition_word(2), "cloudy");
        assert_eq!(condition_word(63), "rainy");
        assert_eq!(condition_word(75), "snowy");
        assert_eq!(condition_word(95), "variable");
    }

    #[test]
    fn description_includes_temperature_clause() {
        let freezing = child_friendly_description(-5.0, 71);
        assert!(freezing.contains("snowman"));
        assert!(freezing.contains("bundle up"));

        let hot = child_friendly_description(28.0, 0);
        assert!(hot.contains("sunny"));
        assert!(hot.contains("drink water"));
    }

    #[test]
    fn known_locations_have_coordinates() {
        assert!(LOCATIONS.contains_key("stockholm"));
        assert!(LOCATIONS.contains_key("gothenburg"));
        assert!(LOCATIONS.contains_key("malmo"));
    }

    #[test]
    fn forecast_response_parsing() {
        let json = r#"{"current": {"temperature_2m": 14.2, "weather_code": 61, "time": "2026-01-01T10:00"}}"#;
        let parsed: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.current.weather_code, 61);
    }

    #[test]
    fn titlecase_location() {
        assert_eq!(titlecase("stockholm"), "Stockholm");
    }
}
