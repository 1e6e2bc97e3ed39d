use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public base for the Visual Crossing SVG icon set.
pub const DEFAULT_ICON_BASE_URL: &str =
    "https://raw.githubusercontent.com/visualcrossing/WeatherIcons/main/SVG/1st%20Set%20-%20Color";

/// Current conditions for one resolved location, taken from a single response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub conditions: String,
    pub icon: String,
    pub wind_speed_kph: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherResult {
    /// URL of the SVG asset for this result's icon identifier.
    pub fn icon_url(&self, icon_base_url: &str) -> String {
        icon_url(icon_base_url, &self.icon)
    }
}

pub fn icon_url(icon_base_url: &str, icon: &str) -> String {
    format!("{}/{}.svg", icon_base_url.trim_end_matches('/'), icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherResult {
        WeatherResult {
            location: "Paris, Île-de-France, France".into(),
            temperature_c: 14.2,
            humidity_pct: 71.0,
            conditions: "Partially cloudy".into(),
            icon: "partly-cloudy-day".into(),
            wind_speed_kph: 11.5,
            observed_at: None,
        }
    }

    #[test]
    fn icon_url_uses_default_asset_base() {
        assert_eq!(
            sample().icon_url(DEFAULT_ICON_BASE_URL),
            "https://raw.githubusercontent.com/visualcrossing/WeatherIcons/main/SVG/1st%20Set%20-%20Color/partly-cloudy-day.svg"
        );
    }

    #[test]
    fn icon_url_tolerates_trailing_slash() {
        assert_eq!(icon_url("http://localhost/icons/", "rain"), "http://localhost/icons/rain.svg");
    }
}
