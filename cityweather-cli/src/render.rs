use chrono::Local;
use cityweather_core::{DisplayState, WeatherResult};
use serde_json::json;

/// Text for the result or error panel. Empty before the first submission.
pub fn panel(display: &DisplayState, icon_base_url: &str) -> String {
    match display {
        DisplayState::Empty => String::new(),
        DisplayState::Error(err) => format!("✗ {err}"),
        DisplayState::Weather(result) => weather_panel(result, icon_base_url),
    }
}

/// Machine-readable form of the display: the result, or the error kind and message.
pub fn as_json(display: &DisplayState) -> serde_json::Result<String> {
    let value = match display {
        DisplayState::Empty => serde_json::Value::Null,
        DisplayState::Weather(result) => serde_json::to_value(result)?,
        DisplayState::Error(err) => json!({
            "error": err.kind().as_str(),
            "message": err.to_string(),
        }),
    };

    serde_json::to_string_pretty(&value)
}

fn weather_panel(w: &WeatherResult, icon_base_url: &str) -> String {
    let mut lines = vec![
        w.location.clone(),
        format!("  {}  {}°C  {}", glyph(&w.icon), w.temperature_c, w.conditions),
        String::new(),
        format!("  {:<12}{}°C", "Temperature", w.temperature_c),
        format!("  {:<12}{}%", "Humidity", w.humidity_pct),
        format!("  {:<12}{} km/h", "Wind", w.wind_speed_kph),
    ];

    if let Some(at) = w.observed_at {
        let local = at.with_timezone(&Local);
        lines.push(format!("  {:<12}{}", "Observed", local.format("%Y-%m-%d %H:%M")));
    }

    lines.push(format!("  {:<12}{}", "Icon", w.icon_url(icon_base_url)));

    lines.join("\n")
}

/// Terminal stand-in for the Visual Crossing icon set.
fn glyph(icon: &str) -> &'static str {
    match icon {
        "clear-day" => "☀",
        "clear-night" => "☾",
        "partly-cloudy-day" => "⛅",
        "partly-cloudy-night" | "cloudy" => "☁",
        "rain" | "showers-day" | "showers-night" => "☂",
        "thunder-rain" | "thunder-showers-day" | "thunder-showers-night" => "⚡",
        "snow" | "snow-showers-day" | "snow-showers-night" => "❄",
        "fog" => "≋",
        "wind" => "≈",
        _ => "·",
    }
}
