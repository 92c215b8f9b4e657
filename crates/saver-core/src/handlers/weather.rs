//! Weather replies.
//!
//! There is no forecast source behind this handler: condition and
//! temperature are picked at random.

use rand::Rng;
use saver_models::{WeatherDay, WeatherRequest};

const CONDITIONS: [(&str, &str); 6] = [
    ("آفتابی", "☀️"),
    ("ابری", "☁️"),
    ("بارانی", "🌧️"),
    ("طوفانی", "⛈️"),
    ("برفی", "❄️"),
    ("مه‌آلود", "🌫️"),
];

const TEMPERATURES: [i32; 7] = [15, 20, 25, 30, 35, 10, 5];

fn day_label(day: WeatherDay) -> &'static str {
    match day {
        WeatherDay::Today => "امروز",
        WeatherDay::Tomorrow => "فردا",
        WeatherDay::Week => "هفته",
    }
}

/// Produces a weather reply for the request.
pub fn handle_weather<R: Rng + ?Sized>(request: &WeatherRequest, rng: &mut R) -> String {
    let (condition, emoji) = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
    let temperature = TEMPERATURES[rng.random_range(0..TEMPERATURES.len())];
    let location = request.location.trim();
    let subject = if location.is_empty() {
        day_label(request.date).to_string()
    } else {
        format!("{} {}", location, day_label(request.date))
    };

    format!(
        "{} آب و هوای {}:\n\n🌡️ دما: {}°C\n🌤️ وضعیت: {}",
        emoji, subject, temperature, condition
    )
}
