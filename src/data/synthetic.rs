//! Synthetic dataset generation
//!
//! Stands in for real agricultural data APIs. Prices get a linear trend,
//! two seasonal cycles and gaussian noise; news and weather are sampled
//! from fixed pools.

use crate::types::{NewsItem, PricePoint, Sentiment, WeatherDay};
use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Two years of daily history
const PRICE_HISTORY_DAYS: i64 = 730;

/// Forecast horizon in days
const FORECAST_DAYS: i64 = 14;

const WEATHER_CONDITIONS: &[&str] = &["sunny", "cloudy", "rainy", "partly cloudy"];

fn base_price(crop: &str) -> f64 {
    match crop {
        "wheat" => 500.0,
        "corn" => 400.0,
        _ => 600.0,
    }
}

/// Daily price series ending at `end` (inclusive)
pub fn historical_prices<R: Rng>(crop: &str, end: NaiveDate, rng: &mut R) -> Vec<PricePoint> {
    let n = PRICE_HISTORY_DAYS + 1;
    let base = base_price(crop);

    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let trend = 100.0 * t;
            let seasonality = 50.0 * (4.0 * std::f64::consts::PI * t).sin();
            let noise = gaussian(rng, 0.0, 20.0);
            PricePoint {
                date: end - Duration::days(PRICE_HISTORY_DAYS - i),
                crop: crop.to_string(),
                price: base + trend + seasonality + noise,
            }
        })
        .collect()
}

/// Zero to two headlines per day over the trailing `days` window
pub fn market_news<R: Rng>(crop: &str, end: NaiveDate, days: i64, rng: &mut R) -> Vec<NewsItem> {
    let capitalized = capitalize(crop);
    let samples: [(String, Sentiment); 6] = [
        (
            format!("Global demand for {crop} increases amid supply concerns"),
            Sentiment::Positive,
        ),
        (
            format!("New trade deal may boost {crop} exports"),
            Sentiment::Positive,
        ),
        (
            format!("Weather conditions threaten {crop} yield in major producing regions"),
            Sentiment::Negative,
        ),
        (
            format!("{capitalized} prices stabilize after recent volatility"),
            Sentiment::Neutral,
        ),
        (
            format!("Report shows increased {crop} stockpiles"),
            Sentiment::Negative,
        ),
        (
            format!("Analysts predict strong {crop} market for next quarter"),
            Sentiment::Positive,
        ),
    ];

    let mut items = Vec::new();
    for offset in 0..=days {
        let date = end - Duration::days(days - offset);
        let daily_count = rng.random_range(0..=2);
        for _ in 0..daily_count {
            let (headline, sentiment) = &samples[rng.random_range(0..samples.len())];
            items.push(NewsItem {
                date,
                crop: crop.to_string(),
                headline: headline.clone(),
                sentiment: *sentiment,
            });
        }
    }
    items
}

/// Forecast for the next two weeks starting at `start`
pub fn weather_forecast<R: Rng>(region: &str, start: NaiveDate, rng: &mut R) -> Vec<WeatherDay> {
    (0..=FORECAST_DAYS)
        .map(|offset| WeatherDay {
            date: start + Duration::days(offset),
            region: region.to_string(),
            temperature: rng.random_range(15.0..30.0),
            precipitation: rng.random_range(0.0..20.0),
            conditions: WEATHER_CONDITIONS[rng.random_range(0..WEATHER_CONDITIONS.len())]
                .to_string(),
        })
        .collect()
}

/// Box-Muller transform
fn gaussian<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
