//! Weather impact classification
//!
//! Reduces a forecast window to average temperature and total precipitation,
//! then applies a per-crop rule table. Crops without a table classify as
//! uncertain.

use crate::types::{WeatherAnalysis, WeatherDay, WeatherImpact};

/// One negative-impact condition for a crop
struct StressRule {
    applies: fn(avg_temp: f64, total_precip: f64) -> bool,
    explanation: &'static str,
}

/// Per-crop classification table: ordered stress rules plus the explanation
/// used when none of them fire
struct CropProfile {
    crop: &'static str,
    rules: &'static [StressRule],
    favorable: &'static str,
}

static PROFILES: &[CropProfile] = &[
    CropProfile {
        crop: "wheat",
        rules: &[
            StressRule {
                applies: |t, p| t > 25.0 && p < 10.0,
                explanation: "High temperatures and low precipitation may stress wheat crops.",
            },
            StressRule {
                applies: |t, p| t < 15.0 && p > 30.0,
                explanation: "Low temperatures and excessive rainfall may damage wheat crops.",
            },
        ],
        favorable: "Weather conditions appear favorable for wheat crops.",
    },
    CropProfile {
        crop: "corn",
        rules: &[
            StressRule {
                applies: |t, p| t < 18.0 || p < 15.0,
                explanation: "Low temperatures or insufficient rainfall may reduce corn yields.",
            },
            StressRule {
                applies: |t, p| t > 30.0 && p < 20.0,
                explanation: "High heat and insufficient moisture may stress corn crops.",
            },
        ],
        favorable: "Weather conditions appear favorable for corn growth.",
    },
    CropProfile {
        crop: "soybeans",
        rules: &[
            StressRule {
                applies: |t, p| t < 20.0 || p < 10.0,
                explanation: "Low temperatures or dry conditions may reduce soybean yields.",
            },
            StressRule {
                applies: |_, p| p > 40.0,
                explanation: "Excessive rainfall may lead to disease pressure in soybeans.",
            },
        ],
        favorable: "Weather conditions appear favorable for soybean development.",
    },
];

/// Classify forecast impact for `crop`. Returns `None` on an empty forecast.
pub fn analyze(forecast: &[WeatherDay], crop: &str, region: &str) -> Option<WeatherAnalysis> {
    if forecast.is_empty() {
        return None;
    }

    let average_temperature =
        forecast.iter().map(|d| d.temperature).sum::<f64>() / forecast.len() as f64;
    let total_precipitation = forecast.iter().map(|d| d.precipitation).sum::<f64>();

    let (weather_impact, explanation) = classify(crop, average_temperature, total_precipitation);

    Some(WeatherAnalysis {
        crop: crop.to_string(),
        region: region.to_string(),
        average_temperature,
        total_precipitation,
        weather_impact,
        explanation,
    })
}

/// Total over its inputs: every (crop, avg_temp, total_precip) triple maps to
/// exactly one verdict
pub fn classify(crop: &str, avg_temp: f64, total_precip: f64) -> (WeatherImpact, String) {
    let Some(profile) = PROFILES.iter().find(|p| p.crop == crop) else {
        return (
            WeatherImpact::Uncertain,
            format!("Weather impact analysis not specifically calibrated for {crop}."),
        );
    };

    for rule in profile.rules {
        if (rule.applies)(avg_temp, total_precip) {
            return (WeatherImpact::Negative, rule.explanation.to_string());
        }
    }
    (
        WeatherImpact::NeutralToPositive,
        profile.favorable.to_string(),
    )
}
