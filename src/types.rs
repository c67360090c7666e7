//! Core data types shared across the advisor
//!
//! Raw market records (prices, news, weather) plus the derived analysis
//! records that feed the advisory prompt.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily price observation for a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub crop: String,
    pub price: f64,
}

/// Sentiment label attached to a news item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// A dated market news headline for a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub date: NaiveDate,
    pub crop: String,
    pub headline: String,
    pub sentiment: Sentiment,
}

/// One forecast day for a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub region: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Precipitation in millimeters
    pub precipitation: f64,
    pub conditions: String,
}

/// Coarse analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Timeframe {
    OneWeek,
    OneMonth,
    ThreeMonths,
}

impl Timeframe {
    /// Window length in days
    pub fn days(&self) -> i64 {
        match self {
            Timeframe::OneWeek => 7,
            Timeframe::OneMonth => 30,
            Timeframe::ThreeMonths => 90,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneWeek => "1 week",
            Timeframe::OneMonth => "1 month",
            Timeframe::ThreeMonths => "3 months",
        }
    }

    /// Parse a timeframe label. Unrecognized labels fall back to one month.
    pub fn parse(label: &str) -> Self {
        match label {
            "1 week" => Timeframe::OneWeek,
            "3 months" => Timeframe::ThreeMonths,
            _ => Timeframe::OneMonth,
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::OneMonth
    }
}

impl From<String> for Timeframe {
    fn from(s: String) -> Self {
        Timeframe::parse(&s)
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative price direction bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "strongly increasing")]
    StronglyIncreasing,
    #[serde(rename = "slightly increasing")]
    SlightlyIncreasing,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "slightly decreasing")]
    SlightlyDecreasing,
    #[serde(rename = "strongly decreasing")]
    StronglyDecreasing,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::StronglyIncreasing => "strongly increasing",
            Trend::SlightlyIncreasing => "slightly increasing",
            Trend::Stable => "stable",
            Trend::SlightlyDecreasing => "slightly decreasing",
            Trend::StronglyDecreasing => "strongly decreasing",
        };
        f.write_str(s)
    }
}

/// Net news sentiment bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentTrend {
    #[serde(rename = "strongly positive")]
    StronglyPositive,
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "strongly negative")]
    StronglyNegative,
}

impl fmt::Display for SentimentTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentTrend::StronglyPositive => "strongly positive",
            SentimentTrend::Positive => "positive",
            SentimentTrend::Neutral => "neutral",
            SentimentTrend::Negative => "negative",
            SentimentTrend::StronglyNegative => "strongly negative",
        };
        f.write_str(s)
    }
}

/// Forecast impact verdict for a crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherImpact {
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "neutral to positive")]
    NeutralToPositive,
    #[serde(rename = "uncertain")]
    Uncertain,
}

impl fmt::Display for WeatherImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherImpact::Negative => "negative",
            WeatherImpact::NeutralToPositive => "neutral to positive",
            WeatherImpact::Uncertain => "uncertain",
        };
        f.write_str(s)
    }
}

/// Price trend metrics over one crop + timeframe window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalysis {
    pub crop: String,
    pub timeframe: Timeframe,
    pub current_price: f64,
    pub average_price: f64,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub trend: Trend,
    pub volatility: f64,
    pub projected_price: f64,
    pub projection_pct: f64,
}

/// Aggregated news sentiment for a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub crop: String,
    /// Net sentiment in [-1, 1]
    pub sentiment_score: f64,
    pub sentiment_trend: SentimentTrend,
    pub positive_news_count: usize,
    pub negative_news_count: usize,
    pub neutral_news_count: usize,
    pub headlines: Vec<String>,
}

/// Forecast aggregates and impact verdict for a crop + region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAnalysis {
    pub crop: String,
    pub region: String,
    pub average_temperature: f64,
    pub total_precipitation: f64,
    pub weather_impact: WeatherImpact,
    pub explanation: String,
}

/// Combined output of the three analyzers
///
/// Absent sections mean the underlying dataset was empty for that key;
/// consumers must treat them as unknown rather than fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    pub crop: String,
    pub timeframe: Timeframe,
    pub price_analysis: Option<PriceAnalysis>,
    pub sentiment_analysis: Option<SentimentAnalysis>,
    pub weather_analysis: Option<WeatherAnalysis>,
    pub analysis_date: NaiveDate,
}

/// Fixed key figures attached to an advisory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub current_price: Option<f64>,
    pub price_trend: Option<Trend>,
    pub projected_price_change: Option<f64>,
    pub market_sentiment: Option<SentimentTrend>,
    pub weather_impact: Option<WeatherImpact>,
}

impl DataSummary {
    pub fn from_analysis(analysis: &ComprehensiveAnalysis) -> Self {
        Self {
            current_price: analysis.price_analysis.as_ref().map(|p| p.current_price),
            price_trend: analysis.price_analysis.as_ref().map(|p| p.trend),
            projected_price_change: analysis.price_analysis.as_ref().map(|p| p.projection_pct),
            market_sentiment: analysis.sentiment_analysis.as_ref().map(|s| s.sentiment_trend),
            weather_impact: analysis.weather_analysis.as_ref().map(|w| w.weather_impact),
        }
    }
}

/// Final advisory returned to the caller and persisted in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub query: String,
    pub crop: String,
    pub advice: String,
    /// Omitted when the model call failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_summary: Option<DataSummary>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::parse("1 week"), Timeframe::OneWeek);
        assert_eq!(Timeframe::parse("1 month"), Timeframe::OneMonth);
        assert_eq!(Timeframe::parse("3 months"), Timeframe::ThreeMonths);
        // Unknown labels default to one month
        assert_eq!(Timeframe::parse("fortnight"), Timeframe::OneMonth);
        assert_eq!(Timeframe::parse(""), Timeframe::OneMonth);
    }

    #[test]
    fn test_timeframe_days() {
        assert_eq!(Timeframe::OneWeek.days(), 7);
        assert_eq!(Timeframe::OneMonth.days(), 30);
        assert_eq!(Timeframe::ThreeMonths.days(), 90);
    }

    #[test]
    fn test_trend_serde_labels() {
        let json = serde_json::to_string(&Trend::StronglyIncreasing).unwrap();
        assert_eq!(json, "\"strongly increasing\"");
        let back: Trend = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Trend::StronglyIncreasing);
    }

    #[test]
    fn test_weather_impact_labels() {
        assert_eq!(WeatherImpact::NeutralToPositive.to_string(), "neutral to positive");
        let json = serde_json::to_string(&WeatherImpact::Uncertain).unwrap();
        assert_eq!(json, "\"uncertain\"");
    }

    #[test]
    fn test_sentiment_lowercase() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(back, Sentiment::Neutral);
    }

    #[test]
    fn test_data_summary_from_partial_analysis() {
        let analysis = ComprehensiveAnalysis {
            crop: "rice".to_string(),
            timeframe: Timeframe::OneMonth,
            price_analysis: None,
            sentiment_analysis: None,
            weather_analysis: Some(WeatherAnalysis {
                crop: "rice".to_string(),
                region: "midwest".to_string(),
                average_temperature: 22.0,
                total_precipitation: 15.0,
                weather_impact: WeatherImpact::Uncertain,
                explanation: "not calibrated".to_string(),
            }),
            analysis_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        };

        let summary = DataSummary::from_analysis(&analysis);
        assert!(summary.current_price.is_none());
        assert!(summary.price_trend.is_none());
        assert_eq!(summary.weather_impact, Some(WeatherImpact::Uncertain));
    }

    #[test]
    fn test_advisory_response_roundtrip() {
        let resp = AdvisoryResponse {
            query: "should I sell?".to_string(),
            crop: "wheat".to_string(),
            advice: "hold".to_string(),
            data_summary: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("data_summary"));
        let back: AdvisoryResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resp);
    }
}
