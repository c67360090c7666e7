//! Advisory generation
//!
//! Turns a comprehensive analysis plus a farmer's question into free-text
//! advice from a chat model, with a content-addressed response cache in
//! front of the model call.

pub mod cache;
pub mod llm;

pub use cache::AdvisoryCache;
pub use llm::{ChatModel, LlmClient};

use crate::types::{AdvisoryResponse, ComprehensiveAnalysis, DataSummary};
use chrono::Utc;
use std::fmt::Display;
use tracing::{error, info};

/// Fixed advisor persona sent as the system message
const SYSTEM_PROMPT: &str = "You are an agricultural market analyst and advisor. \
    You provide farmers with informed, practical advice on crop marketing decisions \
    based on data analysis, market trends, and weather forecasts. Your advice should \
    be clear, concise, and actionable with specific recommendations.";

/// Headlines included in the prompt
const MAX_PROMPT_HEADLINES: usize = 3;

pub struct Advisor {
    cache: AdvisoryCache,
    model: Box<dyn ChatModel>,
}

impl Advisor {
    pub fn new(cache: AdvisoryCache, model: Box<dyn ChatModel>) -> Self {
        Self { cache, model }
    }

    /// Advisory for a (analysis, query) pair.
    ///
    /// Identical inputs hit the cache and return the stored response
    /// unchanged, original timestamp included. A failed model call degrades
    /// to a response carrying the error text; it is not cached and never
    /// propagates as an error.
    pub async fn get_advisory(
        &self,
        analysis: &ComprehensiveAnalysis,
        query: &str,
        force_refresh: bool,
    ) -> AdvisoryResponse {
        let serialized = serde_json::to_string(analysis).unwrap_or_default();
        let key = AdvisoryCache::key(&serialized, query);

        if !force_refresh {
            if let Some(cached) = self.cache.get(&key) {
                info!(crop = %analysis.crop, "using cached advisory");
                return cached;
            }
        }

        info!(
            crop = %analysis.crop,
            model = self.model.name(),
            "generating advisory"
        );
        let prompt = build_prompt(analysis, query);

        match self.model.chat(SYSTEM_PROMPT, &prompt).await {
            Ok(advice) => {
                let response = AdvisoryResponse {
                    query: query.to_string(),
                    crop: analysis.crop.clone(),
                    advice,
                    data_summary: Some(DataSummary::from_analysis(analysis)),
                    timestamp: Utc::now(),
                };
                self.cache.put(&key, &response);
                response
            }
            Err(e) => {
                error!(crop = %analysis.crop, "advisory generation failed: {e}");
                AdvisoryResponse {
                    query: query.to_string(),
                    crop: analysis.crop.clone(),
                    advice: format!("Unable to generate advisory at this time. Error: {e}"),
                    data_summary: None,
                    timestamp: Utc::now(),
                }
            }
        }
    }
}

/// Render the analysis into the user prompt for the chat model
fn build_prompt(analysis: &ComprehensiveAnalysis, query: &str) -> String {
    let timeframe = analysis.timeframe;
    let price = analysis.price_analysis.as_ref();
    let sentiment = analysis.sentiment_analysis.as_ref();
    let weather = analysis.weather_analysis.as_ref();

    let headlines = sentiment
        .map(|s| {
            s.headlines
                .iter()
                .take(MAX_PROMPT_HEADLINES)
                .map(|h| format!("  - {h}"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    format!(
        r#"Here is the current market analysis for {crop}:

PRICE ANALYSIS ({timeframe}):
- Current price: {current} per bushel
- Price trend: {trend}
- Price change: {change}% over the last {timeframe}
- Projected price change: {projection}% in the coming {timeframe}
- Price volatility: {volatility}

MARKET SENTIMENT:
- Overall sentiment: {sentiment}
- Recent headlines:
{headlines}

WEATHER FORECAST IMPACT:
- Weather impact: {impact}
- Explanation: {explanation}
- Average temperature: {temperature}°C
- Total precipitation forecast: {precipitation} mm

Based on this analysis, provide specific advice in response to the farmer's question:
"{query}"

Your advice should include:
1. A clear recommendation (sell now, hold, or partial sale)
2. Reasoning behind your recommendation
3. Timing suggestions (when to sell if not now)
4. Risks to be aware of
5. Alternative strategies to consider
"#,
        crop = analysis.crop.to_uppercase(),
        current = fmt_opt(price.map(|p| format!("${:.2}", p.current_price))),
        trend = fmt_opt(price.map(|p| p.trend)),
        change = fmt_opt(price.map(|p| format!("{:.2}", p.price_change_pct))),
        projection = fmt_opt(price.map(|p| format!("{:.2}", p.projection_pct))),
        volatility = fmt_opt(price.map(|p| format!("{:.2}", p.volatility))),
        sentiment = fmt_opt(sentiment.map(|s| s.sentiment_trend)),
        impact = fmt_opt(weather.map(|w| w.weather_impact)),
        explanation = fmt_opt(weather.map(|w| w.explanation.clone())),
        temperature = fmt_opt(weather.map(|w| format!("{:.1}", w.average_temperature))),
        precipitation = fmt_opt(weather.map(|w| format!("{:.1}", w.total_precipitation))),
    )
}

fn fmt_opt<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AdvisorError, Result};
    use crate::types::{
        PriceAnalysis, SentimentAnalysis, SentimentTrend, Timeframe, Trend, WeatherAnalysis,
        WeatherImpact,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct StubModel {
        advice: String,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ChatModel for StubModel {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AdvisorError::LlmProvider("stub offline".to_string()))
            } else {
                Ok(self.advice.clone())
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn analysis() -> ComprehensiveAnalysis {
        ComprehensiveAnalysis {
            crop: "wheat".to_string(),
            timeframe: Timeframe::OneMonth,
            price_analysis: Some(PriceAnalysis {
                crop: "wheat".to_string(),
                timeframe: Timeframe::OneMonth,
                current_price: 550.25,
                average_price: 540.0,
                price_change: 25.0,
                price_change_pct: 4.76,
                trend: Trend::SlightlyIncreasing,
                volatility: 12.5,
                projected_price: 557.0,
                projection_pct: 1.23,
            }),
            sentiment_analysis: Some(SentimentAnalysis {
                crop: "wheat".to_string(),
                sentiment_score: 0.4,
                sentiment_trend: SentimentTrend::Positive,
                positive_news_count: 7,
                negative_news_count: 3,
                neutral_news_count: 0,
                headlines: (1..=5).map(|i| format!("headline {i}")).collect(),
            }),
            weather_analysis: Some(WeatherAnalysis {
                crop: "wheat".to_string(),
                region: "midwest".to_string(),
                average_temperature: 22.3,
                total_precipitation: 18.7,
                weather_impact: WeatherImpact::NeutralToPositive,
                explanation: "Weather conditions appear favorable for wheat crops.".to_string(),
            }),
            analysis_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    fn advisor(advice: &str, fail: bool, dir: &TempDir) -> (Advisor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = StubModel {
            advice: advice.to_string(),
            fail,
            calls: calls.clone(),
        };
        let cache = AdvisoryCache::open(dir.path()).unwrap();
        (Advisor::new(cache, Box::new(model)), calls)
    }

    #[tokio::test]
    async fn test_cache_hit_returns_stored_response() {
        let tmp = TempDir::new().unwrap();
        let (advisor, calls) = advisor("hold until harvest", false, &tmp);

        let first = advisor.get_advisory(&analysis(), "sell now?", false).await;
        let second = advisor.get_advisory(&analysis(), "sell now?", false).await;

        // Identical including the original timestamp, single model call
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_regenerates() {
        let tmp = TempDir::new().unwrap();
        let (advisor, calls) = advisor("hold", false, &tmp);

        let first = advisor.get_advisory(&analysis(), "sell now?", false).await;
        let second = advisor.get_advisory(&analysis(), "sell now?", true).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_different_query_is_a_new_key() {
        let tmp = TempDir::new().unwrap();
        let (advisor, calls) = advisor("hold", false, &tmp);

        advisor.get_advisory(&analysis(), "sell now?", false).await;
        advisor.get_advisory(&analysis(), "hold instead?", false).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_successful_response_shape() {
        let tmp = TempDir::new().unwrap();
        let (advisor, _) = advisor("sell a third now", false, &tmp);

        let response = advisor.get_advisory(&analysis(), "sell now?", false).await;

        assert_eq!(response.query, "sell now?");
        assert_eq!(response.crop, "wheat");
        assert_eq!(response.advice, "sell a third now");
        let summary = response.data_summary.unwrap();
        assert_eq!(summary.current_price, Some(550.25));
        assert_eq!(summary.price_trend, Some(Trend::SlightlyIncreasing));
        assert_eq!(summary.projected_price_change, Some(1.23));
        assert_eq!(summary.market_sentiment, Some(SentimentTrend::Positive));
        assert_eq!(summary.weather_impact, Some(WeatherImpact::NeutralToPositive));
    }

    #[tokio::test]
    async fn test_model_failure_degrades_without_caching() {
        let tmp = TempDir::new().unwrap();
        let (advisor, calls) = advisor("", true, &tmp);

        let response = advisor.get_advisory(&analysis(), "sell now?", false).await;
        assert!(response.advice.contains("Unable to generate advisory"));
        assert!(response.advice.contains("stub offline"));
        assert!(response.data_summary.is_none());

        // Degraded responses are not cached; the next call retries the model
        advisor.get_advisory(&analysis(), "sell now?", false).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_prompt_embeds_figures_and_caps_headlines() {
        let prompt = build_prompt(&analysis(), "should I sell before September?");

        assert!(prompt.contains("WHEAT"));
        assert!(prompt.contains("$550.25 per bushel"));
        assert!(prompt.contains("slightly increasing"));
        assert!(prompt.contains("4.76%"));
        assert!(prompt.contains("22.3°C"));
        assert!(prompt.contains("should I sell before September?"));

        assert!(prompt.contains("headline 1"));
        assert!(prompt.contains("headline 3"));
        assert!(!prompt.contains("headline 4"));
    }

    #[test]
    fn test_prompt_marks_missing_sections() {
        let mut partial = analysis();
        partial.price_analysis = None;
        partial.sentiment_analysis = None;

        let prompt = build_prompt(&partial, "sell?");
        assert!(prompt.contains("Current price: N/A per bushel"));
        assert!(prompt.contains("Overall sentiment: N/A"));
        assert!(prompt.contains("neutral to positive"));
    }
}
