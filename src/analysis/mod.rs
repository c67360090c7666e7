//! Market analysis pipeline
//!
//! Three independent analyzers (price trend, news sentiment, weather impact)
//! plus the aggregator that memoizes their results per key and combines them
//! into a comprehensive record for the advisory layer.

pub mod price;
pub mod sentiment;
pub mod weather;


use crate::data::DataStore;
use crate::error::{AdvisorError, Result};
use crate::types::{
    ComprehensiveAnalysis, PriceAnalysis, SentimentAnalysis, Timeframe, WeatherAnalysis,
};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{info, warn};

/// Runs the analyzers against the data store and caches their results for
/// the lifetime of the process.
///
/// The caches are per-instance; construct one `Analyzer` at the entry point
/// and pass it around rather than rebuilding it per call.
pub struct Analyzer {
    data: DataStore,
    default_region: String,
    price_cache: HashMap<(String, Timeframe), PriceAnalysis>,
    sentiment_cache: HashMap<String, SentimentAnalysis>,
    weather_cache: HashMap<String, WeatherAnalysis>,
}

impl Analyzer {
    pub fn new(data: DataStore, default_region: impl Into<String>) -> Self {
        Self {
            data,
            default_region: default_region.into(),
            price_cache: HashMap::new(),
            sentiment_cache: HashMap::new(),
            weather_cache: HashMap::new(),
        }
    }

    /// Price trend analysis for a crop over a timeframe, memoized per
    /// (crop, timeframe). `Ok(None)` means the window held no data.
    pub fn price_trends(
        &mut self,
        crop: &str,
        timeframe: Timeframe,
    ) -> Result<Option<PriceAnalysis>> {
        let key = (crop.to_string(), timeframe);
        if let Some(cached) = self.price_cache.get(&key) {
            return Ok(Some(cached.clone()));
        }

        info!(crop, %timeframe, "analyzing price trends");
        let series = self.data.load_or_fetch_prices(crop, false)?;
        let analysis = price::analyze(&series, crop, timeframe, Utc::now().date_naive())?;

        match analysis {
            Some(analysis) => {
                self.price_cache.insert(key, analysis.clone());
                Ok(Some(analysis))
            }
            None => {
                warn!(crop, %timeframe, "no price data in window");
                Ok(None)
            }
        }
    }

    /// News sentiment for a crop, memoized per crop. Uses the full stored
    /// news history regardless of timeframe.
    pub fn market_sentiment(&mut self, crop: &str) -> Result<Option<SentimentAnalysis>> {
        if let Some(cached) = self.sentiment_cache.get(crop) {
            return Ok(Some(cached.clone()));
        }

        info!(crop, "analyzing market sentiment");
        let news = self.data.load_or_fetch_news(crop, false)?;

        match sentiment::analyze(&news, crop) {
            Some(analysis) => {
                self.sentiment_cache
                    .insert(crop.to_string(), analysis.clone());
                Ok(Some(analysis))
            }
            None => {
                warn!(crop, "no news data available");
                Ok(None)
            }
        }
    }

    /// Weather impact for a crop in the store's default region, memoized
    /// per crop.
    pub fn weather_impact(&mut self, crop: &str) -> Result<Option<WeatherAnalysis>> {
        if let Some(cached) = self.weather_cache.get(crop) {
            return Ok(Some(cached.clone()));
        }

        let region = self.default_region.clone();
        info!(crop, region, "analyzing weather impact");
        let forecast = self.data.load_or_fetch_weather(&region, false)?;

        match weather::analyze(&forecast, crop, &region) {
            Some(analysis) => {
                self.weather_cache
                    .insert(crop.to_string(), analysis.clone());
                Ok(Some(analysis))
            }
            None => {
                warn!(region, "no weather data available");
                Ok(None)
            }
        }
    }

    /// Combined record for a crop. Sub-analyses that yield no result leave
    /// their section empty; callers must treat absent sections as unknown.
    pub fn comprehensive(
        &mut self,
        crop: &str,
        timeframe: Timeframe,
    ) -> Result<ComprehensiveAnalysis> {
        info!(crop, %timeframe, "generating comprehensive analysis");

        let price_analysis = match self.price_trends(crop, timeframe) {
            Ok(analysis) => analysis,
            Err(AdvisorError::InvalidInput(reason)) => {
                warn!(crop, %reason, "price analysis rejected input");
                None
            }
            Err(e) => return Err(e),
        };
        let sentiment_analysis = self.market_sentiment(crop)?;
        let weather_analysis = self.weather_impact(crop)?;

        Ok(ComprehensiveAnalysis {
            crop: crop.to_string(),
            timeframe,
            price_analysis,
            sentiment_analysis,
            weather_analysis,
            analysis_date: Utc::now().date_naive(),
        })
    }

    /// Regenerate every dataset backing a crop
    pub fn refresh_data(&mut self, crop: &str) -> Result<()> {
        self.data.load_or_fetch_prices(crop, true)?;
        self.data.load_or_fetch_news(crop, true)?;
        let region = self.default_region.clone();
        self.data.load_or_fetch_weather(&region, true)?;

        // Cached sub-analyses are stale once the data changes
        self.price_cache.retain(|(c, _), _| c != crop);
        self.sentiment_cache.remove(crop);
        self.weather_cache.remove(crop);
        Ok(())
    }
}
