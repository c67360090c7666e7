//! Market data source
//!
//! CSV-backed datasets with load-or-fetch semantics: an existing file is
//! returned as-is unless a refresh is forced, otherwise a fresh synthetic
//! dataset is generated and persisted. One file per (dataset, selector).

pub mod synthetic;

use crate::error::Result;
use crate::types::{NewsItem, PricePoint, WeatherDay};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// News lookback used when generating a fresh dataset
const NEWS_WINDOW_DAYS: i64 = 30;

/// File-backed market data store
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn prices_path(&self, crop: &str) -> PathBuf {
        self.dir.join(format!("historical_prices_{crop}.csv"))
    }

    fn news_path(&self, crop: &str) -> PathBuf {
        self.dir.join(format!("market_news_{crop}.csv"))
    }

    fn weather_path(&self, region: &str) -> PathBuf {
        self.dir.join(format!("weather_forecast_{region}.csv"))
    }

    /// Historical price series for a crop
    pub fn load_or_fetch_prices(&self, crop: &str, force_refresh: bool) -> Result<Vec<PricePoint>> {
        let path = self.prices_path(crop);
        if !force_refresh && path.exists() {
            info!(crop, "loading historical prices from {}", path.display());
            return read_csv(&path);
        }

        info!(crop, "generating historical price data");
        let mut rng = rand::rng();
        let prices = synthetic::historical_prices(crop, Utc::now().date_naive(), &mut rng);
        write_csv(&path, &prices)?;
        info!("saved historical prices to {}", path.display());
        Ok(prices)
    }

    /// Market news items for a crop
    pub fn load_or_fetch_news(&self, crop: &str, force_refresh: bool) -> Result<Vec<NewsItem>> {
        let path = self.news_path(crop);
        if !force_refresh && path.exists() {
            info!(crop, "loading market news from {}", path.display());
            return read_csv(&path);
        }

        info!(crop, "generating market news data");
        let mut rng = rand::rng();
        let news = synthetic::market_news(crop, Utc::now().date_naive(), NEWS_WINDOW_DAYS, &mut rng);
        write_csv(&path, &news)?;
        info!("saved market news to {}", path.display());
        Ok(news)
    }

    /// Weather forecast for a region
    pub fn load_or_fetch_weather(&self, region: &str, force_refresh: bool) -> Result<Vec<WeatherDay>> {
        let path = self.weather_path(region);
        if !force_refresh && path.exists() {
            info!(region, "loading weather forecast from {}", path.display());
            return read_csv(&path);
        }

        info!(region, "generating weather forecast data");
        let mut rng = rand::rng();
        let forecast = synthetic::weather_forecast(region, Utc::now().date_naive(), &mut rng);
        write_csv(&path, &forecast)?;
        info!("saved weather forecast to {}", path.display());
        Ok(forecast)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
