//! News sentiment aggregation
//!
//! Scores all stored headlines for a crop. Unlike price analysis this is
//! deliberately not windowed by timeframe; the full news history counts.

use crate::types::{NewsItem, Sentiment, SentimentAnalysis, SentimentTrend};

/// Aggregate sentiment over `items`. Returns `None` when there is no news.
pub fn analyze(items: &[NewsItem], crop: &str) -> Option<SentimentAnalysis> {
    if items.is_empty() {
        return None;
    }

    let positive = items
        .iter()
        .filter(|n| n.sentiment == Sentiment::Positive)
        .count();
    let negative = items
        .iter()
        .filter(|n| n.sentiment == Sentiment::Negative)
        .count();
    let neutral = items
        .iter()
        .filter(|n| n.sentiment == Sentiment::Neutral)
        .count();

    let total = positive + negative + neutral;
    let sentiment_score = if total > 0 {
        (positive as f64 - negative as f64) / total as f64
    } else {
        0.0
    };

    Some(SentimentAnalysis {
        crop: crop.to_string(),
        sentiment_score,
        sentiment_trend: classify_sentiment(sentiment_score),
        positive_news_count: positive,
        negative_news_count: negative,
        neutral_news_count: neutral,
        headlines: items.iter().map(|n| n.headline.clone()).collect(),
    })
}

/// Threshold ladder on the net score. Boundaries are strict: a score of
/// exactly 0.5 is "positive", not "strongly positive".
pub fn classify_sentiment(score: f64) -> SentimentTrend {
    if score > 0.5 {
        SentimentTrend::StronglyPositive
    } else if score > 0.1 {
        SentimentTrend::Positive
    } else if score < -0.5 {
        SentimentTrend::StronglyNegative
    } else if score < -0.1 {
        SentimentTrend::Negative
    } else {
        SentimentTrend::Neutral
    }
}
