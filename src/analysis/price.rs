//! Price trend analysis
//!
//! Windows a historical price series by timeframe and derives trend,
//! volatility and a short-horizon projection.

use crate::error::{AdvisorError, Result};
use crate::types::{PriceAnalysis, PricePoint, Timeframe, Trend};
use chrono::{Duration, NaiveDate};

/// Points used on each side of the projection delta
const PROJECTION_SPAN: usize = 7;

/// Analyze the trailing window of `series` ending at `as_of`.
///
/// Returns `Ok(None)` when the window is empty. Fails with `InvalidInput`
/// when the first price in the window is zero, since the percentage change
/// is undefined there.
pub fn analyze(
    series: &[PricePoint],
    crop: &str,
    timeframe: Timeframe,
    as_of: NaiveDate,
) -> Result<Option<PriceAnalysis>> {
    let start = as_of - Duration::days(timeframe.days());
    let window: Vec<f64> = series
        .iter()
        .filter(|p| p.date >= start)
        .map(|p| p.price)
        .collect();

    let (Some(&first), Some(&last)) = (window.first(), window.last()) else {
        return Ok(None);
    };

    if first == 0.0 {
        return Err(AdvisorError::InvalidInput(format!(
            "first {crop} price in the {timeframe} window is zero"
        )));
    }

    let current_price = last;
    let average_price = mean(&window);
    let price_change = last - first;
    let price_change_pct = price_change / first * 100.0;
    let trend = classify_trend(price_change_pct);
    let volatility = std_dev(&window);

    let (projected_price, projection_pct) = project(&window, current_price);

    Ok(Some(PriceAnalysis {
        crop: crop.to_string(),
        timeframe,
        current_price,
        average_price,
        price_change,
        price_change_pct,
        trend,
        volatility,
        projected_price,
        projection_pct,
    }))
}

/// Threshold ladder on the window's percentage change.
///
/// Boundaries are strict: exactly +5% is "slightly increasing", exactly
/// +1% is "stable", and symmetrically on the downside.
pub fn classify_trend(price_change_pct: f64) -> Trend {
    if price_change_pct > 5.0 {
        Trend::StronglyIncreasing
    } else if price_change_pct > 1.0 {
        Trend::SlightlyIncreasing
    } else if price_change_pct < -5.0 {
        Trend::StronglyDecreasing
    } else if price_change_pct < -1.0 {
        Trend::SlightlyDecreasing
    } else {
        Trend::Stable
    }
}

/// Naive momentum projection: mean of the last seven points minus the mean
/// of the (up to) seven before them. Windows of seven points or fewer
/// project zero change.
fn project(window: &[f64], current_price: f64) -> (f64, f64) {
    let len = window.len();
    if len <= PROJECTION_SPAN {
        return (current_price, 0.0);
    }

    let recent = mean(&window[len - PROJECTION_SPAN..]);
    let older = mean(&window[len.saturating_sub(2 * PROJECTION_SPAN)..len - PROJECTION_SPAN]);
    let recent_trend = recent - older;

    let projected_price = current_price + recent_trend;
    let projection_pct = (projected_price / current_price - 1.0) * 100.0;
    (projected_price, projection_pct)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); zero for a single point
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
