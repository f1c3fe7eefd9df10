use serde::{Deserialize, Serialize};

use crate::domain::{Series, UtcDateTime};
use crate::error::FetchError;

/// Derived min/max statistics for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub max_price: f64,
    pub max_at: UtcDateTime,
    pub min_price: f64,
    pub min_at: UtcDateTime,
}

/// Scans the series once and returns its extremes.
///
/// Ties on equal price resolve to the first occurrence in series order
/// (stable argmax/argmin). An empty series is a failure state, never a panic.
pub fn summarize(series: &Series) -> Result<SeriesSummary, FetchError> {
    let first = series.first().ok_or(FetchError::EmptySeries)?;

    let mut summary = SeriesSummary {
        max_price: first.price,
        max_at: first.timestamp,
        min_price: first.price,
        min_at: first.timestamp,
    };

    for point in &series.points[1..] {
        if point.price > summary.max_price {
            summary.max_price = point.price;
            summary.max_at = point.timestamp;
        }
        if point.price < summary.min_price {
            summary.min_price = point.price;
            summary.min_at = point.timestamp;
        }
    }

    Ok(summary)
}
