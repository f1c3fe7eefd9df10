use serde::{Deserialize, Serialize};

use super::timestamp::UtcDateTime;

/// One time/price sample, ordered ascending within a series as returned by
/// the source. Never mutated after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: UtcDateTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: UtcDateTime, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Ordered time/price samples for one asset over one window.
///
/// A successful fetch always yields a non-empty series; downstream code must
/// treat empty as a failure state, which the fetch layer enforces by
/// returning `FetchError::EmptySeries` instead of an empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub points: Vec<PricePoint>,
}

impl Series {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
