//! OHLCV kline representation.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One OHLCV candle for a fixed timeframe interval (e.g. 5 minutes).
///
/// Bars are immutable once produced and must be supplied to the engine in
/// strictly ascending timestamp order with no duplicates. Gaps are not
/// synthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}
