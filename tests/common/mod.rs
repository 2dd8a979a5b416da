#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use scalplab::domain::backtest::BacktestConfig;
pub use scalplab::domain::bar::Bar;
use scalplab::domain::error::ScalplabError;
use scalplab::domain::indicator::IndicatorFrame;
use scalplab::domain::signal::{Side, SignalEvaluator, SignalProposal};
use scalplab::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ScalplabError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScalplabError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScalplabError> {
        Ok(self.data.keys().cloned().collect())
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, ScalplabError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(Some((
                bars[0].timestamp,
                bars[bars.len() - 1].timestamp,
                bars.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A bar at `index` five-minute steps past the origin. High/low bracket
/// the close by one point.
pub fn make_bar(index: usize, close: f64) -> Bar {
    Bar {
        timestamp: origin() + Duration::minutes(5 * index as i64),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000.0,
    }
}

pub fn make_flat_bars(count: usize, close: f64) -> Vec<Bar> {
    (0..count).map(|i| make_bar(i, close)).collect()
}

pub fn frictionless_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 10_000.0,
        risk_per_trade: 0.01,
        fee_percent: 0.0,
        slippage_percent: 0.0,
    }
}

/// Test evaluator: proposes a fixed long setup whenever the latest close
/// crosses above `trigger` coming from at or below it. Deterministic and
/// easy to reason about by hand.
pub struct ThresholdEvaluator {
    pub trigger: f64,
    pub stop: f64,
    pub take_profits: [f64; 3],
}

impl SignalEvaluator for ThresholdEvaluator {
    fn name(&self) -> &str {
        "threshold"
    }

    fn evaluate(&self, frames: &[IndicatorFrame]) -> Option<SignalProposal> {
        if frames.len() < 2 {
            return None;
        }
        let cur = &frames[frames.len() - 1];
        let prev = &frames[frames.len() - 2];
        if prev.bar.close <= self.trigger && cur.bar.close > self.trigger {
            Some(SignalProposal {
                side: Side::Long,
                entry_price: cur.bar.close,
                stop_loss: self.stop,
                take_profits: self.take_profits,
                confirmation_count: 6,
                checks: vec![],
            })
        } else {
            None
        }
    }
}
