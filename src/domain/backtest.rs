//! Replay engine: drives indicator frames through a signal evaluator and
//! the trade lifecycle, accumulating an equity curve.
//!
//! The run is a strict sequential fold over the bar series. Per bar:
//! resolve the open trade's exit first, then (if flat and past warmup) ask
//! the evaluator for an entry, then record equity. Any trade still open
//! after the last bar is force-closed at the final close. Reordering bars
//! would corrupt the single-position invariant and the walk-forward
//! confirmation logic, so nothing here is concurrent; parallelism belongs
//! at the level of independent runs.

use crate::domain::execution::ExecutionModel;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::signal::SignalEvaluator;
use crate::domain::stats::{drawdown_curve, Statistics};
use crate::domain::trade::{ExitReason, SimulatedTrade};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Bars of history required before the evaluator is consulted. Covers the
/// slowest indicator window (EMA 200).
pub const WARMUP_BARS: usize = 200;

/// Engine parameters. Fee and slippage are fractions, not percentages.
///
/// Values are validated at the configuration boundary; the engine itself
/// only guards degenerate sizing.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub risk_per_trade: f64,
    pub fee_percent: f64,
    pub slippage_percent: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        // 1.5% risk, 0.04% taker fee, 0.05% slippage.
        BacktestConfig {
            initial_capital: 10_000.0,
            risk_per_trade: 0.015,
            fee_percent: 0.0004,
            slippage_percent: 0.0005,
        }
    }
}

/// Snapshot of a finished run. Read-only once produced.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub timeframe: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub equity_curve: Vec<f64>,
    pub equity_times: Vec<DateTime<Utc>>,
    pub drawdown_curve: Vec<f64>,
    pub trades: Vec<SimulatedTrade>,
    pub stats: Statistics,
}

/// The replay engine. One instance owns one run's state at a time; `run`
/// resets everything, so a single instance may be reused across series.
/// Independent runs on separate instances share nothing and may execute on
/// separate threads.
pub struct Backtester {
    config: BacktestConfig,
    execution: ExecutionModel,
    capital: f64,
    equity_curve: Vec<f64>,
    equity_times: Vec<DateTime<Utc>>,
    trades: Vec<SimulatedTrade>,
    open_trade: Option<SimulatedTrade>,
}

impl Backtester {
    pub fn new(config: BacktestConfig) -> Self {
        let execution = ExecutionModel::new(config.fee_percent, config.slippage_percent);
        let capital = config.initial_capital;
        Backtester {
            config,
            execution,
            capital,
            equity_curve: Vec::new(),
            equity_times: Vec::new(),
            trades: Vec::new(),
            open_trade: None,
        }
    }

    /// Replay `frames` through `evaluator`.
    ///
    /// An empty series yields a zero-trade result whose equity curve is the
    /// single seed point. The result is bit-for-bit reproducible for
    /// identical inputs.
    pub fn run(
        &mut self,
        frames: &[IndicatorFrame],
        symbol: &str,
        timeframe: &str,
        evaluator: &dyn SignalEvaluator,
    ) -> BacktestResult {
        self.reset();

        for i in 0..frames.len() {
            let frame = &frames[i];

            // Exits before entries: a bar never both closes the old trade
            // and opens a new one.
            if let Some(trade) = self.open_trade.as_ref() {
                if let Some((price, reason)) = self.execution.check_exit(trade, &frame.bar) {
                    self.close_open_trade(price, frame.bar.timestamp, reason);
                }
            }

            if self.open_trade.is_none() && i >= WARMUP_BARS {
                if let Some(proposal) = evaluator.evaluate(&frames[..=i]) {
                    self.open_trade = self.execution.enter(
                        frame.bar.timestamp,
                        symbol,
                        &proposal,
                        self.capital,
                        self.config.risk_per_trade,
                    );
                }
            }

            self.equity_curve.push(self.capital);
            self.equity_times.push(frame.bar.timestamp);
        }

        // No dangling positions: whatever is still open goes out at the
        // last close, and the last equity point absorbs the realized P&L.
        if self.open_trade.is_some() {
            if let Some(last) = frames.last() {
                self.close_open_trade(last.bar.close, last.bar.timestamp, ExitReason::EndOfData);
            }
            if let Some(last_equity) = self.equity_curve.last_mut() {
                *last_equity = self.capital;
            }
        }

        self.build_result(frames, symbol, timeframe)
    }

    fn reset(&mut self) {
        self.capital = self.config.initial_capital;
        self.equity_curve = vec![self.config.initial_capital];
        self.equity_times = Vec::new();
        self.trades = Vec::new();
        self.open_trade = None;
    }

    fn close_open_trade(&mut self, price: f64, time: DateTime<Utc>, reason: ExitReason) {
        if let Some(mut trade) = self.open_trade.take() {
            self.execution.close(&mut trade, price, time, reason);
            self.capital += trade.pnl;
            self.trades.push(trade);
        }
    }

    fn build_result(
        &mut self,
        frames: &[IndicatorFrame],
        symbol: &str,
        timeframe: &str,
    ) -> BacktestResult {
        let stats = Statistics::compute(&self.trades, &self.equity_curve, self.config.initial_capital);
        BacktestResult {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            start_time: frames.first().map(|f| f.bar.timestamp),
            end_time: frames.last().map(|f| f.bar.timestamp),
            initial_capital: self.config.initial_capital,
            final_capital: self.capital,
            drawdown_curve: drawdown_curve(&self.equity_curve),
            equity_curve: std::mem::take(&mut self.equity_curve),
            equity_times: std::mem::take(&mut self.equity_times),
            trades: std::mem::take(&mut self.trades),
            stats,
        }
    }
}
