//! Technical indicator pipeline.
//!
//! A pure transform: an ordered bar series goes in, the same series comes
//! out augmented with the derived columns the signal evaluators consume.
//! Derived fields are `f64::NAN` until their rolling window has enough
//! history; the replay engine guards against acting on them by not querying
//! evaluators before [`crate::domain::backtest::WARMUP_BARS`] bars.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod stoch_rsi;
pub mod volume;

use crate::domain::bar::Bar;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerPoint};
pub use ema::calculate_ema;
pub use rsi::calculate_rsi;
pub use stoch_rsi::{calculate_stoch_rsi, StochRsiPoint};
pub use volume::calculate_volume_ma;

pub const EMA_FAST: usize = 8;
pub const EMA_SLOW: usize = 21;
pub const EMA_TREND: usize = 50;
pub const EMA_STRUCTURE: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const VOLUME_MA_PERIOD: usize = 20;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;
pub const STOCH_RSI_PERIOD: usize = 14;
pub const STOCH_RSI_K: usize = 3;
pub const STOCH_RSI_D: usize = 3;

/// A bar together with its derived indicator columns.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub bar: Bar,
    pub ema_8: f64,
    pub ema_21: f64,
    pub ema_50: f64,
    pub ema_200: f64,
    pub rsi: f64,
    pub atr: f64,
    pub volume_ma: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub stoch_rsi: f64,
    pub stoch_rsi_k: f64,
    pub stoch_rsi_d: f64,
}

impl IndicatorFrame {
    pub fn close(&self) -> f64 {
        self.bar.close
    }

    /// Current volume relative to its rolling average. NaN during warmup.
    pub fn volume_ratio(&self) -> f64 {
        self.bar.volume / self.volume_ma
    }
}

/// Compute every indicator column over `bars`. Output has the same length
/// and order as the input.
pub fn compute_frames(bars: &[Bar]) -> Vec<IndicatorFrame> {
    let ema_8 = calculate_ema(bars, EMA_FAST);
    let ema_21 = calculate_ema(bars, EMA_SLOW);
    let ema_50 = calculate_ema(bars, EMA_TREND);
    let ema_200 = calculate_ema(bars, EMA_STRUCTURE);
    let rsi = calculate_rsi(bars, RSI_PERIOD);
    let atr = calculate_atr(bars, ATR_PERIOD);
    let volume_ma = calculate_volume_ma(bars, VOLUME_MA_PERIOD);
    let bollinger = calculate_bollinger(bars, BOLLINGER_PERIOD, BOLLINGER_MULTIPLIER);
    let stoch = calculate_stoch_rsi(&rsi, STOCH_RSI_PERIOD, STOCH_RSI_K, STOCH_RSI_D);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorFrame {
            bar: bar.clone(),
            ema_8: ema_8[i],
            ema_21: ema_21[i],
            ema_50: ema_50[i],
            ema_200: ema_200[i],
            rsi: rsi[i],
            atr: atr[i],
            volume_ma: volume_ma[i],
            bb_upper: bollinger[i].upper,
            bb_middle: bollinger[i].middle,
            bb_lower: bollinger[i].lower,
            stoch_rsi: stoch[i].value,
            stoch_rsi_k: stoch[i].k,
            stoch_rsi_d: stoch[i].d,
        })
        .collect()
}
