//! EMA crossover evaluator with confirmation scoring.
//!
//! The mandatory trigger is a fast/slow EMA crossover on the latest two
//! bars. Five further confirmations are scored on top of it; a proposal is
//! emitted only when the total meets the variant's minimum. The optimized
//! and relaxed variants share this implementation and differ only in their
//! thresholds.

use crate::domain::indicator::IndicatorFrame;
use crate::domain::signal::{Confirmation, Side, SignalEvaluator, SignalProposal};

/// Threshold set for one crossover variant.
#[derive(Debug, Clone)]
pub struct EmaCrossParams {
    /// Minimum confirmations (out of 6, trigger included) to emit a signal.
    pub min_confirmations: usize,
    /// Acceptable RSI band: a signal wants momentum, not exhaustion.
    pub rsi_low: f64,
    pub rsi_high: f64,
    /// Volume must exceed this multiple of its rolling average.
    pub volume_multiplier: f64,
    /// Minimum distance of close from EMA(50), in percent.
    pub trend_strength_pct: f64,
    /// Stop distance in ATR multiples.
    pub atr_stop: f64,
    /// TP1/TP2/TP3 distances in ATR multiples, nearest first.
    pub atr_targets: [f64; 3],
}

impl EmaCrossParams {
    /// Selective variant: 5 of 6 confirmations, tight RSI band.
    pub fn optimized() -> Self {
        Self {
            min_confirmations: 5,
            rsi_low: 30.0,
            rsi_high: 70.0,
            volume_multiplier: 1.3,
            trend_strength_pct: 0.5,
            atr_stop: 2.0,
            atr_targets: [3.0, 5.0, 7.0],
        }
    }

    /// Looser variant: 4 of 6, wider RSI band, weaker volume and trend
    /// requirements. Trades more, filters less.
    pub fn relaxed() -> Self {
        Self {
            min_confirmations: 4,
            rsi_low: 25.0,
            rsi_high: 75.0,
            volume_multiplier: 1.2,
            trend_strength_pct: 0.3,
            atr_stop: 2.0,
            atr_targets: [3.0, 5.0, 7.0],
        }
    }
}

pub struct EmaCrossEvaluator {
    name: String,
    params: EmaCrossParams,
}

impl EmaCrossEvaluator {
    pub fn new(name: impl Into<String>, params: EmaCrossParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn optimized() -> Self {
        Self::new("ema-optimized", EmaCrossParams::optimized())
    }

    pub fn relaxed() -> Self {
        Self::new("ema-relaxed", EmaCrossParams::relaxed())
    }

    fn crossover_side(prev: &IndicatorFrame, cur: &IndicatorFrame) -> Option<Side> {
        if prev.ema_8 <= prev.ema_21 && cur.ema_8 > cur.ema_21 {
            Some(Side::Long)
        } else if prev.ema_8 >= prev.ema_21 && cur.ema_8 < cur.ema_21 {
            Some(Side::Short)
        } else {
            None
        }
    }

    fn score(&self, side: Side, cur: &IndicatorFrame) -> Vec<Confirmation> {
        let p = &self.params;
        let close = cur.close();
        let sign = side.sign();

        let trend_ok = sign * (close - cur.ema_50) > 0.0;
        let strength = (close - cur.ema_50).abs() / cur.ema_50 * 100.0;
        let strength_ok = strength >= p.trend_strength_pct;
        let rsi_ok = cur.rsi >= p.rsi_low && cur.rsi <= p.rsi_high;
        let volume_ok = cur.bar.volume > p.volume_multiplier * cur.volume_ma;
        let structure_ok = sign * (close - cur.ema_200) > 0.0;

        vec![
            Confirmation::new("crossover", true, format!("EMA8/EMA21 {} cross", side)),
            Confirmation::new(
                "trend",
                trend_ok,
                format!("close {:.4} vs EMA50 {:.4}", close, cur.ema_50),
            ),
            Confirmation::new(
                "trend_strength",
                strength_ok,
                format!("{:.2}% from EMA50 (need {:.2}%)", strength, p.trend_strength_pct),
            ),
            Confirmation::new(
                "rsi_band",
                rsi_ok,
                format!("RSI {:.1} in {:.0}-{:.0}", cur.rsi, p.rsi_low, p.rsi_high),
            ),
            Confirmation::new(
                "volume",
                volume_ok,
                format!(
                    "{:.0} vs {:.1}x avg {:.0}",
                    cur.bar.volume, p.volume_multiplier, cur.volume_ma
                ),
            ),
            Confirmation::new(
                "structure",
                structure_ok,
                format!("close {:.4} vs EMA200 {:.4}", close, cur.ema_200),
            ),
        ]
    }
}

impl SignalEvaluator for EmaCrossEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, frames: &[IndicatorFrame]) -> Option<SignalProposal> {
        if frames.len() < 2 {
            return None;
        }
        let cur = &frames[frames.len() - 1];
        let prev = &frames[frames.len() - 2];

        if cur.atr.is_nan() || cur.rsi.is_nan() || cur.volume_ma.is_nan() {
            return None;
        }

        // No crossover, no proposal, whatever the other scores would say.
        let side = Self::crossover_side(prev, cur)?;

        let checks = self.score(side, cur);
        let confirmation_count = checks.iter().filter(|c| c.passed).count();
        if confirmation_count < self.params.min_confirmations {
            return None;
        }

        let entry = cur.close();
        let sign = side.sign();
        let stop_loss = entry - sign * self.params.atr_stop * cur.atr;
        let take_profits = self
            .params
            .atr_targets
            .map(|mult| entry + sign * mult * cur.atr);

        Some(SignalProposal {
            side,
            entry_price: entry,
            stop_loss,
            take_profits,
            confirmation_count,
            checks,
        })
    }
}
