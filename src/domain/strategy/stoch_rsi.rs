//! Stochastic RSI mean-reversion evaluator.
//!
//! Scalping strategy: fade oversold/overbought extremes. The mandatory
//! trigger is an extreme Stochastic RSI reading, or a bounce/rejection
//! forming off one. Six confirmations are scored; at least 4 must pass.
//! Stops and targets are tighter than the trend-following ladder.

use crate::domain::indicator::IndicatorFrame;
use crate::domain::signal::{Confirmation, Side, SignalEvaluator, SignalProposal};

#[derive(Debug, Clone)]
pub struct StochRsiParams {
    pub oversold: f64,
    pub overbought: f64,
    pub min_confirmations: usize,
    pub volume_multiplier: f64,
    pub atr_stop: f64,
    pub atr_targets: [f64; 3],
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            min_confirmations: 4,
            volume_multiplier: 1.2,
            atr_stop: 1.5,
            atr_targets: [1.5, 2.5, 4.0],
        }
    }
}

pub struct StochRsiEvaluator {
    name: String,
    params: StochRsiParams,
}

impl Default for StochRsiEvaluator {
    fn default() -> Self {
        Self::new(StochRsiParams::default())
    }
}

impl StochRsiEvaluator {
    pub fn new(params: StochRsiParams) -> Self {
        Self {
            name: "stoch-rsi".into(),
            params,
        }
    }

    /// The trigger: an extreme reading, or a turn forming off one.
    fn trigger_side(&self, prev: &IndicatorFrame, cur: &IndicatorFrame) -> Option<Side> {
        let p = &self.params;
        let long_extreme = cur.stoch_rsi <= p.oversold;
        let long_bounce = prev.stoch_rsi <= p.oversold && cur.stoch_rsi > prev.stoch_rsi;
        if long_extreme || long_bounce {
            return Some(Side::Long);
        }

        let short_extreme = cur.stoch_rsi >= p.overbought;
        let short_rejection = prev.stoch_rsi >= p.overbought && cur.stoch_rsi < prev.stoch_rsi;
        if short_extreme || short_rejection {
            return Some(Side::Short);
        }

        None
    }

    fn score(&self, side: Side, prev: &IndicatorFrame, cur: &IndicatorFrame) -> Vec<Confirmation> {
        let p = &self.params;
        let close = cur.close();
        let sign = side.sign();

        let (extreme_ok, pattern_ok, kd_ok) = match side {
            Side::Long => (
                cur.stoch_rsi <= p.oversold,
                prev.stoch_rsi <= p.oversold && cur.stoch_rsi > prev.stoch_rsi,
                prev.stoch_rsi_k <= prev.stoch_rsi_d && cur.stoch_rsi_k > cur.stoch_rsi_d,
            ),
            Side::Short => (
                cur.stoch_rsi >= p.overbought,
                prev.stoch_rsi >= p.overbought && cur.stoch_rsi < prev.stoch_rsi,
                prev.stoch_rsi_k >= prev.stoch_rsi_d && cur.stoch_rsi_k < cur.stoch_rsi_d,
            ),
        };

        // The reversion must not fight the larger trend.
        let trend_ok = sign * (close - cur.ema_50) >= 0.0;
        let volume_ok = cur.bar.volume > p.volume_multiplier * cur.volume_ma;
        let rsi_sane = match side {
            Side::Long => cur.rsi < 50.0,
            Side::Short => cur.rsi > 50.0,
        };

        vec![
            Confirmation::new(
                "extreme",
                extreme_ok,
                format!("stoch RSI {:.1}", cur.stoch_rsi),
            ),
            Confirmation::new(
                "pattern",
                pattern_ok,
                format!("{:.1} -> {:.1}", prev.stoch_rsi, cur.stoch_rsi),
            ),
            Confirmation::new(
                "kd_cross",
                kd_ok,
                format!("K {:.1} / D {:.1}", cur.stoch_rsi_k, cur.stoch_rsi_d),
            ),
            Confirmation::new(
                "trend_filter",
                trend_ok,
                format!("close {:.4} vs EMA50 {:.4}", close, cur.ema_50),
            ),
            Confirmation::new(
                "volume",
                volume_ok,
                format!(
                    "{:.0} vs {:.1}x avg {:.0}",
                    cur.bar.volume, p.volume_multiplier, cur.volume_ma
                ),
            ),
            Confirmation::new("rsi_sane", rsi_sane, format!("RSI {:.1}", cur.rsi)),
        ]
    }
}

impl SignalEvaluator for StochRsiEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, frames: &[IndicatorFrame]) -> Option<SignalProposal> {
        if frames.len() < 2 {
            return None;
        }
        let cur = &frames[frames.len() - 1];
        let prev = &frames[frames.len() - 2];

        if cur.atr.is_nan()
            || cur.rsi.is_nan()
            || cur.volume_ma.is_nan()
            || cur.stoch_rsi.is_nan()
            || prev.stoch_rsi.is_nan()
            || cur.stoch_rsi_k.is_nan()
            || cur.stoch_rsi_d.is_nan()
        {
            return None;
        }

        let side = self.trigger_side(prev, cur)?;

        let checks = self.score(side, prev, cur);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use chrono::{Duration, TimeZone, Utc};

    struct FrameParams {
        close: f64,
        volume: f64,
        ema_50: f64,
        rsi: f64,
        stoch: f64,
        k: f64,
        d: f64,
    }

    fn frame(p: FrameParams) -> IndicatorFrame {
        IndicatorFrame {
            bar: Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + Duration::minutes(5),
                open: p.close,
                high: p.close,
                low: p.close,
                close: p.close,
                volume: p.volume,
            },
            ema_8: p.close,
            ema_21: p.close,
            ema_50: p.ema_50,
            ema_200: p.ema_50,
            rsi: p.rsi,
            atr: 2.0,
            volume_ma: 1_000.0,
            bb_upper: f64::NAN,
            bb_middle: f64::NAN,
            bb_lower: f64::NAN,
            stoch_rsi: p.stoch,
            stoch_rsi_k: p.k,
            stoch_rsi_d: p.d,
        }
    }

    fn oversold_bounce() -> Vec<IndicatorFrame> {
        vec![
            frame(FrameParams {
                close: 100.0,
                volume: 1_000.0,
                ema_50: 99.0,
                rsi: 35.0,
                stoch: 15.0,
                k: 18.0,
                d: 22.0,
            }),
            frame(FrameParams {
                close: 100.5,
                volume: 1_500.0,
                ema_50: 99.0,
                rsi: 40.0,
                stoch: 25.0,
                k: 24.0,
                d: 22.0,
            }),
        ]
    }

    #[test]
    fn long_on_oversold_bounce() {
        let frames = oversold_bounce();
        let evaluator = StochRsiEvaluator::default();
        let signal = evaluator.evaluate(&frames).expect("signal");

        assert_eq!(signal.side, Side::Long);
        // extreme (25 <= 30), pattern, kd_cross, trend, volume, rsi_sane: 6/6
        assert_eq!(signal.confirmation_count, 6);
        // ATR 2.0: stop 1.5x below, targets 1.5/2.5/4x above.
        assert!((signal.stop_loss - (100.5 - 3.0)).abs() < 1e-9);
        assert!((signal.take_profits[0] - (100.5 + 3.0)).abs() < 1e-9);
        assert!((signal.take_profits[1] - (100.5 + 5.0)).abs() < 1e-9);
        assert!((signal.take_profits[2] - (100.5 + 8.0)).abs() < 1e-9);
    }

    #[test]
    fn short_on_overbought_rejection() {
        let frames = vec![
            frame(FrameParams {
                close: 100.0,
                volume: 1_000.0,
                ema_50: 101.0,
                rsi: 65.0,
                stoch: 85.0,
                k: 82.0,
                d: 78.0,
            }),
            frame(FrameParams {
                close: 99.5,
                volume: 1_500.0,
                ema_50: 101.0,
                rsi: 60.0,
                stoch: 75.0,
                k: 76.0,
                d: 78.0,
            }),
        ];
        let evaluator = StochRsiEvaluator::default();
        let signal = evaluator.evaluate(&frames).expect("signal");

        assert_eq!(signal.side, Side::Short);
        assert_eq!(signal.confirmation_count, 6);
        assert!((signal.stop_loss - (99.5 + 3.0)).abs() < 1e-9);
        assert!((signal.take_profits[0] - (99.5 - 3.0)).abs() < 1e-9);
    }

    #[test]
    fn no_trigger_in_neutral_zone() {
        let frames = vec![
            frame(FrameParams {
                close: 100.0,
                volume: 2_000.0,
                ema_50: 99.0,
                rsi: 45.0,
                stoch: 50.0,
                k: 50.0,
                d: 48.0,
            }),
            frame(FrameParams {
                close: 100.5,
                volume: 2_000.0,
                ema_50: 99.0,
                rsi: 48.0,
                stoch: 55.0,
                k: 53.0,
                d: 50.0,
            }),
        ];
        let evaluator = StochRsiEvaluator::default();
        assert!(evaluator.evaluate(&frames).is_none());
    }

    #[test]
    fn below_threshold_is_rejected() {
        // Trigger fires (deep oversold) but confirmations fall short:
        // no bounce, no K/D cross, weak volume, trend opposing.
        let frames = vec![
            frame(FrameParams {
                close: 100.0,
                volume: 1_000.0,
                ema_50: 103.0,
                rsi: 35.0,
                stoch: 20.0,
                k: 25.0,
                d: 22.0,
            }),
            frame(FrameParams {
                close: 99.0,
                volume: 900.0,
                ema_50: 103.0,
                rsi: 33.0,
                stoch: 12.0,
                k: 20.0,
                d: 22.0,
            }),
        ];
        let evaluator = StochRsiEvaluator::default();
        // extreme + rsi_sane only: 2/6.
        assert!(evaluator.evaluate(&frames).is_none());
    }

    #[test]
    fn nan_stoch_declines_evaluation() {
        let mut frames = oversold_bounce();
        frames[1].stoch_rsi = f64::NAN;
        let evaluator = StochRsiEvaluator::default();
        assert!(evaluator.evaluate(&frames).is_none());
    }
}
