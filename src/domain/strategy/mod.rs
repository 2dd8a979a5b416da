//! Built-in signal evaluators.

pub mod ema_cross;
pub mod stoch_rsi;

pub use ema_cross::{EmaCrossEvaluator, EmaCrossParams};
pub use stoch_rsi::{StochRsiEvaluator, StochRsiParams};

use crate::domain::error::ScalplabError;
use crate::domain::signal::SignalEvaluator;

/// Resolve a strategy by its configured name.
pub fn build_evaluator(name: &str) -> Result<Box<dyn SignalEvaluator>, ScalplabError> {
    match name {
        "ema-optimized" => Ok(Box::new(EmaCrossEvaluator::optimized())),
        "ema-relaxed" => Ok(Box::new(EmaCrossEvaluator::relaxed())),
        "stoch-rsi" => Ok(Box::new(StochRsiEvaluator::default())),
        other => Err(ScalplabError::UnknownStrategy {
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_known_evaluators() {
        assert_eq!(build_evaluator("ema-optimized").unwrap().name(), "ema-optimized");
        assert_eq!(build_evaluator("ema-relaxed").unwrap().name(), "ema-relaxed");
        assert_eq!(build_evaluator("stoch-rsi").unwrap().name(), "stoch-rsi");
    }

    #[test]
    fn build_unknown_evaluator_fails() {
        let err = build_evaluator("martingale").err().unwrap();
        assert!(err.to_string().contains("martingale"));
    }
}
