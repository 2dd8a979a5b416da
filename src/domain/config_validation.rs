//! Configuration validation.
//!
//! The engine trusts its inputs (it only guards degenerate sizing), so
//! every field is checked here, at the configuration boundary, before a
//! run starts.

use crate::domain::error::ScalplabError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), ScalplabError> {
    validate_initial_capital(config)?;
    validate_risk_per_trade(config)?;
    validate_fee(config)?;
    validate_slippage(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), ScalplabError> {
    let name = config
        .get_string("strategy", "name")
        .ok_or_else(|| ScalplabError::ConfigMissing {
            section: "strategy".to_string(),
            key: "name".to_string(),
        })?;
    if name.trim().is_empty() {
        return Err(ScalplabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "name".to_string(),
            reason: "strategy name must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), ScalplabError> {
    let value = config.get_double("backtest", "initial_capital", 10_000.0);
    if value <= 0.0 {
        return Err(ScalplabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_per_trade(config: &dyn ConfigPort) -> Result<(), ScalplabError> {
    let value = config.get_double("backtest", "risk_per_trade", 0.015);
    if value <= 0.0 || value > 1.0 {
        return Err(ScalplabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_per_trade".to_string(),
            reason: "risk_per_trade must be a fraction in (0, 1]".to_string(),
        });
    }
    Ok(())
}

fn validate_fee(config: &dyn ConfigPort) -> Result<(), ScalplabError> {
    let value = config.get_double("backtest", "fee_percent", 0.0004);
    if value < 0.0 {
        return Err(ScalplabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "fee_percent".to_string(),
            reason: "fee_percent must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_slippage(config: &dyn ConfigPort) -> Result<(), ScalplabError> {
    let value = config.get_double("backtest", "slippage_percent", 0.0005);
    if value < 0.0 {
        return Err(ScalplabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "slippage_percent".to_string(),
            reason: "slippage_percent must be non-negative".to_string(),
        });
    }
    Ok(())
}
