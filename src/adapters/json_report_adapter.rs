//! JSON result export: the full run snapshot, equity curves and trade
//! list included, for downstream dashboards.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::ScalplabError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write_report(&self, result: &BacktestResult, path: &Path) -> Result<(), ScalplabError> {
        let json = serde_json::to_string_pretty(result).map_err(|e| ScalplabError::Report {
            reason: format!("JSON serialization failed: {}", e),
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{BacktestConfig, Backtester};
    use crate::domain::strategy::EmaCrossEvaluator;
    use tempfile::TempDir;

    #[test]
    fn writes_parseable_json() {
        let mut backtester = Backtester::new(BacktestConfig::default());
        let result = backtester.run(&[], "BTCUSDT", "5m", &EmaCrossEvaluator::optimized());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        JsonReportAdapter.write_report(&result, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["symbol"], "BTCUSDT");
        assert_eq!(value["stats"]["total_trades"], 0);
        assert_eq!(value["equity_curve"].as_array().unwrap().len(), 1);
    }
}
