//! CSV trade log export: one flat record per closed trade.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::ScalplabError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvTradeLogAdapter;

impl ReportPort for CsvTradeLogAdapter {
    fn write_report(&self, result: &BacktestResult, path: &Path) -> Result<(), ScalplabError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| ScalplabError::Report {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        wtr.write_record([
            "entry_time",
            "exit_time",
            "symbol",
            "side",
            "entry_price",
            "exit_price",
            "stop_loss",
            "tp1",
            "tp2",
            "tp3",
            "position_size",
            "fees",
            "pnl",
            "pnl_percent",
            "r_multiple",
            "exit_reason",
        ])
        .map_err(|e| ScalplabError::Report {
            reason: format!("CSV write error: {}", e),
        })?;

        for trade in &result.trades {
            wtr.write_record([
                trade.entry_time.to_rfc3339(),
                trade.exit_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
                trade.symbol.clone(),
                trade.side.to_string(),
                format!("{:.8}", trade.entry_price),
                trade
                    .exit_price
                    .map(|p| format!("{:.8}", p))
                    .unwrap_or_default(),
                format!("{:.8}", trade.stop_loss),
                format!("{:.8}", trade.take_profits[0]),
                format!("{:.8}", trade.take_profits[1]),
                format!("{:.8}", trade.take_profits[2]),
                format!("{:.8}", trade.position_size),
                format!("{:.8}", trade.fees),
                format!("{:.8}", trade.pnl),
                format!("{:.4}", trade.pnl_percent),
                format!("{:.4}", trade.r_multiple),
                trade
                    .exit_reason
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
            ])
            .map_err(|e| ScalplabError::Report {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionModel;
    use crate::domain::signal::{Side, SignalProposal};
    use crate::domain::stats::Statistics;
    use crate::domain::trade::ExitReason;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn result_with_one_trade() -> BacktestResult {
        let model = ExecutionModel::new(0.0, 0.0);
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let proposal = SignalProposal {
            side: Side::Long,
            entry_price: 100.0,
            stop_loss: 98.0,
            take_profits: [103.0, 105.0, 107.0],
            confirmation_count: 5,
            checks: vec![],
        };
        let mut trade = model.enter(ts, "BTCUSDT", &proposal, 10_000.0, 0.01).unwrap();
        model.close(&mut trade, 103.0, ts, ExitReason::TakeProfit(1));

        let equity = vec![10_000.0, 10_150.0];
        BacktestResult {
            symbol: "BTCUSDT".into(),
            timeframe: "5m".into(),
            start_time: Some(ts),
            end_time: Some(ts),
            initial_capital: 10_000.0,
            final_capital: 10_150.0,
            stats: Statistics::compute(std::slice::from_ref(&trade), &equity, 10_000.0),
            equity_curve: equity.clone(),
            equity_times: vec![ts],
            drawdown_curve: vec![0.0, 0.0],
            trades: vec![trade],
        }
    }

    #[test]
    fn writes_header_and_trades() {
        let result = result_with_one_trade();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");

        CsvTradeLogAdapter.write_report(&result, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("entry_time,exit_time,symbol,side"));
        assert!(lines[1].contains("BTCUSDT"));
        assert!(lines[1].contains("LONG"));
        assert!(lines[1].contains("TP1"));
    }

    #[test]
    fn empty_run_writes_header_only() {
        let mut result = result_with_one_trade();
        result.trades.clear();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        CsvTradeLogAdapter.write_report(&result, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
