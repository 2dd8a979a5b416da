//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvBarAdapter;
use crate::adapters::csv_report_adapter::CsvTradeLogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{BacktestConfig, Backtester, WARMUP_BARS};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::ScalplabError;
use crate::domain::indicator::compute_frames;
use crate::domain::strategy::build_evaluator;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "scalplab", about = "Crypto scalping strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Override the configured strategy name
        #[arg(long)]
        strategy: Option<String>,
        /// Write the full result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the trade log as CSV
        #[arg(long)]
        trades: Option<PathBuf>,
    },
    /// Validate a configuration without touching data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            strategy,
            output,
            trades,
        } => run_backtest(
            &config,
            symbol.as_deref(),
            strategy.as_deref(),
            output.as_deref(),
            trades.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &std::path::Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScalplabError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Engine parameters from the `[backtest]` section, with the stock
/// defaults filling the gaps.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        ),
        risk_per_trade: adapter.get_double("backtest", "risk_per_trade", defaults.risk_per_trade),
        fee_percent: adapter.get_double("backtest", "fee_percent", defaults.fee_percent),
        slippage_percent: adapter.get_double(
            "backtest",
            "slippage_percent",
            defaults.slippage_percent,
        ),
    }
}

fn build_data_adapter(
    adapter: &dyn ConfigPort,
    timeframe: &str,
) -> Result<CsvBarAdapter, ScalplabError> {
    let csv_dir = adapter
        .get_string("data", "csv_dir")
        .ok_or_else(|| ScalplabError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        })?;
    Ok(CsvBarAdapter::new(PathBuf::from(csv_dir), timeframe))
}

/// Optional `%Y-%m-%d` bound from the config; the whole archive when absent.
fn parse_time_bound(
    adapter: &dyn ConfigPort,
    key: &str,
    fallback: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScalplabError> {
    match adapter.get_string("backtest", key) {
        None => Ok(fallback),
        Some(raw) => {
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ScalplabError::ConfigInvalid {
                    section: "backtest".to_string(),
                    key: key.to_string(),
                    reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
                }
            })?;
            Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
        }
    }
}

fn run_backtest(
    config_path: &std::path::Path,
    symbol_override: Option<&str>,
    strategy_override: Option<&str>,
    output_path: Option<&std::path::Path>,
    trades_path: Option<&std::path::Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if strategy_override.is_none() {
        if let Err(e) = validate_strategy_config(&adapter) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let symbol = match symbol_override {
        Some(s) => s.to_uppercase(),
        None => adapter
            .get_string("backtest", "symbol")
            .unwrap_or_default()
            .to_uppercase(),
    };
    if symbol.trim().is_empty() {
        let err = ScalplabError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }
    let timeframe = adapter
        .get_string("backtest", "timeframe")
        .unwrap_or_else(|| "5m".to_string());

    let strategy_name = match strategy_override {
        Some(s) => s.to_string(),
        None => adapter
            .get_string("strategy", "name")
            .unwrap_or_else(|| "ema-optimized".to_string()),
    };
    let evaluator = match build_evaluator(&strategy_name) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let bt_config = build_backtest_config(&adapter);

    let data_port = match build_data_adapter(&adapter, &timeframe) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let start = match parse_time_bound(&adapter, "start_date", DateTime::<Utc>::MIN_UTC) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let end = match parse_time_bound(&adapter, "end_date", DateTime::<Utc>::MAX_UTC) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Fetching {} {} bars...", symbol, timeframe);
    let bars = match data_port.fetch_bars(&symbol, start, end) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        let err = ScalplabError::NoData { symbol };
        eprintln!("error: {err}");
        return (&err).into();
    }
    if bars.len() <= WARMUP_BARS {
        eprintln!(
            "warning: only {} bars, fewer than the {}-bar warmup; no signals will fire",
            bars.len(),
            WARMUP_BARS
        );
    }

    eprintln!(
        "Running {} on {} bars ({} to {})",
        strategy_name,
        bars.len(),
        bars[0].timestamp,
        bars[bars.len() - 1].timestamp,
    );

    let frames = compute_frames(&bars);
    let mut backtester = Backtester::new(bt_config);
    let result = backtester.run(&frames, &symbol, &timeframe, evaluator.as_ref());

    let stats = &result.stats;
    eprintln!("\n=== Results: {} {} ===", result.symbol, result.timeframe);
    eprintln!(
        "Net Profit:       {:+.2} ({:+.2}%)",
        stats.net_profit, stats.total_return_percent
    );
    eprintln!("Total Trades:     {}", stats.total_trades);
    eprintln!("Win Rate:         {:.1}%", stats.win_rate);
    eprintln!("Profit Factor:    {:.2}", stats.profit_factor);
    eprintln!("Avg R-Multiple:   {:.2}", stats.average_r_multiple);
    eprintln!("Max Drawdown:     -{:.1}%", stats.max_drawdown_percent);
    eprintln!("Sharpe Ratio:     {:.2}", stats.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", stats.sortino_ratio);
    eprintln!("Calmar Ratio:     {:.2}", stats.calmar_ratio);

    if let Some(path) = output_path {
        if let Err(e) = JsonReportAdapter.write_report(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("\nResult written to: {}", path.display());
    }

    if let Some(path) = trades_path {
        if let Err(e) = CsvTradeLogAdapter.write_report(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Trade log written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &std::path::Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy_name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| "ema-optimized".to_string());
    match build_evaluator(&strategy_name) {
        Ok(evaluator) => {
            eprintln!("  strategy: {}", evaluator.name());
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let bt_config = build_backtest_config(&adapter);
    eprintln!("  initial_capital: {}", bt_config.initial_capital);
    eprintln!("  risk_per_trade: {}", bt_config.risk_per_trade);
    eprintln!("  fee_percent: {}", bt_config.fee_percent);
    eprintln!("  slippage_percent: {}", bt_config.slippage_percent);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &std::path::Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let timeframe = adapter
        .get_string("backtest", "timeframe")
        .unwrap_or_else(|| "5m".to_string());
    let data_port = match build_data_adapter(&adapter, &timeframe) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.list_symbols() {
        Ok(symbols) => {
            if symbols.is_empty() {
                eprintln!("No symbols found for timeframe {}", timeframe);
            } else {
                for symbol in &symbols {
                    println!("{}", symbol);
                }
                eprintln!("{} symbols found", symbols.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &std::path::Path, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbol = match symbol_override {
        Some(s) => s.to_uppercase(),
        None => match adapter.get_string("backtest", "symbol") {
            Some(s) => s.to_uppercase(),
            None => {
                eprintln!("error: symbol is required (use --symbol or set in config)");
                return ExitCode::from(2);
            }
        },
    };
    let timeframe = adapter
        .get_string("backtest", "timeframe")
        .unwrap_or_else(|| "5m".to_string());

    let data_port = match build_data_adapter(&adapter, &timeframe) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{} {}: {} bars, {} to {}", symbol, timeframe, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{} {}: no data found", symbol, timeframe);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
