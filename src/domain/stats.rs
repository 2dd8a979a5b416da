//! Performance statistics over a finished run.
//!
//! Every ratio here is a total function: degenerate inputs (no trades, no
//! losses, zero variance, zero drawdown) resolve to 0 instead of raising.
//! A report must always be producible, however uninteresting the run.

use crate::domain::trade::SimulatedTrade;
use serde::Serialize;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    /// Percent of trades with positive P&L.
    pub win_rate: f64,
    pub gross_profit: f64,
    /// Positive magnitude of summed losses.
    pub gross_loss: f64,
    pub net_profit: f64,
    pub total_return_percent: f64,
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub average_r_multiple: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub average_trade_duration_minutes: f64,
    /// Deepest peak-to-trough decline in currency.
    pub max_drawdown: f64,
    /// Deepest peak-to-trough decline as percent of the peak.
    pub max_drawdown_percent: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
}

impl Statistics {
    pub fn compute(
        trades: &[SimulatedTrade],
        equity_curve: &[f64],
        initial_capital: f64,
    ) -> Self {
        let total_trades = trades.len();
        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut breakeven_trades = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut r_sum = 0.0_f64;
        let mut duration_minutes = 0.0_f64;

        for trade in trades {
            let pnl = trade.pnl;
            if pnl > 0.0 {
                winning_trades += 1;
                gross_profit += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                losing_trades += 1;
                gross_loss += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                breakeven_trades += 1;
            }
            r_sum += trade.r_multiple;
            if let Some(exit_time) = trade.exit_time {
                duration_minutes += (exit_time - trade.entry_time).num_seconds() as f64 / 60.0;
            }
        }

        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else {
            0.0
        };
        let average_win = if winning_trades > 0 {
            gross_profit / winning_trades as f64
        } else {
            0.0
        };
        let average_loss = if losing_trades > 0 {
            gross_loss / losing_trades as f64
        } else {
            0.0
        };
        let average_r_multiple = if total_trades > 0 {
            r_sum / total_trades as f64
        } else {
            0.0
        };
        let average_trade_duration_minutes = if total_trades > 0 {
            duration_minutes / total_trades as f64
        } else {
            0.0
        };

        let final_equity = equity_curve.last().copied().unwrap_or(initial_capital);
        let net_profit = final_equity - initial_capital;
        let total_return_percent = if initial_capital > 0.0 {
            net_profit / initial_capital * 100.0
        } else {
            0.0
        };

        let drawdowns = drawdown_curve(equity_curve);
        let max_drawdown_percent = drawdowns.iter().cloned().fold(0.0_f64, f64::max);
        let max_drawdown = max_absolute_drawdown(equity_curve);

        let (sharpe_ratio, sortino_ratio) = risk_adjusted_ratios(equity_curve);

        let calmar_ratio = if max_drawdown_percent > 0.0 {
            total_return_percent / max_drawdown_percent
        } else {
            0.0
        };

        Statistics {
            total_trades,
            winning_trades,
            losing_trades,
            breakeven_trades,
            win_rate,
            gross_profit,
            gross_loss,
            net_profit,
            total_return_percent,
            profit_factor,
            average_win,
            average_loss,
            average_r_multiple,
            largest_win,
            largest_loss,
            average_trade_duration_minutes,
            max_drawdown,
            max_drawdown_percent,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
        }
    }
}

/// Percent decline from the running peak at every equity point. Zero while
/// equity sits at a fresh high.
pub fn drawdown_curve(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve
        .iter()
        .map(|&equity| {
            peak = peak.max(equity);
            if peak > 0.0 {
                (peak - equity) / peak * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

fn max_absolute_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &equity in equity_curve {
        peak = peak.max(equity);
        max_dd = max_dd.max(peak - equity);
    }
    max_dd
}

/// Sharpe and Sortino over bar-to-bar equity returns, annualized by √252.
/// Population standard deviation; the Sortino denominator is the deviation
/// of the negative returns only.
fn risk_adjusted_ratios(equity_curve: &[f64]) -> (f64, f64) {
    if equity_curve.len() < 3 {
        // Fewer than 2 return samples.
        return (0.0, 0.0);
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let sharpe = if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let sortino = if negative.is_empty() {
        0.0
    } else {
        let n_neg = negative.len() as f64;
        let neg_mean = negative.iter().sum::<f64>() / n_neg;
        let neg_var = negative.iter().map(|r| (r - neg_mean).powi(2)).sum::<f64>() / n_neg;
        let neg_std = neg_var.sqrt();
        if neg_std > 0.0 {
            mean / neg_std * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        }
    };

    (sharpe, sortino)
}
