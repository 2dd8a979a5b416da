//! Trade lifecycle: risk-based sizing, slippage and fee application,
//! per-bar exit resolution, P&L realization.
//!
//! Fees and slippage are fractions (0.0004 = 0.04%), matching exchange
//! taker-fee conventions. Slippage always moves the fill against the
//! trader: entries pay more (Long) or receive less (Short), exits the
//! reverse.

use crate::domain::bar::Bar;
use crate::domain::signal::{Side, SignalProposal};
use crate::domain::trade::{ExitReason, SimulatedTrade, TradeStatus};
use chrono::{DateTime, Utc};

/// Position size from fixed-fractional risk: the dollar amount risked is
/// `capital * risk_fraction`, spread over the per-unit distance between
/// entry and stop.
///
/// Returns 0 when the stop sits on or beyond the wrong side of the entry
/// (degenerate setup). Callers must reject a zero size.
pub fn size_position(side: Side, entry: f64, stop: f64, capital: f64, risk_fraction: f64) -> f64 {
    let risk_per_unit = side.sign() * (entry - stop);
    if risk_per_unit <= 0.0 {
        return 0.0;
    }
    capital * risk_fraction / risk_per_unit
}

/// Entry fill price after adverse slippage.
pub fn apply_entry_slippage(side: Side, price: f64, slippage: f64) -> f64 {
    price * (1.0 + side.sign() * slippage)
}

/// Exit fill price after adverse slippage.
pub fn apply_exit_slippage(side: Side, price: f64, slippage: f64) -> f64 {
    price * (1.0 - side.sign() * slippage)
}

/// Applies fees and slippage and walks trades through their lifecycle.
#[derive(Debug, Clone)]
pub struct ExecutionModel {
    pub fee_percent: f64,
    pub slippage_percent: f64,
}

impl ExecutionModel {
    pub fn new(fee_percent: f64, slippage_percent: f64) -> Self {
        Self {
            fee_percent,
            slippage_percent,
        }
    }

    /// Open a trade from a proposal, or None when sizing degenerates
    /// (entry == stop, or the stop on the wrong side). A long replay must
    /// not die on one bad signal, so this is a silent no-op.
    pub fn enter(
        &self,
        time: DateTime<Utc>,
        symbol: &str,
        proposal: &SignalProposal,
        capital: f64,
        risk_fraction: f64,
    ) -> Option<SimulatedTrade> {
        let size = size_position(
            proposal.side,
            proposal.entry_price,
            proposal.stop_loss,
            capital,
            risk_fraction,
        );
        if size <= 0.0 {
            return None;
        }

        let entry_price =
            apply_entry_slippage(proposal.side, proposal.entry_price, self.slippage_percent);
        let entry_fee = size * entry_price * self.fee_percent;

        Some(SimulatedTrade {
            entry_time: time,
            exit_time: None,
            symbol: symbol.to_string(),
            side: proposal.side,
            entry_price,
            exit_price: None,
            stop_loss: proposal.stop_loss,
            take_profits: proposal.take_profits,
            position_size: size,
            risk_amount: capital * risk_fraction,
            fees: entry_fee,
            pnl: 0.0,
            pnl_percent: 0.0,
            r_multiple: 0.0,
            exit_reason: None,
            status: TradeStatus::Open,
        })
    }

    /// Resolve the trade against one bar's range.
    ///
    /// The stop is checked before the take-profit ladder and wins when both
    /// are reachable within the bar. Targets are scanned nearest-first and
    /// the first level reached fills at exactly its price. The intrabar
    /// path is unknowable from OHLC, so this ordering is a modeling
    /// convention, not a fill guarantee.
    pub fn check_exit(&self, trade: &SimulatedTrade, bar: &Bar) -> Option<(f64, ExitReason)> {
        match trade.side {
            Side::Long => {
                if bar.low <= trade.stop_loss {
                    return Some((trade.stop_loss, ExitReason::StopLoss));
                }
                for (i, &tp) in trade.take_profits.iter().enumerate() {
                    if bar.high >= tp {
                        return Some((tp, ExitReason::TakeProfit(i as u8 + 1)));
                    }
                }
            }
            Side::Short => {
                if bar.high >= trade.stop_loss {
                    return Some((trade.stop_loss, ExitReason::StopLoss));
                }
                for (i, &tp) in trade.take_profits.iter().enumerate() {
                    if bar.low <= tp {
                        return Some((tp, ExitReason::TakeProfit(i as u8 + 1)));
                    }
                }
            }
        }
        None
    }

    /// Close the trade at `raw_price`: apply exit slippage and fee, realize
    /// P&L, and transition Open -> Closed. The one and only mutation of a
    /// trade after entry.
    pub fn close(
        &self,
        trade: &mut SimulatedTrade,
        raw_price: f64,
        time: DateTime<Utc>,
        reason: ExitReason,
    ) {
        let exit_price = apply_exit_slippage(trade.side, raw_price, self.slippage_percent);
        let exit_fee = trade.position_size * exit_price * self.fee_percent;

        let gross = trade.side.sign() * (exit_price - trade.entry_price) * trade.position_size;
        let pnl = gross - trade.fees - exit_fee;

        trade.exit_time = Some(time);
        trade.exit_price = Some(exit_price);
        trade.fees += exit_fee;
        trade.pnl = pnl;
        trade.pnl_percent = pnl / (trade.position_size * trade.entry_price) * 100.0;
        trade.r_multiple = if trade.risk_amount > 0.0 {
            pnl / trade.risk_amount
        } else {
            0.0
        };
        trade.exit_reason = Some(reason);
        trade.status = TradeStatus::Closed;
    }
}
