//! Simulated trade record and its single Open -> Closed transition.

use crate::domain::signal::Side;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Why a trade left the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitReason {
    StopLoss,
    /// Which ladder level filled (1-based).
    TakeProfit(u8),
    /// Forced close on the last bar of the series.
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOP_LOSS"),
            ExitReason::TakeProfit(level) => write!(f, "TP{}", level),
            ExitReason::EndOfData => write!(f, "END_OF_DATA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeStatus {
    Open,
    Closed,
}

/// One simulated position, owned by a single backtest run.
///
/// Created in Open state on entry; `close` mutates it exactly once, after
/// which it is never touched again. No partial fills.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedTrade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub symbol: String,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub stop_loss: f64,
    pub take_profits: [f64; 3],
    pub position_size: f64,
    /// Dollar risk taken at entry (capital at entry x risk fraction).
    /// Anchors the R-multiple to entry-time capital.
    pub risk_amount: f64,
    pub fees: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub r_multiple: f64,
    pub exit_reason: Option<ExitReason>,
    pub status: TradeStatus,
}

impl SimulatedTrade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn is_win(&self) -> bool {
        self.status == TradeStatus::Closed && self.pnl > 0.0
    }
}
