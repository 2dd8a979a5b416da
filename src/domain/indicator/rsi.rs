//! Relative Strength Index.
//!
//! Average gain and average loss are simple rolling means over the last n
//! close-to-close changes (not the recursive Wilder smoothing):
//!
//!   RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! If avg_loss == 0: RSI = 100.
//! Warmup: NaN until n changes have accumulated (the first n bars).

use crate::domain::bar::Bar;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() <= period {
        return values;
    }

    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());
    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    // gains[j] is the change into bar j+1; bar i has i changes behind it.
    for i in period..bars.len() {
        let window_start = i - period;
        let avg_gain: f64 = gains[window_start..i].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[window_start..i].iter().sum::<f64>() / period as f64;

        values[i] = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
    }

    values
}
