//! Average True Range: simple rolling mean of the true range.
//!
//! The first bar has no previous close, so its true range degrades to
//! high - low. Warmup: NaN until a full window of true ranges exists.

use crate::domain::bar::Bar;

pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.high - bar.low);
        } else {
            tr.push(bar.true_range(bars[i - 1].close));
        }
    }

    for i in (period - 1)..bars.len() {
        let window = &tr[i + 1 - period..=i];
        values[i] = window.iter().sum::<f64>() / period as f64;
    }

    values
}
