//! Rolling mean of traded volume, used as the baseline for the volume
//! confirmation filters.

use crate::domain::bar::Bar;

pub fn calculate_volume_ma(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        values[i] = window.iter().map(|b| b.volume).sum::<f64>() / period as f64;
    }

    values
}
