//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first close, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//!
//! Seeded with the first value rather than an SMA warm-up, so every bar has
//! a defined value and early values simply carry less history.

use crate::domain::bar::Bar;

pub fn calculate_ema(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; bars.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(bars.len());
    let mut ema = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        ema = if i == 0 {
            bar.close
        } else {
            bar.close * k + ema * (1.0 - k)
        };
        values.push(ema);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    #[test]
    fn ema_seeded_with_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let values = calculate_ema(&bars, 3);

        assert!((values[0] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let values = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let ema_1 = 20.0 * k + 10.0 * (1.0 - k);
        let ema_2 = 30.0 * k + ema_1 * (1.0 - k);

        assert!((values[1] - ema_1).abs() < f64::EPSILON);
        assert!((values[2] - ema_2).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let values = calculate_ema(&bars, 3);

        for v in values {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_converges_toward_price() {
        let mut prices = vec![100.0];
        prices.extend(std::iter::repeat(200.0).take(49));
        let bars = make_bars(&prices);
        let values = calculate_ema(&bars, 8);

        assert!(values[49] > 199.0);
    }

    #[test]
    fn ema_empty_bars() {
        let values = calculate_ema(&[], 3);
        assert!(values.is_empty());
    }

    #[test]
    fn ema_zero_period_is_nan() {
        let bars = make_bars(&[10.0, 20.0]);
        let values = calculate_ema(&bars, 0);
        assert!(values.iter().all(|v| v.is_nan()));
    }
}
