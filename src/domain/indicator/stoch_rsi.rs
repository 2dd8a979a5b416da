//! Stochastic RSI: the RSI normalized against its own rolling range,
//! scaled 0-100, with %K/%D smoothing lines.
//!
//!   stoch_rsi = (RSI - min(RSI, n)) / (max(RSI, n) - min(RSI, n)) × 100
//!   %K = SMA(stoch_rsi, k)
//!   %D = SMA(%K, d)
//!
//! A flat RSI window (max == min) resolves to 50 rather than dividing by
//! zero. Each stage stays NaN until its own window is fully populated.

#[derive(Debug, Clone, Copy)]
pub struct StochRsiPoint {
    pub value: f64,
    pub k: f64,
    pub d: f64,
}

pub fn calculate_stoch_rsi(
    rsi: &[f64],
    stoch_period: usize,
    k_period: usize,
    d_period: usize,
) -> Vec<StochRsiPoint> {
    let nan_point = StochRsiPoint {
        value: f64::NAN,
        k: f64::NAN,
        d: f64::NAN,
    };
    let mut values = vec![nan_point; rsi.len()];
    if stoch_period == 0 || rsi.len() < stoch_period {
        return values;
    }

    let stoch: Vec<f64> = (0..rsi.len())
        .map(|i| {
            if i + 1 < stoch_period {
                return f64::NAN;
            }
            let window = &rsi[i + 1 - stoch_period..=i];
            if window.iter().any(|v| v.is_nan()) {
                return f64::NAN;
            }
            let min = window.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if max == min {
                50.0
            } else {
                (rsi[i] - min) / (max - min) * 100.0
            }
        })
        .collect();

    let k = rolling_mean(&stoch, k_period);
    let d = rolling_mean(&k, d_period);

    for i in 0..rsi.len() {
        values[i] = StochRsiPoint {
            value: stoch[i],
            k: k[i],
            d: d[i],
        };
    }

    values
}

/// Rolling mean that stays NaN until the window holds no NaN values.
fn rolling_mean(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; series.len()];
    }
    (0..series.len())
        .map(|i| {
            if i + 1 < period {
                return f64::NAN;
            }
            let window = &series[i + 1 - period..=i];
            if window.iter().any(|v| v.is_nan()) {
                f64::NAN
            } else {
                window.iter().sum::<f64>() / period as f64
            }
        })
        .collect()
}
