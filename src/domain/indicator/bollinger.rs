//! Bollinger Bands.
//!
//! Middle: SMA over n closes. Upper/lower: middle ± multiplier × stddev,
//! where stddev is the sample standard deviation (divides by n-1).
//! Warmup: NaN for the first (n-1) bars; a period of 1 leaves the bands
//! undefined (zero degrees of freedom).

use crate::domain::bar::Bar;

#[derive(Debug, Clone, Copy)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerPoint {
    const NAN: BollingerPoint = BollingerPoint {
        upper: f64::NAN,
        middle: f64::NAN,
        lower: f64::NAN,
    };
}

pub fn calculate_bollinger(bars: &[Bar], period: usize, multiplier: f64) -> Vec<BollingerPoint> {
    let mut values = vec![BollingerPoint::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        let middle: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;

        if period < 2 {
            values[i] = BollingerPoint {
                upper: f64::NAN,
                middle,
                lower: f64::NAN,
            };
            continue;
        }

        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - middle;
                diff * diff
            })
            .sum::<f64>()
            / (period - 1) as f64;
        let stddev = variance.sqrt();

        values[i] = BollingerPoint {
            upper: middle + multiplier * stddev,
            middle,
            lower: middle - multiplier * stddev,
        };
    }

    values
}
