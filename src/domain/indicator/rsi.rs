//! RSI (Relative Strength Index) indicator implementation.
//!
//! diff[i] = C[i] - C[i-1]. For i >= n the average gain and average loss are
//! simple means over the trailing n diffs ending at i (running sums, no Wilder
//! smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, including a flat window where avg_gain is 0 too.
//!
//! Warmup: first n values are absent (n diffs need n+1 closes).

use crate::domain::error::IndicatorError;
use crate::domain::indicator::rolling::{resync_due, RollingSum};
use crate::domain::indicator::{check_window, Series, DEFAULT_RSI_PERIOD};

pub fn rsi(closes: &[f64], window: usize) -> Result<Series, IndicatorError> {
    check_window("RSI", window, closes.len())?;
    Ok(rsi_values(closes, window))
}

pub fn rsi_default(closes: &[f64]) -> Result<Series, IndicatorError> {
    rsi(closes, DEFAULT_RSI_PERIOD)
}

/// Gain and loss components of the change into `closes[i]`; NaN when either
/// close is non-finite.
fn gain_loss(closes: &[f64], i: usize) -> (f64, f64) {
    let change = closes[i] - closes[i - 1];
    if !change.is_finite() {
        return (f64::NAN, f64::NAN);
    }
    (change.max(0.0), (-change).max(0.0))
}

pub(crate) fn rsi_values(closes: &[f64], window: usize) -> Series {
    let mut values = vec![None; closes.len()];
    if window == 0 || closes.len() < 2 {
        return values;
    }

    let mut gains = RollingSum::new(0.0);
    let mut losses = RollingSum::new(0.0);

    for i in 1..closes.len() {
        if i > window {
            let (gain, loss) = gain_loss(closes, i - window);
            gains.pop(gain);
            losses.pop(loss);
        }
        let (gain, loss) = gain_loss(closes, i);
        gains.push(gain);
        losses.push(loss);
        if resync_due(i, window) {
            let diffs = i + 1 - window..=i;
            gains.resync(diffs.clone().map(|j| gain_loss(closes, j).0));
            losses.resync(diffs.map(|j| gain_loss(closes, j).1));
        }

        if i >= window && gains.is_clean() {
            let avg_gain = gains.mean(window).max(0.0);
            let avg_loss = losses.mean(window).max(0.0);
            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
            };
            values[i] = Some(rsi.clamp(0.0, 100.0));
        }
    }

    values
}
