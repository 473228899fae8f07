//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the MACD Line, run from the line's first index
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: line from max(fast, slow) - 1, signal and histogram from
//! max(fast, slow) - 1 + signal - 1 (index 25 and 33 for defaults).

use crate::domain::error::IndicatorError;
use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{check_window, IndicatorValue, OverlayValue, Series};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl MacdSeries {
    /// Per-index value, present only where all three lines are defined.
    pub(crate) fn joined(&self) -> Vec<Option<IndicatorValue>> {
        self.line
            .iter()
            .zip(&self.signal)
            .zip(&self.histogram)
            .map(|((line, signal), histogram)| match (line, signal, histogram) {
                (Some(line), Some(signal), Some(histogram)) => Some(IndicatorValue::Macd {
                    line: *line,
                    signal: *signal,
                    histogram: *histogram,
                }),
                _ => None,
            })
            .collect()
    }

    /// Per-index value wherever the line is defined; signal and histogram
    /// stay `None` until they catch up.
    pub(crate) fn partial(&self) -> Vec<Option<OverlayValue>> {
        self.line
            .iter()
            .zip(&self.signal)
            .zip(&self.histogram)
            .map(|((line, signal), histogram)| {
                line.map(|line| OverlayValue::Macd {
                    line,
                    signal: *signal,
                    histogram: *histogram,
                })
            })
            .collect()
    }
}

pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries, IndicatorError> {
    check_window("MACD fast", fast, closes.len())?;
    check_window("MACD slow", slow, closes.len())?;
    check_window("MACD signal", signal_period, closes.len())?;
    Ok(macd_values(closes, fast, slow, signal_period))
}

pub fn macd_default(closes: &[f64]) -> Result<MacdSeries, IndicatorError> {
    macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

pub(crate) fn macd_values(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let ema_fast = ema_values(closes, fast);
    let ema_slow = ema_values(closes, slow);

    let line: Series = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    // The signal EMA runs over the line from its first possible index and is
    // shifted back onto the input timeline by that offset.
    let start = fast.max(slow).saturating_sub(1);
    let mut signal: Series = vec![None; closes.len()];
    if start < closes.len() {
        let tail: Vec<f64> = line[start..]
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        for (offset, value) in ema_values(&tail, signal_period).into_iter().enumerate() {
            signal[start + offset] = value;
        }
    }

    let histogram: Series = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
