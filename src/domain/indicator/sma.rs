//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(x[i-n+1..=i]), computed with a running sum.
//! Warmup: first (n-1) values are absent.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::rolling::{resync_due, RollingSum};
use crate::domain::indicator::{check_window, Series};

pub fn sma(data: &[f64], window: usize) -> Result<Series, IndicatorError> {
    check_window("SMA", window, data.len())?;
    Ok(sma_values(data, window))
}

pub(crate) fn sma_values(data: &[f64], window: usize) -> Series {
    if window == 0 {
        return vec![None; data.len()];
    }

    let mut values = Vec::with_capacity(data.len());
    let mut acc = RollingSum::for_values(data);

    for (i, &x) in data.iter().enumerate() {
        if i >= window {
            acc.pop(data[i - window]);
        }
        acc.push(x);
        if resync_due(i, window) {
            acc.resync(data[i + 1 - window..=i].iter().copied());
        }

        if i + 1 >= window && acc.is_clean() {
            values.push(Some(acc.mean(window)));
        } else {
            values.push(None);
        }
    }

    values
}
