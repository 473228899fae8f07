//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are absent.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::rolling::{resync_due, RollingSum};
use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::{
    check_window, IndicatorValue, Series, DEFAULT_BOLLINGER_MULT_X100, DEFAULT_BOLLINGER_PERIOD,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BollingerSeries {
    pub(crate) fn joined(&self) -> Vec<Option<IndicatorValue>> {
        self.upper
            .iter()
            .zip(&self.middle)
            .zip(&self.lower)
            .map(|((upper, middle), lower)| {
                Some(IndicatorValue::Bollinger {
                    upper: (*upper)?,
                    middle: (*middle)?,
                    lower: (*lower)?,
                })
            })
            .collect()
    }
}

pub fn bollinger(
    closes: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<BollingerSeries, IndicatorError> {
    check_window("BOLLINGER", period, closes.len())?;
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(IndicatorError::InvalidMultiplier { multiplier });
    }
    Ok(bollinger_values(closes, period, multiplier))
}

pub fn bollinger_default(closes: &[f64]) -> Result<BollingerSeries, IndicatorError> {
    bollinger(
        closes,
        DEFAULT_BOLLINGER_PERIOD,
        DEFAULT_BOLLINGER_MULT_X100 as f64 / 100.0,
    )
}

pub(crate) fn bollinger_values(closes: &[f64], period: usize, multiplier: f64) -> BollingerSeries {
    let middle = sma_values(closes, period);
    let mut upper = vec![None; closes.len()];
    let mut lower = vec![None; closes.len()];
    if period == 0 {
        return BollingerSeries {
            upper,
            middle,
            lower,
        };
    }

    let mut acc = RollingSum::for_values(closes);

    for (i, &close) in closes.iter().enumerate() {
        if i >= period {
            acc.pop(closes[i - period]);
        }
        acc.push(close);
        if resync_due(i, period) {
            acc.resync(closes[i + 1 - period..=i].iter().copied());
        }

        if let Some(mid) = middle[i] {
            let width = multiplier * acc.variance(period).sqrt();
            upper[i] = Some(mid + width);
            lower[i] = Some(mid - width);
        }
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}
