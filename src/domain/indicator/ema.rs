//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded at index n-1 with the SMA of the first n values,
//! then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are absent.
//!
//! A non-finite input breaks the chain; the average reseeds from the next
//! n consecutive finite values.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{check_window, Series};

pub fn ema(data: &[f64], window: usize) -> Result<Series, IndicatorError> {
    check_window("EMA", window, data.len())?;
    Ok(ema_values(data, window))
}

pub(crate) fn ema_values(data: &[f64], window: usize) -> Series {
    let mut values = Vec::with_capacity(data.len());
    if window == 0 {
        values.resize(data.len(), None);
        return values;
    }

    let k = 2.0 / (window as f64 + 1.0);
    let mut prev: Option<f64> = None;
    let mut run = 0;
    let mut sum = 0.0;

    for &x in data {
        if !x.is_finite() {
            prev = None;
            run = 0;
            sum = 0.0;
            values.push(None);
            continue;
        }

        let current = match prev {
            Some(p) => Some(x * k + p * (1.0 - k)),
            None => {
                run += 1;
                sum += x;
                (run == window).then(|| sum / window as f64)
            }
        };
        prev = current;
        values.push(current);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_warmup() {
        let series = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3).unwrap();

        assert!(series[0].is_none());
        assert!(series[1].is_none());
        assert!(series[2].is_some());
        assert!(series[3].is_some());
        assert!(series[4].is_some());
    }

    #[test]
    fn ema_period_1() {
        let series = ema(&[10.0, 20.0, 30.0], 1).unwrap();
        assert_eq!(series, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_seed_is_sma_at_window_minus_one() {
        let series = ema(&[10.0, 20.0, 30.0], 3).unwrap();

        let expected_sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert_eq!(series[2], Some(expected_sma));
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3).unwrap();

        let k = 2.0 / 4.0;
        let seed = 20.0;
        let ema_3 = 40.0 * k + seed * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert_relative_eq!(series[3].unwrap(), ema_3);
        assert_relative_eq!(series[4].unwrap(), ema_4);
    }

    #[test]
    fn ema_recurrence_uses_previous_output_not_window_offset() {
        // Reading EMA[i - n] instead of EMA[i - 1] diverges from index n+1 on.
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let series = ema(&data, 3).unwrap();
        let k = 0.5;

        let mut expected = 2.0;
        for i in 3..data.len() {
            expected = data[i] * k + expected * (1.0 - k);
            assert_relative_eq!(series[i].unwrap(), expected);
        }
        assert_eq!(series.len(), data.len());
    }

    #[test]
    fn ema_equal_prices() {
        let series = ema(&[100.0; 5], 3).unwrap();
        for v in &series[2..] {
            assert_relative_eq!(v.unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn ema_invalid_windows() {
        assert!(ema(&[10.0, 20.0], 0).is_err());
        assert!(ema(&[10.0, 20.0], 3).is_err());
    }

    #[test]
    fn ema_reseeds_after_nan() {
        let series = ema(&[1.0, 2.0, f64::NAN, 4.0, 6.0, 8.0], 2).unwrap();
        assert_eq!(series[0], None);
        assert_eq!(series[1], Some(1.5));
        assert_eq!(series[2], None);
        assert_eq!(series[3], None);
        assert_eq!(series[4], Some(5.0));
        assert_relative_eq!(
            series[5].unwrap(),
            8.0 * (2.0 / 3.0) + 5.0 / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn ema_smoothing_factor() {
        let period = 10;
        let k = 2.0 / (period as f64 + 1.0);
        assert!((k - 2.0 / 11.0).abs() < f64::EPSILON);
    }
}
