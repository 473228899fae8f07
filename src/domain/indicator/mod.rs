//! Technical indicator implementations.
//!
//! Every indicator maps a price sequence onto a [`Series`] of the same
//! length, where `None` marks an index that does not have enough history
//! (or whose window contains a non-finite price).
//!
//! - [`sma`], [`ema`]: primitive averages over any numeric sequence
//! - [`rsi`], [`macd`], [`bollinger`]: composite indicators over closes
//! - [`IndicatorType`]: indicator identity + parameters (serves as HashMap key)
//! - [`IndicatorSeries`]: the per-index joined form used by the feature assembler
//! - [`OverlayValue`]: the per-index chart form, where MACD components appear
//!   as soon as each one exists

pub mod bollinger;
pub mod ema;
pub mod macd;
pub(crate) mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, bollinger_default, BollingerSeries};
pub use ema::ema;
pub use macd::{macd, macd_default, MacdSeries};
pub use rsi::{rsi, rsi_default};
pub use sma::sma;

use crate::domain::error::{IndicatorError, StockcastError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One value per input index; `None` until the indicator is available.
pub type Series = Vec<Option<f64>>;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_MULT_X100: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

impl IndicatorValue {
    /// Named components, as `(key suffix, value)` pairs.
    pub fn components(&self) -> Vec<(&'static str, f64)> {
        match *self {
            IndicatorValue::Simple(v) => vec![("", v)],
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => vec![("", line), ("Signal", signal), ("Histogram", histogram)],
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => vec![("Upper", upper), ("Middle", middle), ("Lower", lower)],
        }
    }
}

/// Chart payload for one index. Unlike [`IndicatorValue`], the MACD signal
/// and histogram may be missing while the line is already defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OverlayValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: Option<f64>,
        histogram: Option<f64>,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

impl From<IndicatorValue> for OverlayValue {
    fn from(value: IndicatorValue) -> Self {
        match value {
            IndicatorValue::Simple(v) => OverlayValue::Simple(v),
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => OverlayValue::Macd {
                line,
                signal: Some(signal),
                histogram: Some(histogram),
            },
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => OverlayValue::Bollinger {
                upper,
                middle,
                lower,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<IndicatorValue>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

/// Index of the first available value, if any.
pub fn first_defined(series: &[Option<f64>]) -> Option<usize> {
    series.iter().position(Option::is_some)
}

/// Rejects a zero window, or a window longer than a non-empty input.
pub(crate) fn check_window(
    indicator: &'static str,
    window: usize,
    len: usize,
) -> Result<(), IndicatorError> {
    if window == 0 || (len > 0 && window > len) {
        return Err(IndicatorError::InvalidWindow {
            indicator,
            window,
            len,
        });
    }
    Ok(())
}

impl IndicatorType {
    pub fn macd_default() -> Self {
        IndicatorType::Macd {
            fast: macd::DEFAULT_FAST,
            slow: macd::DEFAULT_SLOW,
            signal: macd::DEFAULT_SIGNAL,
        }
    }

    pub fn bollinger_default() -> Self {
        IndicatorType::Bollinger {
            period: DEFAULT_BOLLINGER_PERIOD,
            stddev_mult_x100: DEFAULT_BOLLINGER_MULT_X100,
        }
    }

    fn multiplier(stddev_mult_x100: u32) -> f64 {
        stddev_mult_x100 as f64 / 100.0
    }

    /// Parameter checks that do not depend on the input length.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let windows: Vec<(&'static str, usize)> = match *self {
            IndicatorType::Sma(p) => vec![("SMA", p)],
            IndicatorType::Ema(p) => vec![("EMA", p)],
            IndicatorType::Rsi(p) => vec![("RSI", p)],
            IndicatorType::Macd { fast, slow, signal } => vec![
                ("MACD fast", fast),
                ("MACD slow", slow),
                ("MACD signal", signal),
            ],
            IndicatorType::Bollinger { period, .. } => vec![("BOLLINGER", period)],
        };
        for (indicator, window) in windows {
            if window == 0 {
                return Err(IndicatorError::InvalidWindow {
                    indicator,
                    window,
                    len: 0,
                });
            }
        }
        Ok(())
    }

    /// First index at which the joined series is defined for finite input.
    pub fn warmup(&self) -> usize {
        match *self {
            IndicatorType::Sma(p) | IndicatorType::Ema(p) => p.saturating_sub(1),
            IndicatorType::Bollinger { period, .. } => period.saturating_sub(1),
            IndicatorType::Rsi(p) => p,
            IndicatorType::Macd { fast, slow, signal } => {
                fast.max(slow).saturating_sub(1) + signal.saturating_sub(1)
            }
        }
    }

    /// Base key used for this indicator's feature columns.
    pub fn feature_key(&self) -> String {
        match *self {
            IndicatorType::Sma(p) => format!("sma{}", p),
            IndicatorType::Ema(p) => format!("ema{}", p),
            IndicatorType::Rsi(p) => format!("rsi{}", p),
            IndicatorType::Macd { fast, slow, signal } => {
                if *self == Self::macd_default() {
                    "macd".to_string()
                } else {
                    format!("macd{}_{}_{}", fast, slow, signal)
                }
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                if *self == Self::bollinger_default() {
                    "bollinger".to_string()
                } else {
                    format!("bollinger{}_{}", period, Self::multiplier(stddev_mult_x100))
                }
            }
        }
    }

    /// Computes the joined series over `closes`.
    ///
    /// Never fails: insufficient history just leaves every index absent.
    /// Parameters are expected to have passed [`IndicatorType::validate`].
    pub fn compute(&self, closes: &[f64]) -> IndicatorSeries {
        let values = match *self {
            IndicatorType::Sma(p) => simple(sma::sma_values(closes, p)),
            IndicatorType::Ema(p) => simple(ema::ema_values(closes, p)),
            IndicatorType::Rsi(p) => simple(rsi::rsi_values(closes, p)),
            IndicatorType::Macd { fast, slow, signal } => {
                macd::macd_values(closes, fast, slow, signal).joined()
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => bollinger::bollinger_values(closes, period, Self::multiplier(stddev_mult_x100))
                .joined(),
        };

        IndicatorSeries {
            indicator_type: *self,
            values,
        }
    }

    /// Computes the chart form over `closes`: one entry per index, present
    /// as soon as the indicator's leading component is.
    pub fn overlay_values(&self, closes: &[f64]) -> Vec<Option<OverlayValue>> {
        match *self {
            IndicatorType::Macd { fast, slow, signal } => {
                macd::macd_values(closes, fast, slow, signal).partial()
            }
            _ => self
                .compute(closes)
                .values
                .into_iter()
                .map(|v| v.map(OverlayValue::from))
                .collect(),
        }
    }
}

/// Converts a multiplier to hundredths, refusing anything that would not
/// survive the conversion unchanged.
fn multiplier_x100(mult: f64) -> Result<u32, &'static str> {
    if !mult.is_finite() || mult < 0.0 {
        return Err("multiplier must be a non-negative number");
    }
    let x100 = mult * 100.0;
    let rounded = x100.round();
    if rounded > u32::MAX as f64 {
        return Err("multiplier is too large");
    }
    // Decimal inputs such as 1.15 land a few ulps off the integer.
    if (x100 - rounded).abs() > 1e-6 {
        return Err("multiplier must be a multiple of 0.01");
    }
    Ok(rounded as u32)
}

fn simple(series: Series) -> Vec<Option<IndicatorValue>> {
    series
        .into_iter()
        .map(|v| v.map(IndicatorValue::Simple))
        .collect()
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                write!(
                    f,
                    "BOLLINGER({},{})",
                    period,
                    Self::multiplier(*stddev_mult_x100)
                )
            }
        }
    }
}

impl FromStr for IndicatorType {
    type Err = StockcastError;

    /// Parses the `Display` form, e.g. `SMA(20)`, `MACD(12,26,9)`, `RSI`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parse_err = |reason: &str| StockcastError::IndicatorParse {
            input: text.to_string(),
            reason: reason.to_string(),
        };

        let (name, args) = match text.find('(') {
            Some(open) => {
                if !text.ends_with(')') {
                    return Err(parse_err("missing closing parenthesis"));
                }
                (&text[..open], &text[open + 1..text.len() - 1])
            }
            None => (text, ""),
        };
        let args: Vec<&str> = if args.trim().is_empty() {
            Vec::new()
        } else {
            args.split(',').map(str::trim).collect()
        };

        let period = |arg: &str| -> Result<usize, StockcastError> {
            arg.parse::<usize>()
                .map_err(|_| parse_err(&format!("'{}' is not a valid period", arg)))
        };

        match (name.trim().to_ascii_uppercase().as_str(), args.as_slice()) {
            ("SMA", [p]) => Ok(IndicatorType::Sma(period(*p)?)),
            ("EMA", [p]) => Ok(IndicatorType::Ema(period(*p)?)),
            ("RSI", []) => Ok(IndicatorType::Rsi(DEFAULT_RSI_PERIOD)),
            ("RSI", [p]) => Ok(IndicatorType::Rsi(period(*p)?)),
            ("MACD", []) => Ok(Self::macd_default()),
            ("MACD", [fast, slow, signal]) => Ok(IndicatorType::Macd {
                fast: period(*fast)?,
                slow: period(*slow)?,
                signal: period(*signal)?,
            }),
            ("BOLLINGER" | "BB", []) => Ok(Self::bollinger_default()),
            ("BOLLINGER" | "BB", [p]) => Ok(IndicatorType::Bollinger {
                period: period(*p)?,
                stddev_mult_x100: DEFAULT_BOLLINGER_MULT_X100,
            }),
            ("BOLLINGER" | "BB", [p, mult]) => {
                let mult: f64 = mult
                    .parse()
                    .map_err(|_| parse_err(&format!("'{}' is not a valid multiplier", mult)))?;
                Ok(IndicatorType::Bollinger {
                    period: period(*p)?,
                    stddev_mult_x100: multiplier_x100(mult).map_err(parse_err)?,
                })
            }
            ("SMA" | "EMA" | "RSI" | "MACD" | "BOLLINGER" | "BB", _) => {
                Err(parse_err("wrong number of parameters"))
            }
            _ => Err(parse_err("unknown indicator")),
        }
    }
}
