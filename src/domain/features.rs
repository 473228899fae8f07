//! Feature assembly: merges price bars and indicator series into per-day
//! records for the prediction consumer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::error::{IndicatorError, StockcastError};
use crate::domain::indicator::{IndicatorSeries, IndicatorType, OverlayValue};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::price_bar::{closes, nullable_f64, PriceBar};

/// One dated row of raw and derived values. Indicator columns are flattened
/// into the record under their feature keys (`sma5`, `macdSignal`, ...).
/// A non-finite close or volume is written as `null` and read back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub date: NaiveDate,
    #[serde(deserialize_with = "nullable_f64")]
    pub close: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub volume: f64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl FeatureRecord {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Body handed to the prediction backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symbol: String,
    pub features: Vec<FeatureRecord>,
}

/// One chart overlay point; `value` is `null` until the indicator is available.
/// MACD components that are not yet defined serialize as `null` inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub date: NaiveDate,
    pub value: Option<OverlayValue>,
}

/// The configured indicator set, validated and free of duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    indicators: Vec<IndicatorType>,
}

impl Default for FeatureSet {
    /// SMA(5), SMA(20), RSI(14), MACD(12,26,9), BOLLINGER(20,2).
    fn default() -> Self {
        Self {
            indicators: vec![
                IndicatorType::Sma(5),
                IndicatorType::Sma(20),
                IndicatorType::Rsi(14),
                IndicatorType::macd_default(),
                IndicatorType::bollinger_default(),
            ],
        }
    }
}

impl FeatureSet {
    pub fn new<I>(indicators: I) -> Result<Self, IndicatorError>
    where
        I: IntoIterator<Item = IndicatorType>,
    {
        let mut unique: Vec<IndicatorType> = Vec::new();
        for indicator in indicators {
            indicator.validate()?;
            if !unique.contains(&indicator) {
                unique.push(indicator);
            }
        }
        Ok(Self { indicators: unique })
    }

    /// Parses a comma-separated list such as `SMA(5), MACD(12,26,9), RSI`.
    pub fn parse(list: &str) -> Result<Self, StockcastError> {
        let indicators = split_indicator_list(list)
            .into_iter()
            .map(str::parse::<IndicatorType>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(indicators)?)
    }

    pub fn indicators(&self) -> &[IndicatorType] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Largest warm-up among the configured indicators (0 when empty).
    pub fn warmup_offset(&self) -> usize {
        self.indicators
            .iter()
            .map(IndicatorType::warmup)
            .max()
            .unwrap_or(0)
    }
}

/// Splits on commas that are not inside parentheses.
fn split_indicator_list(list: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&list[start..]);

    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Emits a record for every index at which all `series` are defined.
///
/// Pure merge: nothing is recomputed or validated, and an index where any
/// series is absent is dropped entirely.
pub fn assemble_features(bars: &[PriceBar], series: &[IndicatorSeries]) -> Vec<FeatureRecord> {
    let keys: Vec<String> = series
        .iter()
        .map(|s| s.indicator_type.feature_key())
        .collect();

    bars.iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let mut values = BTreeMap::new();
            for (s, key) in series.iter().zip(&keys) {
                let value = s.values.get(i).copied().flatten()?;
                for (suffix, v) in value.components() {
                    values.insert(format!("{}{}", key, suffix), v);
                }
            }
            Some(FeatureRecord {
                date: bar.date,
                close: bar.close,
                volume: bar.volume,
                values,
            })
        })
        .collect()
}

/// Computes the configured indicators over `bars` and assembles the records.
pub fn build_features(bars: &[PriceBar], set: &FeatureSet) -> Vec<FeatureRecord> {
    let closes = closes(bars);
    let series = compute_indicators(&closes, set.indicators());
    let records = assemble_features(bars, &series);

    debug!(
        bars = bars.len(),
        indicators = set.len(),
        warmup = set.warmup_offset(),
        records = records.len(),
        "assembled feature records"
    );

    records
}

/// One overlay point per bar for a single indicator.
pub fn overlay(bars: &[PriceBar], indicator: &IndicatorType) -> Vec<OverlayPoint> {
    let values = indicator.overlay_values(&closes(bars));
    bars.iter()
        .zip(values)
        .map(|(bar, value)| OverlayPoint {
            date: bar.date,
            value,
        })
        .collect()
}
