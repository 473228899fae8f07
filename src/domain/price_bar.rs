//! Daily price bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One trading day. Absent numeric fields are carried as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    #[serde(deserialize_with = "nullable_f64")]
    pub open: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub high: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub low: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub close: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub volume: f64,
}

/// Close prices in bar order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// `true` if every date is strictly later than the one before it.
pub fn is_strictly_increasing(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}

pub(crate) fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
