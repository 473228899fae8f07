//! Shared helpers for computing a configured set of indicators.

use rayon::prelude::*;

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Computes every indicator over the same read-only closes.
///
/// Indicators run in parallel; the result keeps the order of `types`.
pub fn compute_indicators(closes: &[f64], types: &[IndicatorType]) -> Vec<IndicatorSeries> {
    types.par_iter().map(|t| t.compute(closes)).collect()
}
