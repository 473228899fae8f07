//! Configuration validation.
//!
//! Validates the `[data]` and `[features]` sections before any bars are read.

use crate::domain::error::StockcastError;
use crate::domain::features::FeatureSet;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    data_dir(config)?;
    date_range(config)?;
    feature_set(config)?;
    Ok(())
}

/// `[data] dir`, required.
pub fn data_dir(config: &dyn ConfigPort) -> Result<PathBuf, StockcastError> {
    match config.get_string("data", "dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir.trim())),
        _ => Err(StockcastError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

/// Optional inclusive `[data] start_date` / `end_date` bounds.
pub fn date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), StockcastError> {
    let start = config.get_date("data", "start_date")?;
    let end = config.get_date("data", "end_date")?;
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(StockcastError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be on or before end_date".to_string(),
            });
        }
    }
    Ok((start, end))
}

/// `[features] indicators`, or the default set when the key is absent.
pub fn feature_set(config: &dyn ConfigPort) -> Result<FeatureSet, StockcastError> {
    match config.get_string("features", "indicators") {
        None => Ok(FeatureSet::default()),
        Some(list) => FeatureSet::parse(&list).map_err(|e| StockcastError::ConfigInvalid {
            section: "features".to_string(),
            key: "indicators".to_string(),
            reason: e.to_string(),
        }),
    }
}
