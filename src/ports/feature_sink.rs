//! Output port for the engine's consumers.

use std::path::Path;

use crate::domain::error::StockcastError;
use crate::domain::features::{OverlayPoint, PredictionRequest};

/// Port for handing feature records and chart overlays to their consumers.
/// A `None` path means standard output.
pub trait FeatureSink {
    fn write_request(
        &self,
        request: &PredictionRequest,
        output_path: Option<&Path>,
    ) -> Result<(), StockcastError>;

    fn write_overlay(
        &self,
        points: &[OverlayPoint],
        output_path: Option<&Path>,
    ) -> Result<(), StockcastError>;
}
