//! JSON output adapter for prediction requests and chart overlays.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::error::StockcastError;
use crate::domain::features::{OverlayPoint, PredictionRequest};
use crate::ports::feature_sink::FeatureSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputAdapter {
    pretty: bool,
}

impl JsonOutputAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        value: &T,
        output_path: Option<&Path>,
    ) -> Result<(), StockcastError> {
        match output_path {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_to(&mut writer, value)?;
                writer.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                self.write_to(&mut lock, value)?;
            }
        }
        Ok(())
    }

    /// Serializes `value` followed by a newline.
    pub fn write_to<W: Write, T: Serialize + ?Sized>(
        &self,
        writer: &mut W,
        value: &T,
    ) -> Result<(), StockcastError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl FeatureSink for JsonOutputAdapter {
    fn write_request(
        &self,
        request: &PredictionRequest,
        output_path: Option<&Path>,
    ) -> Result<(), StockcastError> {
        self.write_json(request, output_path)
    }

    fn write_overlay(
        &self,
        points: &[OverlayPoint],
        output_path: Option<&Path>,
    ) -> Result<(), StockcastError> {
        self.write_json(points, output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::FeatureRecord;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn sample_request() -> PredictionRequest {
        let mut values = BTreeMap::new();
        values.insert("sma5".to_string(), 101.5);
        PredictionRequest {
            symbol: "AAPL".to_string(),
            features: vec![FeatureRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                close: 102.0,
                volume: 1500.0,
                values,
            }],
        }
    }

    #[test]
    fn compact_output_is_single_line() {
        let mut buf = Vec::new();
        JsonOutputAdapter::new(false)
            .write_to(&mut buf, &sample_request())
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "{\"symbol\":\"AAPL\",\"features\":[{\"date\":\"2024-03-01\",\"close\":102.0,\"volume\":1500.0,\"sma5\":101.5}]}\n"
        );
    }

    #[test]
    fn pretty_output_round_trips() {
        let mut buf = Vec::new();
        JsonOutputAdapter::new(true)
            .write_to(&mut buf, &sample_request())
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().count() > 1);

        let parsed: PredictionRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample_request());
    }

    #[test]
    fn write_request_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("request.json");

        JsonOutputAdapter::default()
            .write_request(&sample_request(), Some(path.as_path()))
            .unwrap();

        let parsed: PredictionRequest =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.symbol, "AAPL");
        assert_eq!(parsed.features[0].get("sma5"), Some(101.5));
    }

    #[test]
    fn write_overlay_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay.json");
        let points = vec![OverlayPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            value: None,
        }];

        JsonOutputAdapter::default()
            .write_overlay(&points, Some(path.as_path()))
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[{\"date\":\"2024-03-01\",\"value\":null}]\n"
        );
    }

    #[test]
    fn write_to_unwritable_path_fails() {
        let result = JsonOutputAdapter::default()
            .write_request(&sample_request(), Some(Path::new("/nonexistent/dir/out.json")));
        assert!(matches!(result, Err(StockcastError::Io(_))));
    }
}
