//! Configuration access port trait.

use chrono::NaiveDate;

use crate::domain::error::StockcastError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Optional `YYYY-MM-DD` value; present but malformed is an error.
    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, StockcastError> {
        match self.get_string(section, key) {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(|_| StockcastError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
                }),
        }
    }
}
