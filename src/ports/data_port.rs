//! Price data access port trait.

use crate::domain::error::StockcastError;
use crate::domain::price_bar::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol`, ordered by strictly increasing date. `None` bounds
    /// leave that side of the range open.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, StockcastError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockcastError>;
}
