//! Core domain types and logic.

pub mod price_bar;
pub mod indicator;
pub mod indicator_helpers;
pub mod features;
pub mod config_validation;
pub mod error;
