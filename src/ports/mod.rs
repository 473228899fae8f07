//! Port traits: the boundaries between the engine and its collaborators.

pub mod config_port;
pub mod data_port;
pub mod feature_sink;
