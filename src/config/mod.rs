//! Runtime configuration helpers.

pub mod duration;

pub use duration::parse_duration_to_secs;
