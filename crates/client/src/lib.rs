//! Kafka produce/consume client with manual offset control.
//!
//! This crate provides:
//! - A producer that routes records to the least-loaded partition
//! - A consumer with manual offset commits and a redelivery buffer
//! - A `Client` facade owning one producer and one consumer connection
//!
//! # Consumption modes
//!
//! - [`Client::fetch_process_commit`]: fetch a record, run it through a
//!   processor, then commit its offset. The offset is only advanced once
//!   processing succeeded, so a failure between fetch and commit redelivers
//!   the same record (at-least-once).
//! - [`Client::receive`]: convenience single-record read that commits
//!   immediately after the fetch, with no processing step in between.

/// Topic administration helpers (topic creation).
pub mod admin;

/// High-level client owning the producer and consumer connections.
pub mod client;
pub mod config;
pub mod consumer;
pub mod error;
pub mod producer;
pub mod record;

mod partitioner;

pub use client::Client;
pub use config::{ClientConfig, FETCH_MAX_BYTES, FETCH_MIN_BYTES};
pub use consumer::Consumer;
pub use error::{Error, Result};
pub use producer::Producer;
pub use record::{FetchedRecord, Record};
