//! Client facade owning one producer and one consumer connection.

use std::future::Future;

use crate::config::ClientConfig;
use crate::consumer::Consumer;
use crate::error::Result;
use crate::producer::Producer;
use crate::record::{FetchedRecord, Record};

/// A client holding exactly one producer connection and one consumer
/// connection to the broker. The two connections own independent network
/// resources, so the producer and consumer sides can be driven from
/// separate tasks without locking.
///
/// Construction validates the configuration but does not contact the
/// broker; connections are established lazily by the first operation.
pub struct Client {
    producer: Producer,
    consumer: Consumer,
}

impl Client {
    /// Build a client from `config`. Fails with
    /// [`Error::Config`](crate::Error::Config) when the broker list is
    /// empty, the first broker address is empty, or the topic or group id
    /// is empty.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let consumer = Consumer::new(&config)?;
        let producer = Producer::new(&config.brokers[0], &config.topic)?;
        Ok(Self { producer, consumer })
    }

    /// Send a batch of records, blocking until the broker acknowledged all
    /// of them. See [`Producer::send`].
    pub async fn send(&self, records: &[Record]) -> Result<()> {
        self.producer.send(records).await
    }

    /// Single-record read with commit-on-read semantics. See
    /// [`Consumer::receive`].
    pub async fn receive(&self) -> Result<FetchedRecord> {
        self.consumer.receive().await
    }

    /// One manual fetch-process-commit cycle. See
    /// [`Consumer::fetch_process_commit`].
    pub async fn fetch_process_commit<F, Fut>(&self, processor: F) -> Result<FetchedRecord>
    where
        F: FnOnce(FetchedRecord) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        self.consumer.fetch_process_commit(processor).await
    }
}
