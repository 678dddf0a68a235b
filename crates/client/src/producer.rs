//! Producer half of the client.

use std::sync::OnceLock;
use std::time::Duration;

use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as _};
use tracing::debug;

use crate::error::{Error, Result};
use crate::partitioner::LeastBytes;
use crate::record::Record;

/// How long to wait for a single delivery acknowledgement.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait for topic metadata when discovering partition counts.
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Producer bound to a single broker address and topic.
///
/// Each outgoing record is explicitly routed to the partition currently
/// holding the fewest unacknowledged bytes. The topic's partition count is
/// discovered from broker metadata on the first send and cached for the
/// producer's lifetime.
pub struct Producer {
    producer: FutureProducer,
    topic: String,
    partitions: OnceLock<usize>,
    balancer: LeastBytes,
}

impl Producer {
    /// Create a producer against `broker`. The connection itself is
    /// established lazily on the first send.
    pub fn new(broker: &str, topic: &str) -> Result<Self> {
        let producer: FutureProducer = rdkafka::ClientConfig::new()
            .set("bootstrap.servers", broker)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| Error::Config(format!("failed to create producer: {e}")))?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
            partitions: OnceLock::new(),
            balancer: LeastBytes::new(),
        })
    }

    /// Send a batch of records, blocking until every record in the batch has
    /// been acknowledged by the broker. The whole batch is assigned to
    /// partitions up-front so its records balance against each other.
    ///
    /// Any delivery failure aborts the call with [`Error::Produce`]; records
    /// already acknowledged stay produced (no transactional semantics).
    pub async fn send(&self, records: &[Record]) -> Result<()> {
        let partition_count = self.partition_count()?;
        self.balancer.ensure_partitions(partition_count);

        let assignments: Vec<usize> = records
            .iter()
            .map(|record| self.balancer.acquire(record.len() as u64))
            .collect();

        for (record, &partition) in records.iter().zip(&assignments) {
            let future_record = FutureRecord::to(&self.topic)
                .partition(partition as i32)
                .key(record.key.as_ref())
                .payload(record.value.as_ref());

            let delivery = self.producer.send(future_record, SEND_TIMEOUT).await;
            self.balancer.release(partition, record.len() as u64);

            if let Err((source, _)) = delivery {
                return Err(Error::Produce {
                    topic: self.topic.clone(),
                    source,
                });
            }
            debug!(topic = %self.topic, partition, "record acknowledged");
        }

        Ok(())
    }

    /// Partition count for the bound topic, fetched from broker metadata on
    /// first use and cached afterwards.
    fn partition_count(&self) -> Result<usize> {
        if let Some(&count) = self.partitions.get() {
            return Ok(count);
        }

        let metadata = self
            .producer
            .client()
            .fetch_metadata(Some(&self.topic), METADATA_TIMEOUT)
            .map_err(|source| Error::Produce {
                topic: self.topic.clone(),
                source,
            })?;

        let count = metadata
            .topics()
            .iter()
            .find(|t| t.name() == self.topic)
            .map(|t| t.partitions().len())
            .unwrap_or(0);

        if count == 0 {
            return Err(Error::Produce {
                topic: self.topic.clone(),
                source: KafkaError::MetadataFetch(RDKafkaErrorCode::UnknownTopicOrPartition),
            });
        }

        debug!(topic = %self.topic, partitions = count, "discovered partition count");
        let _ = self.partitions.set(count);
        Ok(count)
    }
}
