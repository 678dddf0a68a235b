//! Consumer half of the client: manual offsets and a redelivery buffer.

use std::collections::{HashMap, VecDeque};
use std::future::Future;

use bytes::Bytes;
use rdkafka::consumer::{CommitMode, Consumer as _, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::{ClientConfig, FETCH_MAX_BYTES, FETCH_MIN_BYTES};
use crate::error::{Error, Result};
use crate::record::FetchedRecord;

/// Last committed offset per partition.
///
/// Guards the commit-order invariant: within one consumer, committed offsets
/// per partition strictly increase. A commit that does not advance a
/// partition's position is rejected before it reaches the broker.
#[derive(Debug, Default)]
struct OffsetLog {
    last_committed: HashMap<i32, i64>,
}

impl OffsetLog {
    /// Check that `offset` advances `partition`'s committed position.
    /// Returns the conflicting committed offset otherwise.
    fn check(&self, partition: i32, offset: i64) -> std::result::Result<(), i64> {
        match self.last_committed.get(&partition) {
            Some(&last) if offset <= last => Err(last),
            _ => Ok(()),
        }
    }

    fn advance(&mut self, partition: i32, offset: i64) {
        self.last_committed.insert(partition, offset);
    }
}

/// Consumer bound to a `(topic, group)` pair with auto-commit disabled.
///
/// Fetched-but-uncommitted records from failed iterations are buffered and
/// re-yielded by the next fetch, so an iteration that fails between fetch
/// and commit redelivers the same record instead of silently skipping it.
pub struct Consumer {
    inner: StreamConsumer,
    topic: String,
    pending: Mutex<VecDeque<FetchedRecord>>,
    offsets: Mutex<OffsetLog>,
}

impl Consumer {
    /// Create a consumer subscribed to the configured topic. The group
    /// coordinator is only contacted once fetching starts.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner: StreamConsumer = rdkafka::ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("group.id", &config.group_id)
            .set("session.timeout.ms", &config.session_timeout_ms)
            .set("auto.offset.reset", &config.auto_offset_reset)
            .set("enable.partition.eof", "false")
            .set("enable.auto.commit", "false")
            .set("fetch.min.bytes", FETCH_MIN_BYTES.to_string())
            .set("fetch.max.bytes", FETCH_MAX_BYTES.to_string())
            .create()
            .map_err(|e| Error::Config(format!("failed to create consumer: {e}")))?;

        inner
            .subscribe(&[&config.topic])
            .map_err(|e| Error::Config(format!("failed to subscribe to '{}': {e}", config.topic)))?;

        Ok(Self {
            inner,
            topic: config.topic.clone(),
            pending: Mutex::new(VecDeque::new()),
            offsets: Mutex::new(OffsetLog::default()),
        })
    }

    /// Fetch the next record without advancing the committed offset.
    /// Suspends the calling task until a record is available or the fetch
    /// fails. Records buffered by a previously failed iteration are yielded
    /// before the broker is polled again.
    pub async fn fetch(&self) -> Result<FetchedRecord> {
        if let Some(record) = self.pending.lock().await.pop_front() {
            debug!(
                topic = %record.topic,
                partition = record.partition,
                offset = record.offset,
                "redelivering buffered record"
            );
            return Ok(record);
        }

        let message = self.inner.recv().await.map_err(|source| Error::Fetch {
            topic: self.topic.clone(),
            source,
        })?;

        Ok(FetchedRecord {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            key: message.key().map(Bytes::copy_from_slice),
            value: message
                .payload()
                .map(Bytes::copy_from_slice)
                .unwrap_or_default(),
            timestamp: message.timestamp().to_millis(),
        })
    }

    /// Commit the offset of `record`, advancing the group's durable position
    /// past it. Rejects commits that would not advance the partition.
    pub async fn commit(&self, record: &FetchedRecord) -> Result<()> {
        let mut offsets = self.offsets.lock().await;

        if let Err(last) = offsets.check(record.partition, record.offset) {
            return Err(Error::CommitOrder {
                topic: record.topic.clone(),
                partition: record.partition,
                offset: record.offset,
                last,
            });
        }

        let mut assignment = TopicPartitionList::new();
        assignment
            .add_partition_offset(
                &record.topic,
                record.partition,
                Offset::Offset(record.offset + 1),
            )
            .map_err(|source| Error::Commit {
                topic: record.topic.clone(),
                partition: record.partition,
                offset: record.offset,
                source,
            })?;

        self.inner
            .commit(&assignment, CommitMode::Sync)
            .map_err(|source| Error::Commit {
                topic: record.topic.clone(),
                partition: record.partition,
                offset: record.offset,
                source,
            })?;

        offsets.advance(record.partition, record.offset);
        Ok(())
    }

    /// Convenience single-record read with commit-on-read semantics: fetches
    /// the next record and immediately commits it, with no processing step.
    pub async fn receive(&self) -> Result<FetchedRecord> {
        let record = self.fetch().await?;
        self.commit(&record).await?;
        Ok(record)
    }

    /// One fetch-process-commit cycle.
    ///
    /// 1. Fetch the next record (committed offset untouched).
    /// 2. Run it through `processor`. On failure the record is buffered for
    ///    redelivery and the cycle fails with [`Error::Process`] — the
    ///    offset is NOT committed.
    /// 3. Commit the record's offset.
    ///
    /// Returns the record only if all three steps succeeded. A crash between
    /// steps 2 and 3 leaves the offset uncommitted, so the record is
    /// redelivered on restart (at-least-once).
    pub async fn fetch_process_commit<F, Fut>(&self, processor: F) -> Result<FetchedRecord>
    where
        F: FnOnce(FetchedRecord) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let record = self.fetch().await?;

        if let Err(cause) = processor(record.clone()).await {
            self.pending.lock().await.push_front(record.clone());
            return Err(Error::Process {
                topic: record.topic,
                partition: record.partition,
                offset: record.offset,
                cause,
            });
        }

        self.commit(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_advance_strictly() {
        let mut log = OffsetLog::default();

        assert_eq!(log.check(0, 0), Ok(()));
        log.advance(0, 0);
        assert_eq!(log.check(0, 1), Ok(()));
        log.advance(0, 1);
        assert_eq!(log.check(0, 5), Ok(()));
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let mut log = OffsetLog::default();
        log.advance(0, 3);
        assert_eq!(log.check(0, 3), Err(3));
    }

    #[test]
    fn test_backwards_commit_rejected() {
        let mut log = OffsetLog::default();
        log.advance(0, 7);
        assert_eq!(log.check(0, 2), Err(7));
    }

    #[test]
    fn test_partitions_tracked_independently() {
        let mut log = OffsetLog::default();
        log.advance(0, 10);
        assert_eq!(log.check(1, 0), Ok(()));
        log.advance(1, 0);
        assert_eq!(log.check(0, 11), Ok(()));
        assert_eq!(log.check(1, 0), Err(0));
    }
}
