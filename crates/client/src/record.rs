//! Record types.

use bytes::Bytes;

/// A record to be produced: an opaque key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Bytes,
    pub value: Bytes,
}

impl Record {
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Total payload size, used for partition load accounting.
    pub fn len(&self) -> usize {
        self.key.len() + self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A record fetched from the broker, together with the broker-assigned
/// metadata. The `(partition, offset)` pair is the commit token: committing
/// it advances the consumer group's durable position past this record.
#[derive(Debug, Clone)]
pub struct FetchedRecord {
    /// Topic the record was read from.
    pub topic: String,
    /// Partition the record was read from.
    pub partition: i32,
    /// Offset of the record within its partition.
    pub offset: i64,
    /// Record key, if the producer set one.
    pub key: Option<Bytes>,
    /// Record value. Empty for tombstone records.
    pub value: Bytes,
    /// Broker or producer timestamp in milliseconds since epoch, if
    /// available.
    pub timestamp: Option<i64>,
}
