//! Error types for the kafka-roundtrip client.

use thiserror::Error;

/// Errors that can occur while producing, fetching, or committing records.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid construction parameters (empty broker list, topic, group id).
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The broker rejected or failed a produce call.
    #[error("failed to produce to topic '{topic}'")]
    Produce {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    /// The broker connection failed while fetching a record.
    #[error("failed to fetch from topic '{topic}'")]
    Fetch {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    /// The broker rejected an offset commit (stale generation, fenced
    /// consumer) or the connection failed mid-commit.
    #[error("failed to commit offset {offset} on {topic}[{partition}]")]
    Commit {
        topic: String,
        partition: i32,
        offset: i64,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    /// A commit would move a partition's committed position backwards.
    #[error(
        "out-of-order commit on {topic}[{partition}]: offset {offset} is not \
         beyond the committed offset {last}"
    )]
    CommitOrder {
        topic: String,
        partition: i32,
        offset: i64,
        last: i64,
    },

    /// The processing step of a fetch-process-commit cycle failed. The
    /// record's offset has not been committed.
    #[error("processing failed for record at {topic}[{partition}]@{offset}: {cause}")]
    Process {
        topic: String,
        partition: i32,
        offset: i64,
        cause: anyhow::Error,
    },
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
