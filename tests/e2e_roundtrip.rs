//! Produce/consume E2E tests against a live Kafka broker.
//!
//! These tests require a reachable broker (default `localhost:9092`,
//! override with `KAFKA_BROKERS`) and are ignored by default:
//!
//! ```bash
//! cargo test -- --ignored
//! ```
//!
//! Each test uses its own random topic and consumer group, so runs do not
//! interfere with each other or with earlier runs.

use std::sync::Arc;
use std::time::Duration;

use kafka_roundtrip::client::{admin, Client, Error, Record};
use kafka_roundtrip::runner::{run, synthetic_record, RunnerOpts};
use kafka_roundtrip::testing::{broker_addr, test_client_config, unique_group, unique_topic};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("kafka_roundtrip=debug,kafka_roundtrip_client=debug")
        .try_init()
        .ok();
}

async fn new_client(topic: &str, group: &str) -> anyhow::Result<Client> {
    Ok(Client::new(test_client_config(topic, group))?)
}

async fn create_topic(topic: &str, partitions: i32) -> anyhow::Result<()> {
    admin::create_topic_if_not_exists(&broker_addr(), topic, partitions).await?;
    // Give the broker a moment to propagate topic metadata.
    tokio::time::sleep(Duration::from_millis(500)).await;
    Ok(())
}

async fn ok_processor(_record: kafka_roundtrip::client::FetchedRecord) -> anyhow::Result<()> {
    Ok(())
}

async fn failing_processor(_record: kafka_roundtrip::client::FetchedRecord) -> anyhow::Result<()> {
    anyhow::bail!("simulated processing failure")
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_roundtrip_100_100() -> anyhow::Result<()> {
    init_tracing();
    let topic = unique_topic("roundtrip");
    let group = unique_group("roundtrip");
    create_topic(&topic, 3).await?;

    let client = Arc::new(new_client(&topic, &group).await?);
    let opts = RunnerOpts {
        producer_iterations: 100,
        consumer_iterations: 100,
        timeout_secs: Some(60),
    };

    let summary = run(client, &opts).await?;
    assert_eq!(summary.produced, 100);
    assert_eq!(summary.consumed, 100);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_produced_records_are_distinct_and_retrievable() -> anyhow::Result<()> {
    init_tracing();
    let topic = unique_topic("produce");
    let group = unique_group("produce");
    create_topic(&topic, 3).await?;

    let client = new_client(&topic, &group).await?;
    let records: Vec<Record> = (0..100).map(synthetic_record).collect();
    client.send(&records).await?;

    let mut keys = std::collections::HashSet::new();
    for _ in 0..100 {
        let record = tokio::time::timeout(Duration::from_secs(30), client.receive()).await??;
        let key = record.key.clone().expect("produced records carry a key");
        keys.insert(String::from_utf8_lossy(&key).to_string());
    }

    assert_eq!(keys.len(), 100);
    for i in 0..100 {
        assert!(keys.contains(&format!("Msg {i}")));
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_committed_offsets_advance_in_fetch_order() -> anyhow::Result<()> {
    init_tracing();
    // Single partition, so fetch order is offset order.
    let topic = unique_topic("ordering");
    let group = unique_group("ordering");
    create_topic(&topic, 1).await?;

    let client = new_client(&topic, &group).await?;
    let records: Vec<Record> = (0..10).map(synthetic_record).collect();
    client.send(&records).await?;

    let mut last_offset = -1;
    for _ in 0..10 {
        let record = tokio::time::timeout(
            Duration::from_secs(30),
            client.fetch_process_commit(ok_processor),
        )
        .await??;
        assert!(record.offset > last_offset);
        last_offset = record.offset;
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_process_failure_redelivers_same_record() -> anyhow::Result<()> {
    init_tracing();
    let topic = unique_topic("redelivery");
    let group = unique_group("redelivery");
    create_topic(&topic, 1).await?;

    let client = new_client(&topic, &group).await?;
    client
        .send(&[synthetic_record(0), synthetic_record(1)])
        .await?;

    // Processing fails: the cycle errors and the offset must not move.
    let err = tokio::time::timeout(
        Duration::from_secs(30),
        client.fetch_process_commit(failing_processor),
    )
    .await?
    .expect_err("processing failure must fail the cycle");
    assert!(matches!(err, Error::Process { .. }));

    // The next cycle sees the same record again.
    let redelivered = client.fetch_process_commit(ok_processor).await?;
    assert_eq!(redelivered.key.as_deref(), Some(b"Msg 0".as_ref()));
    assert_eq!(redelivered.offset, 0);

    // After the commit, the following cycle moves on.
    let next = tokio::time::timeout(
        Duration::from_secs(30),
        client.fetch_process_commit(ok_processor),
    )
    .await??;
    assert_eq!(next.key.as_deref(), Some(b"Msg 1".as_ref()));
    assert_eq!(next.offset, 1);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_uncommitted_record_redelivered_to_new_consumer() -> anyhow::Result<()> {
    init_tracing();
    let topic = unique_topic("restart");
    let group = unique_group("restart");
    create_topic(&topic, 1).await?;

    {
        let client = new_client(&topic, &group).await?;
        client.send(&[synthetic_record(0)]).await?;

        let err = tokio::time::timeout(
            Duration::from_secs(30),
            client.fetch_process_commit(failing_processor),
        )
        .await?
        .expect_err("processing failure must fail the cycle");
        assert!(matches!(err, Error::Process { .. }));
        // Dropped without committing.
    }

    // A fresh consumer in the same group starts from the committed position,
    // which never moved.
    let client = new_client(&topic, &group).await?;
    let record = tokio::time::timeout(
        Duration::from_secs(30),
        client.fetch_process_commit(ok_processor),
    )
    .await??;
    assert_eq!(record.key.as_deref(), Some(b"Msg 0".as_ref()));
    assert_eq!(record.offset, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_receive_commits_on_read() -> anyhow::Result<()> {
    init_tracing();
    let topic = unique_topic("receive");
    let group = unique_group("receive");
    create_topic(&topic, 1).await?;

    {
        let client = new_client(&topic, &group).await?;
        client.send(&[synthetic_record(0)]).await?;
        let record = tokio::time::timeout(Duration::from_secs(30), client.receive()).await??;
        assert_eq!(record.key.as_deref(), Some(b"Msg 0".as_ref()));
    }

    // receive() committed, so a fresh consumer in the same group only sees
    // records produced afterwards.
    let client = new_client(&topic, &group).await?;
    client.send(&[synthetic_record(1)]).await?;
    let record = tokio::time::timeout(Duration::from_secs(30), client.receive()).await??;
    assert_eq!(record.key.as_deref(), Some(b"Msg 1".as_ref()));
    Ok(())
}
