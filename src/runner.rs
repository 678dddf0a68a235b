//! Runner: two concurrent loops against one client, joined by a shared
//! completion barrier.
//!
//! The producer loop emits `producer_iterations` keyed records; the consumer
//! loop runs `consumer_iterations` fetch-process-commit cycles. Each
//! completed iteration signals a shared counter once; the runner returns
//! when every expected signal has arrived (or propagates the first failure).
//!
//! A failure in either loop cancels a shared token so the sibling loop stops
//! cleanly at its next suspension point instead of being abandoned
//! mid-operation. The two loops give no ordering guarantee relative to each
//! other: the consumer may observe records produced earlier in the process
//! lifetime or by any prior run sharing the same group.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{Client, FetchedRecord, Record};

/// How often the completion barrier re-checks the shared counter.
const BARRIER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for a produce/consume run.
#[derive(Debug, Clone)]
pub struct RunnerOpts {
    /// Number of records the producer loop emits.
    pub producer_iterations: u64,
    /// Number of fetch-process-commit cycles the consumer loop runs.
    pub consumer_iterations: u64,
    /// Overall deadline in seconds; `None` waits indefinitely.
    pub timeout_secs: Option<i64>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub produced: u64,
    pub consumed: u64,
}

/// Build the i-th synthetic record of a run.
pub fn synthetic_record(i: u64) -> Record {
    Record::new(format!("Msg {i}"), format!("Message #{i} value"))
}

/// Drive the producer and consumer loops concurrently until both finished
/// their configured iteration counts, a loop failed, or the deadline passed.
pub async fn run(client: Arc<Client>, opts: &RunnerOpts) -> anyhow::Result<RunSummary> {
    let expected = opts.producer_iterations + opts.consumer_iterations;
    let completed = Arc::new(AtomicU64::new(0));
    let cancel = CancellationToken::new();
    let deadline: Option<DateTime<Utc>> = opts
        .timeout_secs
        .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

    info!(
        producer_iterations = opts.producer_iterations,
        consumer_iterations = opts.consumer_iterations,
        "starting produce/consume run"
    );

    let producer_task = tokio::spawn(produce_loop(
        Arc::clone(&client),
        opts.producer_iterations,
        Arc::clone(&completed),
        cancel.clone(),
    ));
    let consumer_task = tokio::spawn(consume_loop(
        Arc::clone(&client),
        opts.consumer_iterations,
        Arc::clone(&completed),
        cancel.clone(),
    ));

    // Completion barrier: wait until every iteration has signalled the
    // counter, a loop failed (token cancelled), or the deadline passed.
    let mut timed_out = false;
    loop {
        sleep(BARRIER_POLL_INTERVAL).await;

        if completed.load(Ordering::SeqCst) >= expected {
            break;
        }
        if cancel.is_cancelled() {
            break;
        }
        if let Some(deadline) = deadline {
            if Utc::now() >= deadline {
                warn!("deadline reached before both loops completed, cancelling");
                timed_out = true;
                cancel.cancel();
                break;
            }
        }
    }

    let produced = producer_task
        .await
        .context("producer task panicked")??;
    let consumed = consumer_task
        .await
        .context("consumer task panicked")??;

    if timed_out {
        anyhow::bail!(
            "run timed out after producing {produced} of {} and consuming {consumed} of {} records",
            opts.producer_iterations,
            opts.consumer_iterations
        );
    }

    debug!(
        completed = completed.load(Ordering::SeqCst),
        expected, "all iterations signalled"
    );
    Ok(RunSummary { produced, consumed })
}

async fn produce_loop(
    client: Arc<Client>,
    iterations: u64,
    completed: Arc<AtomicU64>,
    cancel: CancellationToken,
) -> anyhow::Result<u64> {
    for i in 0..iterations {
        let record = synthetic_record(i);

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("producer loop stopping after {i} records");
                return Ok(i);
            }
            result = client.send(std::slice::from_ref(&record)) => {
                match result {
                    Ok(()) => {}
                    Err(e) => {
                        cancel.cancel();
                        return Err(e).with_context(|| format!("failed to produce record {i}"));
                    }
                }
            }
        }

        completed.fetch_add(1, Ordering::SeqCst);
        if (i + 1) % 100 == 0 {
            info!("produced {} records", i + 1);
        }
    }

    Ok(iterations)
}

async fn consume_loop(
    client: Arc<Client>,
    iterations: u64,
    completed: Arc<AtomicU64>,
    cancel: CancellationToken,
) -> anyhow::Result<u64> {
    for i in 0..iterations {
        // Cancellation while suspended in the fetch drops the cycle before
        // its commit, so the in-flight record stays uncommitted and will be
        // redelivered (at-least-once).
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("consumer loop stopping after {i} records");
                return Ok(i);
            }
            result = client.fetch_process_commit(emit_record) => {
                match result {
                    Ok(record) => {
                        debug!(
                            topic = %record.topic,
                            partition = record.partition,
                            offset = record.offset,
                            "committed record"
                        );
                    }
                    Err(e) => {
                        cancel.cancel();
                        return Err(e).with_context(|| format!("consumer cycle {i} failed"));
                    }
                }
            }
        }

        completed.fetch_add(1, Ordering::SeqCst);
        if (i + 1) % 100 == 0 {
            info!("consumed {} records", i + 1);
        }
    }

    Ok(iterations)
}

/// Default processing step: emit the record's metadata, key, and value to
/// stdout.
async fn emit_record(record: FetchedRecord) -> anyhow::Result<()> {
    let key = record.key.as_deref().unwrap_or_default();
    println!(
        "{record:?}\n{}\n{}",
        String::from_utf8_lossy(key),
        String::from_utf8_lossy(&record.value)
    );
    Ok(())
}
