//! Command-line interface for kafka-roundtrip
//!
//! Produces and consumes a fixed number of records against one Kafka topic,
//! running both loops concurrently and exiting once every record has been
//! produced and every consumed record has been committed.
//!
//! ```bash
//! kafka-roundtrip --brokers localhost:19092 \
//!   --topic roundtrip-events --group-id roundtrip-consumer-group \
//!   --producer-iterations 100 --consumer-iterations 100
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kafka_roundtrip::client::{admin, Client};
use kafka_roundtrip::config::parse_duration_to_secs;
use kafka_roundtrip::runner::{self, RunnerOpts};
use kafka_roundtrip::BrokerOpts;

#[derive(Parser)]
#[command(name = "kafka-roundtrip")]
#[command(about = "Produce and consume records against Kafka with manual offset commits")]
struct Cli {
    #[command(flatten)]
    broker: BrokerOpts,

    /// Number of records to produce
    #[arg(long, default_value_t = 100)]
    producer_iterations: u64,

    /// Number of fetch-process-commit cycles to run
    #[arg(long, default_value_t = 100)]
    consumer_iterations: u64,

    /// Overall deadline for the run ("300", "300s", "30m", "1h")
    #[arg(long, default_value = "60s")]
    timeout: String,

    /// Create the topic before starting if it does not exist
    #[arg(long)]
    create_topic: bool,

    /// Partition count used when creating the topic
    #[arg(long, default_value_t = 3)]
    partitions: i32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run_main(cli).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {e:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let timeout_secs = parse_duration_to_secs(&cli.timeout)
        .with_context(|| format!("invalid timeout: {}", cli.timeout))?;

    if cli.create_topic {
        admin::create_topic_if_not_exists(
            &cli.broker.brokers.join(","),
            &cli.broker.topic,
            cli.partitions,
        )
        .await?;
    }

    let client = Arc::new(Client::new(cli.broker.to_client_config())?);

    let opts = RunnerOpts {
        producer_iterations: cli.producer_iterations,
        consumer_iterations: cli.consumer_iterations,
        timeout_secs: Some(timeout_secs),
    };
    let summary = runner::run(client, &opts).await?;

    tracing::info!(
        produced = summary.produced,
        consumed = summary.consumed,
        "run complete"
    );
    Ok(())
}
