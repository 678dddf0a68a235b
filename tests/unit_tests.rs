use kafka_roundtrip::client::{Client, ClientConfig, Error};
use kafka_roundtrip::testing::test_client_config;
use kafka_roundtrip::BrokerOpts;
use tokio_test::assert_ok;

fn broker_opts() -> BrokerOpts {
    BrokerOpts {
        brokers: vec!["localhost:19092".to_string()],
        topic: "roundtrip-events".to_string(),
        group_id: "roundtrip-consumer-group".to_string(),
        session_timeout_ms: "6000".to_string(),
        auto_offset_reset: "earliest".to_string(),
    }
}

#[test]
fn test_broker_opts_to_client_config() {
    let config = broker_opts().to_client_config();

    assert_eq!(config.brokers, vec!["localhost:19092".to_string()]);
    assert_eq!(config.topic, "roundtrip-events");
    assert_eq!(config.group_id, "roundtrip-consumer-group");
    assert_eq!(config.session_timeout_ms, "6000");
    assert_eq!(config.auto_offset_reset, "earliest");
}

#[test]
fn test_client_config_defaults() {
    let config = ClientConfig::default();

    assert!(config.brokers.is_empty());
    assert_eq!(config.session_timeout_ms, "6000");
    assert_eq!(config.auto_offset_reset, "earliest");
}

// Construction does not contact the broker, so a valid configuration
// succeeds regardless of reachability.
#[tokio::test]
async fn test_client_construction_is_offline() {
    let config = test_client_config("roundtrip-events", "roundtrip-consumer-group");
    assert_ok!(Client::new(config));
}

#[test]
fn test_client_construction_rejects_missing_params() {
    let empty_brokers = ClientConfig {
        brokers: Vec::new(),
        ..test_client_config("roundtrip-events", "roundtrip-consumer-group")
    };
    assert!(matches!(Client::new(empty_brokers), Err(Error::Config(_))));

    let empty_first_broker = ClientConfig {
        brokers: vec![String::new()],
        ..test_client_config("roundtrip-events", "roundtrip-consumer-group")
    };
    assert!(matches!(
        Client::new(empty_first_broker),
        Err(Error::Config(_))
    ));

    let empty_topic = test_client_config("", "roundtrip-consumer-group");
    assert!(matches!(Client::new(empty_topic), Err(Error::Config(_))));

    let empty_group = test_client_config("roundtrip-events", "");
    assert!(matches!(Client::new(empty_group), Err(Error::Config(_))));
}
