//! End-to-end tests driving setup, polling and commands through the mock driver.
//!
//! Run with logs:
//! `RUST_LOG=debug cargo test -p cleargrass-core --test sensor -- --nocapture`

use std::sync::Arc;

use cleargrass_core::{
    DeviceModel, Driver, Error, MockDriver, MockDriverBuilder, PollingAdapter, SensorConfig,
    setup,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const TOKEN: &str = "ffffffffffffffffffffffffffffffff";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_s1_end_to_end() {
    init_tracing();

    let driver = Arc::new(
        MockDriverBuilder::new()
            .mac_address("78:11:DC:12:34:56")
            .response(
                "get_prop",
                vec![
                    json!(10),
                    json!("ok"),
                    json!(415),
                    json!(55),
                    json!(12),
                    json!(21.5),
                    json!(120),
                ],
            )
            .build(),
    );

    let config = SensorConfig::new("192.168.1.20", TOKEN).with_name("Bedroom");
    let mut sensor = setup(&config, |_, _| Arc::clone(&driver)).await.unwrap();

    assert_eq!(sensor.name(), "Bedroom");
    assert_eq!(sensor.unique_id(), "cgllc.airmonitor.s1-78:11:DC:12:34:56");
    assert_eq!(sensor.available(), Some(true));
    assert_eq!(sensor.state(), Some(&json!(12)));

    let attrs = sensor.attributes();
    assert_eq!(attrs["temperature"], json!(21.5));
    assert_eq!(attrs["humidity"], json!(55));
    assert_eq!(attrs["co2"], json!(415));
    assert_eq!(attrs["tvoc"], json!(120));
    assert_eq!(attrs["battery_level"], json!(10));
    assert_eq!(attrs["battery_state"], json!("ok"));
    assert_eq!(attrs["model"], json!("cgllc.airmonitor.s1"));

    // Device drops off the network: unavailable, attributes kept.
    driver.set_should_fail(true, Some("timed out"));
    assert!(!sensor.update().await);
    assert_eq!(sensor.available(), Some(false));
    assert_eq!(sensor.attributes(), attrs);

    // And comes back.
    driver.set_should_fail(false, None);
    assert!(sensor.update().await);
    assert_eq!(sensor.available(), Some(true));
}

#[tokio::test]
async fn test_unreachable_setup_is_retryable() {
    init_tracing();

    let driver = Arc::new(MockDriverBuilder::new().build());
    driver.set_transient_failures(1);
    let config = SensorConfig::new("192.168.1.21", TOKEN);

    let err = setup(&config, |_, _| Arc::clone(&driver))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotReady { ref host, .. } if host == "192.168.1.21"));
    assert!(err.is_retryable());

    // The host retries later and the device answers.
    let sensor = setup(&config, |_, _| Arc::clone(&driver)).await.unwrap();
    assert_eq!(sensor.available(), Some(true));
}

#[tokio::test]
async fn test_commands_through_sensor() {
    init_tracing();

    let driver = Arc::new(MockDriver::new(DeviceModel::B1));
    let config = SensorConfig::new("192.168.1.22", TOKEN);
    let sensor = setup(&config, |_, _| Arc::clone(&driver)).await.unwrap();
    driver.clear_calls();

    let monitor = sensor.monitor();
    monitor.off().await.unwrap();
    monitor.set_night_mode(false).await.unwrap();
    monitor.set_night_time(22, 0, 7, 15).await.unwrap();
    assert!(matches!(
        monitor.set_night_time(22, 0, 24, 0).await,
        Err(Error::InvalidSchedule { begin: 79200, end: 86400 })
    ));

    let calls = driver.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].method, "set_power");
    assert_eq!(calls[0].params, vec![json!("off")]);
    assert_eq!(calls[1].method, "set_night_state");
    assert_eq!(calls[1].params, vec![json!("off")]);
    assert_eq!(calls[2].method, "set_night_time");
    assert_eq!(calls[2].params, vec![json!(79200), json!(26100)]);
}

#[tokio::test]
async fn test_adapter_over_shared_driver() {
    init_tracing();

    async fn poll_twice<D: Driver>(adapter: &mut PollingAdapter<D>) -> (bool, bool) {
        (adapter.poll().await, adapter.poll().await)
    }

    let driver = Arc::new(MockDriver::new(DeviceModel::B1));
    let mut adapter = PollingAdapter::new(Arc::clone(&driver), DeviceModel::B1);
    driver.set_transient_failures(1);

    assert_eq!(poll_twice(&mut adapter).await, (false, true));
    assert_eq!(adapter.state().unwrap().co2, json!(620));
    assert_eq!(driver.call_count(), 2);
}
