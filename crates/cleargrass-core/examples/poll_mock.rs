//! Example: Polling a Monitor on a Fixed Cadence
//!
//! This example sets up a sensor against the mock driver, polls it every
//! few seconds with the collector, flips the device offline halfway
//! through, and prints each published snapshot.
//!
//! Run with: `RUST_LOG=info cargo run --example poll_mock`

use std::sync::Arc;
use std::time::Duration;

use cleargrass_core::{Collector, DeviceModel, MockDriver, SensorConfig, setup};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let driver = Arc::new(MockDriver::new(DeviceModel::S1));
    let config = SensorConfig::new("192.168.1.20", "0123456789abcdef0123456789abcdef");
    let sensor = setup(&config, |_, _| Arc::clone(&driver)).await?;

    println!("{} ({})", sensor.name(), sensor.unique_id());

    let collector = Collector::new(sensor, Duration::from_secs(2));
    let mut rx = collector.subscribe();
    let cancel = CancellationToken::new();
    let handle = collector.spawn(cancel.clone());

    for tick in 1..=4 {
        if tick == 3 {
            driver.set_should_fail(true, Some("device offline"));
        }
        rx.changed().await?;
        let snapshot = rx.borrow_and_update().clone();
        match (snapshot.available, snapshot.state) {
            (Some(true), Some(state)) => {
                println!("tick {}: PM2.5 {} AQI, CO2 {}", tick, state.pm25, state.co2)
            }
            (_, Some(state)) => println!("tick {}: unavailable (last PM2.5 {})", tick, state.pm25),
            _ => println!("tick {}: unavailable", tick),
        }
    }

    cancel.cancel();
    let sensor = handle.await?;
    println!("Final availability: {:?}", sensor.available());

    Ok(())
}
