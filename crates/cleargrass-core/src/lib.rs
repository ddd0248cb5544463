//! Polling adapter and command surface for ClearGrass air quality monitors.
//!
//! This crate turns a device driver (anything implementing [`Driver`]) into
//! a pollable sensor entity and a small set of device commands. The local
//! control protocol itself lives in the driver.
//!
//! # Features
//!
//! - **Schema normalization**: S1 and B1 responses read through one [`StatusView`]
//! - **Polling**: [`PollingAdapter`] publishes an [`EntityState`] per tick and
//!   flips to unavailable on failure, keeping the last good snapshot
//! - **Commands**: power, display clock, auto close, night mode, night schedule
//! - **Setup**: identify the device, reporting [`Error::NotReady`] when offline
//! - **Cadence loop**: [`Collector`] polls on a fixed interval
//!
//! # Supported Devices
//!
//! | Model | Model id | Readings |
//! |-------|----------|----------|
//! | S1 | `cgllc.airmonitor.s1` | PM2.5, CO₂, TVOC, temperature, humidity, battery |
//! | B1 | `cgllc.airmonitor.b1` | PM2.5, CO₂e, TVOC, temperature, humidity |
//!
//! # Quick Start
//!
//! ```
//! use cleargrass_core::{MockDriver, SensorConfig, setup};
//! use cleargrass_types::DeviceModel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SensorConfig::new("192.168.1.20", "0123456789abcdef0123456789abcdef");
//!
//!     // A real transport would use host and token here.
//!     let mut sensor = setup(&config, |_host, _token| MockDriver::new(DeviceModel::S1)).await?;
//!
//!     sensor.update().await;
//!     println!("PM2.5: {:?} {}", sensor.state(), sensor.unit_of_measurement());
//!
//!     sensor.monitor().set_night_time(23, 30, 6, 0).await?;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod mock;
pub mod poller;
pub mod sensor;
pub mod settings;
pub mod traits;

pub use cleargrass_types::types;

// Core exports
pub use collector::{Collector, DEFAULT_SCAN_INTERVAL, SensorSnapshot};
pub use config::{ConfigError, DEFAULT_NAME, SensorConfig, Token, ValidationError};
pub use device::{AirQualityMonitor, is_success};
pub use error::{DriverError, Error, Result};
pub use mock::{DriverCall, MockDriver, MockDriverBuilder};
pub use poller::PollingAdapter;
pub use sensor::{AirQualitySensor, ICON, UNIT_OF_MEASUREMENT, setup};
pub use settings::{NightSchedule, Switch};
pub use traits::Driver;

// Re-export from cleargrass-types
pub use cleargrass_types::{
    DeviceInfo, DeviceModel, EntityState, PropertyValue, RawStatus, StatusError, StatusView,
};
