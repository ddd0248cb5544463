//! Host-facing sensor entity and setup.
//!
//! [`setup`] identifies the device and returns an [`AirQualitySensor`]
//! that has already been polled once. When the device cannot be reached,
//! setup fails with [`Error::NotReady`] and the host is expected to call it
//! again later.

use serde_json::Map;
use tracing::info;

use cleargrass_types::types::{
    ATTR_BATTERY_LEVEL, ATTR_BATTERY_STATE, ATTR_CO2, ATTR_HUMIDITY, ATTR_MODEL, ATTR_TEMPERATURE,
    ATTR_TVOC,
};
use cleargrass_types::{DeviceInfo, EntityState, PropertyValue};

use crate::config::{SensorConfig, Token};
use crate::device::AirQualityMonitor;
use crate::error::{Error, Result};
use crate::poller::PollingAdapter;
use crate::traits::Driver;

/// Unit reported for the primary value.
pub const UNIT_OF_MEASUREMENT: &str = "AQI";

/// Icon reported to the host.
pub const ICON: &str = "mdi:cloud";

/// A pollable air quality sensor entity.
#[derive(Debug)]
pub struct AirQualitySensor<D> {
    name: String,
    unique_id: String,
    device_info: DeviceInfo,
    adapter: PollingAdapter<D>,
}

impl<D: Driver> AirQualitySensor<D> {
    /// Create a sensor for an identified device.
    pub fn new(name: impl Into<String>, device_info: DeviceInfo, monitor: AirQualityMonitor<D>) -> Self {
        Self {
            name: name.into(),
            unique_id: device_info.unique_id(),
            device_info,
            adapter: PollingAdapter::from_monitor(monitor),
        }
    }

    /// Unique id, `{model}-{mac}`.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity reported at setup.
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Unit of the primary value.
    pub fn unit_of_measurement(&self) -> &'static str {
        UNIT_OF_MEASUREMENT
    }

    /// Icon name.
    pub fn icon(&self) -> &'static str {
        ICON
    }

    /// The host should poll this entity.
    pub fn should_poll(&self) -> bool {
        true
    }

    /// Availability, `None` until the first update.
    pub fn available(&self) -> Option<bool> {
        self.adapter.available()
    }

    /// Primary value (PM2.5) from the last good poll.
    pub fn state(&self) -> Option<&PropertyValue> {
        self.adapter.state().map(EntityState::primary)
    }

    /// Last good snapshot.
    pub fn entity_state(&self) -> Option<&EntityState> {
        self.adapter.state()
    }

    /// State attributes. Before the first good poll every reading is null.
    pub fn attributes(&self) -> Map<String, PropertyValue> {
        match self.adapter.state() {
            Some(state) => state.attributes(),
            None => {
                let mut attrs: Map<String, PropertyValue> = [
                    ATTR_TEMPERATURE,
                    ATTR_HUMIDITY,
                    ATTR_CO2,
                    ATTR_TVOC,
                    ATTR_BATTERY_LEVEL,
                    ATTR_BATTERY_STATE,
                ]
                .into_iter()
                .map(|key| (key.to_string(), PropertyValue::Null))
                .collect();
                attrs.insert(
                    ATTR_MODEL.to_string(),
                    self.adapter.monitor().model_id().into(),
                );
                attrs
            }
        }
    }

    /// Monitor for sending commands.
    pub fn monitor(&self) -> &AirQualityMonitor<D> {
        self.adapter.monitor()
    }

    /// Fetch state from the device. Returns the resulting availability.
    pub async fn update(&mut self) -> bool {
        self.adapter.poll().await
    }
}

/// Set up a sensor from configuration.
///
/// `connect` builds the driver for the configured host and token. The
/// device is asked for its identity; a driver failure at this point is
/// reported as [`Error::NotReady`]. The returned sensor has been updated
/// once.
pub async fn setup<D, F>(config: &SensorConfig, connect: F) -> Result<AirQualitySensor<D>>
where
    D: Driver,
    F: FnOnce(&str, &Token) -> D,
{
    config
        .validate()
        .map_err(|e| Error::invalid_config(e.to_string()))?;

    info!(
        "Initializing with host {} (token {}...)",
        config.host,
        config.token.prefix()
    );

    let driver = connect(&config.host, &config.token);
    let device_info = driver
        .info()
        .await
        .map_err(|e| Error::not_ready(&config.host, e))?;

    info!(
        "{} {} {} detected",
        device_info.model, device_info.firmware_version, device_info.hardware_version
    );

    let monitor = AirQualityMonitor::with_model_id(driver, &device_info.model);
    let mut sensor = AirQualitySensor::new(config.name.clone(), device_info, monitor);
    sensor.update().await;
    Ok(sensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockDriverBuilder};
    use cleargrass_types::DeviceModel;
    use serde_json::json;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn config() -> SensorConfig {
        SensorConfig::new("192.168.1.20", TOKEN)
    }

    #[tokio::test]
    async fn test_setup_success() {
        let sensor = setup(&config(), |_, _| {
            MockDriverBuilder::new()
                .mac_address("78:11:DC:00:00:01")
                .build()
        })
        .await
        .unwrap();

        assert_eq!(sensor.unique_id(), "cgllc.airmonitor.s1-78:11:DC:00:00:01");
        assert_eq!(sensor.name(), "clear_grass");
        assert_eq!(sensor.unit_of_measurement(), "AQI");
        assert_eq!(sensor.icon(), "mdi:cloud");
        assert!(sensor.should_poll());
        assert_eq!(sensor.available(), Some(true));
        assert_eq!(sensor.state(), Some(&json!(9)));
    }

    #[tokio::test]
    async fn test_setup_passes_host_and_token() {
        let mut seen = None;
        let _ = setup(&config().with_name("Office"), |host, token| {
            seen = Some((host.to_string(), token.expose().to_string()));
            MockDriver::new(DeviceModel::B1)
        })
        .await
        .unwrap();

        assert_eq!(
            seen,
            Some(("192.168.1.20".to_string(), TOKEN.to_string()))
        );
    }

    #[tokio::test]
    async fn test_setup_unreachable_is_not_ready() {
        let err = setup(&config(), |_, _| MockDriverBuilder::new().unreachable().build())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotReady { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_setup_rejects_bad_token() {
        let bad = SensorConfig::new("192.168.1.20", "short");
        let err = setup(&bad, |_, _| MockDriver::new(DeviceModel::S1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_setup_picks_b1_profile() {
        let sensor = setup(&config(), |_, _| MockDriver::new(DeviceModel::B1))
            .await
            .unwrap();

        assert_eq!(sensor.monitor().model(), DeviceModel::B1);
        let attrs = sensor.attributes();
        assert_eq!(attrs["model"], json!("cgllc.airmonitor.b1"));
        assert_eq!(attrs["battery_level"], json!("0"));
    }

    #[tokio::test]
    async fn test_setup_unknown_model_reports_device_id() {
        let mut sensor = setup(&config(), |_, _| {
            let driver = MockDriver::new(DeviceModel::S1);
            driver.set_info(
                DeviceInfo::builder()
                    .model("cgllc.airmonitor.s2")
                    .mac_address("78:11:DC:00:00:09")
                    .build(),
            );
            driver
        })
        .await
        .unwrap();

        assert_eq!(sensor.monitor().model(), DeviceModel::S1);
        assert_eq!(sensor.unique_id(), "cgllc.airmonitor.s2-78:11:DC:00:00:09");
        assert_eq!(sensor.attributes()["model"], json!("cgllc.airmonitor.s2"));
        assert_eq!(
            sensor.entity_state().map(|s| s.model.as_str()),
            Some("cgllc.airmonitor.s2")
        );

        // Unchanged after a failed poll.
        sensor.monitor().driver().set_should_fail(true, None);
        assert!(!sensor.update().await);
        assert_eq!(sensor.attributes()["model"], json!("cgllc.airmonitor.s2"));
    }

    #[tokio::test]
    async fn test_attributes_before_first_update() {
        let info = DeviceInfo::builder()
            .model("cgllc.airmonitor.s1")
            .mac_address("78:11:DC:00:00:02")
            .build();
        let monitor = AirQualityMonitor::new(MockDriver::new(DeviceModel::S1), DeviceModel::S1);
        let sensor = AirQualitySensor::new("Hall", info, monitor);

        assert_eq!(sensor.available(), None);
        assert_eq!(sensor.state(), None);
        let attrs = sensor.attributes();
        assert_eq!(attrs.len(), 7);
        assert!(attrs["temperature"].is_null());
        assert_eq!(attrs["model"], json!("cgllc.airmonitor.s1"));
    }

    #[tokio::test]
    async fn test_update_failure_keeps_attributes() {
        let mut sensor = setup(&config(), |_, _| MockDriver::new(DeviceModel::S1))
            .await
            .unwrap();
        let before = sensor.attributes();

        sensor.monitor().driver().set_should_fail(true, None);
        assert!(!sensor.update().await);
        assert_eq!(sensor.available(), Some(false));
        assert_eq!(sensor.attributes(), before);
        assert_eq!(sensor.state(), Some(&json!(9)));
    }
}
