//! Mock driver implementation for testing.
//!
//! This module provides a mock driver that can be used for unit testing
//! without a monitor on the network.
//!
//! The [`MockDriver`] implements the [`Driver`] trait, allowing it to be
//! used interchangeably with real transports in generic code.
//!
//! # Features
//!
//! - **Scripted responses**: Set the values returned for each driver method
//! - **Failure injection**: Fail every call, or only the next N calls
//! - **Latency simulation**: Add artificial delays to simulate slow round trips
//! - **Call recording**: Inspect every method and parameter list sent

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use cleargrass_types::{DeviceInfo, DeviceModel, PropertyValue};

use crate::error::{Error, Result};
use crate::traits::Driver;

/// Method name reported for failed identity queries.
const INFO_METHOD: &str = "miIO.info";

/// A single recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverCall {
    /// Method name.
    pub method: String,
    /// Positional parameters.
    pub params: Vec<PropertyValue>,
}

/// A mock ClearGrass driver for testing.
///
/// Implements [`Driver`] for use in generic code and testing. Methods
/// without a scripted response answer `["ok"]`.
///
/// # Example
///
/// ```
/// use cleargrass_core::{AirQualityMonitor, MockDriver};
/// use cleargrass_types::DeviceModel;
///
/// #[tokio::main]
/// async fn main() {
///     let monitor = AirQualityMonitor::new(MockDriver::new(DeviceModel::S1), DeviceModel::S1);
///     let status = monitor.status().await.unwrap();
///     assert!(status.pm25().is_ok());
/// }
/// ```
pub struct MockDriver {
    info: Mutex<DeviceInfo>,
    responses: Mutex<HashMap<String, Vec<PropertyValue>>>,
    calls: Mutex<Vec<DriverCall>>,
    should_fail: AtomicBool,
    fail_message: Mutex<String>,
    /// Simulated round trip latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    /// Number of calls to fail before succeeding.
    remaining_failures: AtomicU32,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("info", &*lock(&self.info))
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockDriver {
    /// Create a new mock driver with default readings.
    pub fn new(model: DeviceModel) -> Self {
        MockDriverBuilder::new().model(model).build()
    }

    fn default_info(model: DeviceModel) -> DeviceInfo {
        let [a, b, c] = rand::random::<[u8; 3]>();
        DeviceInfo::builder()
            .model(model.model_id())
            .mac_address(format!("78:11:DC:{:02X}:{:02X}:{:02X}", a, b, c))
            .firmware_version("4.1.8_9999")
            .hardware_version("MW300")
            .build()
    }

    fn default_responses() -> HashMap<String, Vec<PropertyValue>> {
        let mut responses = HashMap::new();
        responses.insert(
            DeviceModel::S1.fetch_method().to_string(),
            vec![
                json!(100),
                json!("charging"),
                json!(620),
                json!(45.2),
                json!(9),
                json!(22.4),
                json!(180),
            ],
        );
        responses.insert(
            DeviceModel::B1.fetch_method().to_string(),
            vec![json!(620), json!(45), json!(9), json!(22.4), json!(180)],
        );
        responses
    }

    /// All calls sent so far, in order.
    pub fn calls(&self) -> Vec<DriverCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls sent so far.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Script the values returned for `method`.
    pub fn set_response(&self, method: &str, values: Vec<PropertyValue>) {
        lock(&self.responses).insert(method.to_string(), values);
    }

    /// Replace the reported device identity.
    pub fn set_info(&self, info: DeviceInfo) {
        *lock(&self.info) = info;
    }

    /// Make every call fail (or succeed again).
    pub fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *lock(&self.fail_message) = msg.to_string();
        }
    }

    /// Fail the next `count` calls, then succeed.
    pub fn set_transient_failures(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Set simulated round trip latency.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    async fn check_should_fail(&self, method: &str) -> Result<()> {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        let transient = self
            .remaining_failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();

        if transient || self.should_fail.load(Ordering::Relaxed) {
            let message = lock(&self.fail_message).clone();
            return Err(Error::driver(method, message));
        }
        Ok(())
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn invoke(&self, method: &str, params: &[PropertyValue]) -> Result<Vec<PropertyValue>> {
        lock(&self.calls).push(DriverCall {
            method: method.to_string(),
            params: params.to_vec(),
        });
        self.check_should_fail(method).await?;

        let response = lock(&self.responses)
            .get(method)
            .cloned()
            .unwrap_or_else(|| vec![json!("ok")]);
        Ok(response)
    }

    async fn info(&self) -> Result<DeviceInfo> {
        self.check_should_fail(INFO_METHOD).await?;
        Ok(lock(&self.info).clone())
    }
}

/// Builder for creating mock drivers with custom settings.
#[derive(Debug)]
#[must_use]
pub struct MockDriverBuilder {
    model: DeviceModel,
    mac_address: Option<String>,
    responses: HashMap<String, Vec<PropertyValue>>,
    unreachable: bool,
}

impl Default for MockDriverBuilder {
    fn default() -> Self {
        Self {
            model: DeviceModel::S1,
            mac_address: None,
            responses: MockDriver::default_responses(),
            unreachable: false,
        }
    }
}

impl MockDriverBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model reported by `info()`.
    pub fn model(mut self, model: DeviceModel) -> Self {
        self.model = model;
        self
    }

    /// Set the MAC address reported by `info()`.
    pub fn mac_address(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = Some(mac.into());
        self
    }

    /// Script the values returned for `method`.
    pub fn response(mut self, method: &str, values: Vec<PropertyValue>) -> Self {
        self.responses.insert(method.to_string(), values);
        self
    }

    /// Make every call fail as if the device were offline.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Build the mock driver.
    pub fn build(self) -> MockDriver {
        let mut info = MockDriver::default_info(self.model);
        if let Some(mac) = self.mac_address {
            info.mac_address = mac;
        }

        MockDriver {
            info: Mutex::new(info),
            responses: Mutex::new(self.responses),
            calls: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(self.unreachable),
            fail_message: Mutex::new("Mock failure".to_string()),
            latency_ms: AtomicU64::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let driver = MockDriverBuilder::new().build();
        driver.invoke("set_power", &[json!("on")]).await.unwrap();

        assert_eq!(
            driver.calls(),
            vec![DriverCall {
                method: "set_power".to_string(),
                params: vec![json!("on")],
            }]
        );
        driver.clear_calls();
        assert_eq!(driver.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_scripted_response() {
        let driver = MockDriverBuilder::new()
            .response("get_prop", vec![json!(1)])
            .build();
        assert_eq!(driver.invoke("get_prop", &[]).await.unwrap(), vec![json!(1)]);

        driver.set_response("get_prop", vec![json!(2)]);
        assert_eq!(driver.invoke("get_prop", &[]).await.unwrap(), vec![json!(2)]);
    }

    #[tokio::test]
    async fn test_mock_unscripted_method_answers_ok() {
        let driver = MockDriverBuilder::new().build();
        assert_eq!(
            driver.invoke("set_time_state", &[]).await.unwrap(),
            vec![json!("ok")]
        );
    }

    #[tokio::test]
    async fn test_mock_fail() {
        let driver = MockDriverBuilder::new().build();
        driver.set_should_fail(true, Some("Test error"));

        let result = driver.invoke("get_prop", &[]).await;
        assert!(result.unwrap_err().to_string().contains("Test error"));
        assert!(driver.info().await.is_err());

        driver.set_should_fail(false, None);
        assert!(driver.invoke("get_prop", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_transient_failures() {
        let driver = MockDriverBuilder::new().build();
        driver.set_transient_failures(2);

        assert!(driver.invoke("get_prop", &[]).await.is_err());
        assert!(driver.invoke("get_prop", &[]).await.is_err());
        assert!(driver.invoke("get_prop", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_unreachable() {
        let driver = MockDriverBuilder::new().unreachable().build();
        let err = driver.info().await.unwrap_err();
        assert!(matches!(err, Error::Driver { ref method, .. } if method == "miIO.info"));
    }

    #[tokio::test]
    async fn test_mock_info() {
        let driver = MockDriverBuilder::new()
            .model(DeviceModel::B1)
            .mac_address("78:11:DC:AA:BB:CC")
            .build();
        let info = driver.info().await.unwrap();
        assert_eq!(info.model, "cgllc.airmonitor.b1");
        assert_eq!(info.mac_address, "78:11:DC:AA:BB:CC");
    }

    #[test]
    fn test_default_info_has_random_mac() {
        let driver = MockDriver::new(DeviceModel::S1);
        let mac = lock(&driver.info).mac_address.clone();
        assert!(mac.starts_with("78:11:DC:"));
        assert_eq!(mac.len(), 17);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency() {
        let driver = MockDriverBuilder::new().build();
        driver.set_latency(Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        driver.invoke("get_prop", &[]).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
