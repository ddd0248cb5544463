//! One poll cycle: fetch, normalize, publish.
//!
//! [`PollingAdapter::poll`] is the only place driver failures are absorbed.
//! A failed tick marks the adapter unavailable and keeps the last good
//! [`EntityState`]; the next tick simply tries again.

use time::OffsetDateTime;
use tracing::{debug, error};

use cleargrass_types::{DeviceModel, EntityState};

use crate::device::AirQualityMonitor;
use crate::error::Result;
use crate::traits::Driver;

/// Drives poll cycles for one monitor and holds the last published snapshot.
///
/// `poll` takes `&mut self`, so one adapter never runs two cycles at once.
#[derive(Debug)]
pub struct PollingAdapter<D> {
    monitor: AirQualityMonitor<D>,
    available: Option<bool>,
    state: Option<EntityState>,
}

impl<D: Driver> PollingAdapter<D> {
    /// Create an adapter for `model`.
    pub fn new(driver: D, model: DeviceModel) -> Self {
        Self::from_monitor(AirQualityMonitor::new(driver, model))
    }

    /// Create an adapter around an existing monitor.
    pub fn from_monitor(monitor: AirQualityMonitor<D>) -> Self {
        Self {
            monitor,
            available: None,
            state: None,
        }
    }

    /// The monitor used for polling and commands.
    pub fn monitor(&self) -> &AirQualityMonitor<D> {
        &self.monitor
    }

    /// The configured model.
    pub fn model(&self) -> DeviceModel {
        self.monitor.model()
    }

    /// Availability after the last poll, `None` before the first one.
    pub fn available(&self) -> Option<bool> {
        self.available
    }

    /// Last successfully published snapshot.
    pub fn state(&self) -> Option<&EntityState> {
        self.state.as_ref()
    }

    /// Run one poll cycle and return the resulting availability.
    ///
    /// Errors are logged, never returned.
    pub async fn poll(&mut self) -> bool {
        match self.fetch().await {
            Ok(state) => {
                debug!("Published state for {}: pm25={}", self.model(), state.pm25);
                self.available = Some(true);
                self.state = Some(state);
                true
            }
            Err(e) => {
                self.available = Some(false);
                error!("Got exception while fetching the state: {}", e);
                false
            }
        }
    }

    /// Fetch and build a snapshot without touching the adapter's state.
    pub async fn fetch(&self) -> Result<EntityState> {
        let status = self.monitor.status().await?;

        Ok(EntityState {
            temperature: status.temperature()?,
            humidity: status.humidity()?,
            co2: status.co2()?,
            tvoc: status.tvoc()?,
            battery_level: status.battery(),
            battery_state: status.battery_state(),
            pm25: status.pm25()?,
            model: self.monitor.model_id().to_string(),
            captured_at: OffsetDateTime::now_utc(),
        })
    }
}
