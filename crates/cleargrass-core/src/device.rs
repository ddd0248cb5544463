//! ClearGrass monitor command surface.
//!
//! [`AirQualityMonitor`] pairs a [`Driver`] with a [`DeviceModel`] and turns
//! the model's request profile and the toggle commands into driver calls.
//! Every operation is a single request/response exchange with no retry.

use tracing::{debug, info, warn};

use cleargrass_types::{DeviceModel, PropertyValue, RawStatus, StatusView};

use crate::commands::{
    SET_AUTO_CLOSE, SET_NIGHT_STATE, SET_NIGHT_TIME, SET_POWER, SET_TIME_STATE, SUCCESS,
};
use crate::error::Result;
use crate::settings::{NightSchedule, Switch};
use crate::traits::Driver;

/// Whether a command response is the device's `["ok"]` acknowledgement.
pub fn is_success(response: &[PropertyValue]) -> bool {
    response.len() == SUCCESS.len()
        && response
            .iter()
            .zip(SUCCESS)
            .all(|(value, expected)| value.as_str() == Some(*expected))
}

/// A ClearGrass air quality monitor reachable through a [`Driver`].
#[derive(Debug)]
pub struct AirQualityMonitor<D> {
    driver: D,
    model: DeviceModel,
    model_id: String,
}

impl<D: Driver> AirQualityMonitor<D> {
    /// Create a monitor for a known model.
    pub fn new(driver: D, model: DeviceModel) -> Self {
        Self {
            driver,
            model,
            model_id: model.model_id().to_string(),
        }
    }

    /// Create a monitor from the model id the device reports.
    ///
    /// Unknown ids fall back to the [`DeviceModel::S1`] request profile, while
    /// [`model_id`](Self::model_id) keeps the reported id.
    pub fn with_model_id(driver: D, model_id: &str) -> Self {
        let model = DeviceModel::from_model_id(model_id).unwrap_or_else(|| {
            let fallback = DeviceModel::default();
            warn!(
                "Device model {} unsupported. Falling back to {}.",
                model_id, fallback
            );
            fallback
        });
        Self {
            driver,
            model,
            model_id: model_id.to_string(),
        }
    }

    /// The request profile in use.
    pub fn model(&self) -> DeviceModel {
        self.model
    }

    /// The model id as reported by the device.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Fetch the model's property list and wrap the answer in a [`StatusView`].
    ///
    /// A response whose length differs from the request is logged and still
    /// used: missing positions read as absent, surplus values are dropped.
    pub async fn status(&self) -> Result<StatusView> {
        let properties = self.model.properties();
        let method = self.model.fetch_method();

        let params: Vec<PropertyValue> = properties.iter().map(|p| (*p).into()).collect();
        let values = self.driver.invoke(method, &params).await?;

        if properties.len() != values.len() {
            warn!(
                "Count ({}) of requested properties does not match the count ({}) of received values.",
                properties.len(),
                values.len()
            );
        }

        let status = StatusView::new(RawStatus::from_response(properties, values));
        debug!("Got status from {}: {}", self.model, status);
        Ok(status)
    }

    /// Power on.
    pub async fn on(&self) -> Result<Vec<PropertyValue>> {
        info!("Powering on");
        self.send(SET_POWER, Switch::On.to_params()).await
    }

    /// Power off.
    pub async fn off(&self) -> Result<Vec<PropertyValue>> {
        info!("Powering off");
        self.send(SET_POWER, Switch::Off.to_params()).await
    }

    /// Show a clock instead of the AQI.
    pub async fn set_display_clock(&self, display_clock: bool) -> Result<Vec<PropertyValue>> {
        info!(
            "Turning {} display clock",
            Switch::from(display_clock).as_str()
        );
        self.send(SET_TIME_STATE, Switch::from(display_clock).to_params())
            .await
    }

    /// Toggle auto close.
    pub async fn set_auto_close(&self, auto_close: bool) -> Result<Vec<PropertyValue>> {
        info!("Turning {} auto close", Switch::from(auto_close).as_str());
        self.send(SET_AUTO_CLOSE, Switch::from(auto_close).to_params())
            .await
    }

    /// Decrease the brightness of the display.
    pub async fn set_night_mode(&self, night_mode: bool) -> Result<Vec<PropertyValue>> {
        info!("Turning {} night mode", Switch::from(night_mode).as_str());
        self.send(SET_NIGHT_STATE, Switch::from(night_mode).to_params())
            .await
    }

    /// Enable night mode daily between the given wall clock times.
    ///
    /// Fails with [`crate::Error::InvalidSchedule`] without contacting the
    /// device when either offset falls outside `0..=86399` seconds.
    pub async fn set_night_time(
        &self,
        begin_hour: i32,
        begin_minute: i32,
        end_hour: i32,
        end_minute: i32,
    ) -> Result<Vec<PropertyValue>> {
        let schedule = NightSchedule::from_hm(begin_hour, begin_minute, end_hour, end_minute)?;
        info!(
            "Setting night time to {}:{:02} - {}:{:02}",
            begin_hour, begin_minute, end_hour, end_minute
        );
        self.send(SET_NIGHT_TIME, schedule.to_params()).await
    }

    async fn send(&self, method: &str, params: Vec<PropertyValue>) -> Result<Vec<PropertyValue>> {
        let response = self.driver.invoke(method, &params).await?;
        if !is_success(&response) {
            debug!("Unexpected response to {}: {:?}", method, response);
        }
        Ok(response)
    }
}
