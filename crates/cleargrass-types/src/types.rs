//! Core types for ClearGrass monitor data.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::error::StatusError;

/// A single property value as reported by the device.
///
/// Devices answer with a mix of strings and numbers. `Null` marks a property
/// that was requested but not delivered.
pub type PropertyValue = serde_json::Value;

static ABSENT: PropertyValue = PropertyValue::Null;

/// Per-model request profile: which properties to ask for and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelProfile {
    /// Model id reported by the device (`miIO.info`).
    pub model_id: &'static str,
    /// Properties requested on every poll, in request order.
    pub properties: &'static [&'static str],
    /// Driver method used to fetch the properties.
    pub fetch_method: &'static str,
}

const S1_PROFILE: ModelProfile = ModelProfile {
    model_id: "cgllc.airmonitor.s1",
    properties: &[
        "battery",
        "battery_state",
        "co2",
        "humidity",
        "pm25",
        "temperature",
        "tvoc",
    ],
    fetch_method: "get_prop",
};

const B1_PROFILE: ModelProfile = ModelProfile {
    model_id: "cgllc.airmonitor.b1",
    properties: &["co2e", "humidity", "pm25", "temperature", "tvoc"],
    fetch_method: "get_air_data",
};

/// Known ClearGrass air quality monitor variants.
///
/// The two variants answer slightly different schemas: the S1 reports `co2`
/// and battery fields, the B1 reports `co2e` and has no battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceModel {
    /// Qingping/ClearGrass Air Monitor S1.
    #[default]
    #[serde(rename = "cgllc.airmonitor.s1")]
    S1,
    /// ClearGrass Air Detector B1.
    #[serde(rename = "cgllc.airmonitor.b1")]
    B1,
}

impl DeviceModel {
    /// All supported models.
    pub const ALL: [DeviceModel; 2] = [DeviceModel::S1, DeviceModel::B1];

    /// Static request profile for this model.
    #[must_use]
    pub const fn profile(&self) -> &'static ModelProfile {
        match self {
            DeviceModel::S1 => &S1_PROFILE,
            DeviceModel::B1 => &B1_PROFILE,
        }
    }

    /// Model id string, e.g. `cgllc.airmonitor.s1`.
    #[must_use]
    pub const fn model_id(&self) -> &'static str {
        self.profile().model_id
    }

    /// Properties requested from the device on every poll.
    #[must_use]
    pub const fn properties(&self) -> &'static [&'static str] {
        self.profile().properties
    }

    /// Driver method used to fetch [`properties`](Self::properties).
    #[must_use]
    pub const fn fetch_method(&self) -> &'static str {
        self.profile().fetch_method
    }

    /// Look up a model by the id the device reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use cleargrass_types::DeviceModel;
    ///
    /// assert_eq!(DeviceModel::from_model_id("cgllc.airmonitor.b1"), Some(DeviceModel::B1));
    /// assert_eq!(DeviceModel::from_model_id("zhimi.airpurifier.m1"), None);
    /// ```
    #[must_use]
    pub fn from_model_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.model_id() == id)
    }
}

impl FromStr for DeviceModel {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_model_id(s).ok_or_else(|| StatusError::UnknownModel(s.to_string()))
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_id())
    }
}

/// Device identity as reported at setup time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Model id, e.g. `cgllc.airmonitor.s1`.
    pub model: String,
    /// Hardware (MAC) address.
    pub mac_address: String,
    /// Firmware version.
    pub firmware_version: String,
    /// Hardware version.
    pub hardware_version: String,
}

impl DeviceInfo {
    /// Create a builder for constructing `DeviceInfo`.
    pub fn builder() -> DeviceInfoBuilder {
        DeviceInfoBuilder::default()
    }

    /// Stable identifier of the form `{model}-{mac}`.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.model, self.mac_address)
    }
}

/// Builder for constructing `DeviceInfo`.
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct DeviceInfoBuilder {
    info: DeviceInfo,
}

impl DeviceInfoBuilder {
    /// Set the model id.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.info.model = model.into();
        self
    }

    /// Set the MAC address.
    pub fn mac_address(mut self, mac: impl Into<String>) -> Self {
        self.info.mac_address = mac.into();
        self
    }

    /// Set the firmware version.
    pub fn firmware_version(mut self, version: impl Into<String>) -> Self {
        self.info.firmware_version = version.into();
        self
    }

    /// Set the hardware version.
    pub fn hardware_version(mut self, version: impl Into<String>) -> Self {
        self.info.hardware_version = version.into();
        self
    }

    /// Build the `DeviceInfo`.
    pub fn build(self) -> DeviceInfo {
        self.info
    }
}

/// Raw property map from a single poll.
///
/// Lookups of unknown keys yield [`PropertyValue::Null`] instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStatus {
    properties: BTreeMap<String, PropertyValue>,
}

impl RawStatus {
    /// Create an empty status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair requested property names with the positional response values.
    ///
    /// Names without a matching value map to `Null`; surplus values are dropped.
    pub fn from_response<S: AsRef<str>>(properties: &[S], values: Vec<PropertyValue>) -> Self {
        let mut values = values.into_iter();
        properties
            .iter()
            .map(|name| {
                let value = values.next().unwrap_or(PropertyValue::Null);
                (name.as_ref().to_string(), value)
            })
            .collect()
    }

    /// Get a property, or `Null` if it was never reported.
    pub fn get(&self, key: &str) -> &PropertyValue {
        self.properties.get(key).unwrap_or(&ABSENT)
    }

    /// Whether the property is present with a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        !self.get(key).is_null()
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Number of stored properties (including null ones).
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are stored.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for RawStatus {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Attribute key for temperature.
pub const ATTR_TEMPERATURE: &str = "temperature";
/// Attribute key for humidity.
pub const ATTR_HUMIDITY: &str = "humidity";
/// Attribute key for CO2 (or CO2e on the B1).
pub const ATTR_CO2: &str = "co2";
/// Attribute key for TVOC.
pub const ATTR_TVOC: &str = "tvoc";
/// Attribute key for battery level.
pub const ATTR_BATTERY_LEVEL: &str = "battery_level";
/// Attribute key for battery state.
pub const ATTR_BATTERY_STATE: &str = "battery_state";
/// Attribute key for the model id.
pub const ATTR_MODEL: &str = "model";

/// Published sensor snapshot: PM2.5 as the primary value plus attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// PM2.5 reading, the entity's primary state.
    pub pm25: PropertyValue,
    /// Temperature.
    pub temperature: PropertyValue,
    /// Relative humidity.
    pub humidity: PropertyValue,
    /// CO2 (S1) or CO2e (B1).
    pub co2: PropertyValue,
    /// Total volatile organic compounds.
    pub tvoc: PropertyValue,
    /// Battery level, `"0"` when the model does not report one.
    pub battery_level: PropertyValue,
    /// Battery state, `"0"` when the model does not report one.
    pub battery_state: PropertyValue,
    /// Model id reported by the device.
    pub model: String,
    /// When the snapshot was taken.
    pub captured_at: time::OffsetDateTime,
}

impl EntityState {
    /// Primary state value (PM2.5).
    pub fn primary(&self) -> &PropertyValue {
        &self.pm25
    }

    /// Attribute map as published to the host.
    pub fn attributes(&self) -> Map<String, PropertyValue> {
        let mut attrs = Map::new();
        attrs.insert(ATTR_TEMPERATURE.into(), self.temperature.clone());
        attrs.insert(ATTR_HUMIDITY.into(), self.humidity.clone());
        attrs.insert(ATTR_CO2.into(), self.co2.clone());
        attrs.insert(ATTR_TVOC.into(), self.tvoc.clone());
        attrs.insert(ATTR_BATTERY_LEVEL.into(), self.battery_level.clone());
        attrs.insert(ATTR_BATTERY_STATE.into(), self.battery_state.clone());
        attrs.insert(ATTR_MODEL.into(), self.model.clone().into());
        attrs
    }
}
