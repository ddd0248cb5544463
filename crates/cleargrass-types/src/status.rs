//! Normalized read access over a [`RawStatus`].
//!
//! The S1 and B1 answer different schemas. [`StatusView`] hides the
//! differences behind one accessor per field:
//!
//! | Accessor | Source key | When absent |
//! |----------|------------|-------------|
//! | `temperature` | `temperature` | error |
//! | `humidity` | `humidity` | error |
//! | `pm25` | `pm25` | error |
//! | `tvoc` | `tvoc` | error |
//! | `co2` | `co2`, then `co2e` | error |
//! | `battery` | `battery` | `"0"` |
//! | `battery_state` | `battery_state` | `"0"` |
//! | `is_on` | `power == "on"` | `false` |
//!
//! A `Null` value counts as absent.

use core::fmt;

use crate::error::{StatusError, StatusResult};
use crate::types::{PropertyValue, RawStatus};

/// Value reported for battery fields the device does not provide.
pub const UNKNOWN_BATTERY: &str = "0";

/// Read-only view over one poll's properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusView {
    raw: RawStatus,
}

impl StatusView {
    /// Wrap a raw status.
    pub fn new(raw: RawStatus) -> Self {
        Self { raw }
    }

    fn required(&self, key: &str) -> StatusResult<PropertyValue> {
        let value = self.raw.get(key);
        if value.is_null() {
            Err(StatusError::missing(key))
        } else {
            Ok(value.clone())
        }
    }

    fn or_unknown(&self, key: &str) -> PropertyValue {
        let value = self.raw.get(key);
        if value.is_null() {
            PropertyValue::from(UNKNOWN_BATTERY)
        } else {
            value.clone()
        }
    }

    /// Raw power state string.
    pub fn power(&self) -> StatusResult<PropertyValue> {
        self.required("power")
    }

    /// Whether the device reports `power == "on"`.
    pub fn is_on(&self) -> bool {
        self.raw.get("power").as_str() == Some("on")
    }

    /// Alias of [`is_on`](Self::is_on).
    pub fn power_on(&self) -> bool {
        self.is_on()
    }

    /// Temperature.
    pub fn temperature(&self) -> StatusResult<PropertyValue> {
        self.required("temperature")
    }

    /// Relative humidity.
    pub fn humidity(&self) -> StatusResult<PropertyValue> {
        self.required("humidity")
    }

    /// CO2 from `co2`, or CO2e from `co2e` when the former is absent.
    pub fn co2(&self) -> StatusResult<PropertyValue> {
        if self.raw.contains("co2") {
            return self.required("co2");
        }
        self.required("co2e").map_err(|_| StatusError::missing("co2"))
    }

    /// Total volatile organic compounds.
    pub fn tvoc(&self) -> StatusResult<PropertyValue> {
        self.required("tvoc")
    }

    /// PM2.5.
    pub fn pm25(&self) -> StatusResult<PropertyValue> {
        self.required("pm25")
    }

    /// Battery level, or [`UNKNOWN_BATTERY`].
    pub fn battery(&self) -> PropertyValue {
        self.or_unknown("battery")
    }

    /// Battery state, or [`UNKNOWN_BATTERY`].
    pub fn battery_state(&self) -> PropertyValue {
        self.or_unknown("battery_state")
    }
}

impl From<RawStatus> for StatusView {
    fn from(raw: RawStatus) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(value: StatusResult<PropertyValue>) -> String {
            value.map_or_else(|_| "-".to_string(), |v| v.to_string())
        }

        write!(
            f,
            "<StatusView humidity={}, co2={}, tvoc={}, pm25={}, battery={}, battery_state={}>",
            show(self.humidity()),
            show(self.co2()),
            show(self.tvoc()),
            show(self.pm25()),
            self.battery(),
            self.battery_state(),
        )
    }
}
