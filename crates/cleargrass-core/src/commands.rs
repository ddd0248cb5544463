//! Driver method names for ClearGrass monitors.
//!
//! Toggle commands take a single `"on"`/`"off"` parameter.

/// Switch power.
/// Format: `["on" | "off"]`
pub const SET_POWER: &str = "set_power";

/// Show a clock instead of the AQI on the display.
/// Format: `["on" | "off"]`
pub const SET_TIME_STATE: &str = "set_time_state";

/// Auto close toggle.
/// Format: `["on" | "off"]`
pub const SET_AUTO_CLOSE: &str = "set_auto_close";

/// Dim the display.
/// Format: `["on" | "off"]`
pub const SET_NIGHT_STATE: &str = "set_night_state";

/// Daily night mode window.
/// Format: `[begin_seconds, end_seconds]`, both seconds since midnight.
pub const SET_NIGHT_TIME: &str = "set_night_time";

/// Response body the device sends for an accepted command.
pub const SUCCESS: &[&str] = &["ok"];
