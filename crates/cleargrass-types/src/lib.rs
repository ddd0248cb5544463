//! Platform-agnostic types for ClearGrass air quality monitors.
//!
//! This crate provides the data shared by the polling and command layers
//! in `cleargrass-core`:
//!
//! - [`DeviceModel`] and its static request profile
//! - [`RawStatus`], the per-poll property map
//! - [`StatusView`], the normalized accessors over both device schemas
//! - [`EntityState`], the published sensor snapshot
//!
//! # Example
//!
//! ```
//! use cleargrass_types::{DeviceModel, RawStatus, StatusView};
//! use serde_json::json;
//!
//! let model = DeviceModel::B1;
//! let raw = RawStatus::from_response(
//!     model.properties(),
//!     vec![json!(620), json!(48), json!(9), json!(23.1), json!(150)],
//! );
//! let status = StatusView::new(raw);
//!
//! assert_eq!(status.co2().unwrap(), json!(620));
//! assert_eq!(status.battery(), json!("0"));
//! ```

pub mod error;
pub mod status;
pub mod types;

pub use error::{StatusError, StatusResult};
pub use status::{StatusView, UNKNOWN_BATTERY};
pub use types::{
    DeviceInfo, DeviceInfoBuilder, DeviceModel, EntityState, ModelProfile, PropertyValue,
    RawStatus,
};
