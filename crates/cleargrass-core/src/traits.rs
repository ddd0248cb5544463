//! Trait abstractions for the device driver boundary.
//!
//! The local control protocol (encryption, handshakes, message ids) lives
//! outside this crate. Anything that can send a method call to the device
//! and hand back the positional result implements [`Driver`].

use async_trait::async_trait;

use cleargrass_types::{DeviceInfo, PropertyValue};

use crate::error::Result;

/// Trait abstracting the device control call.
///
/// This trait enables writing code that works with both real transports
/// and [`crate::MockDriver`] for testing.
///
/// # Example
///
/// ```ignore
/// use cleargrass_core::{Driver, Result};
///
/// async fn power_on<D: Driver>(driver: &D) -> Result<()> {
///     driver.invoke("set_power", &["on".into()]).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Driver: Send + Sync {
    /// Send `method` with positional `params` and return the positional result.
    ///
    /// Failures should be reported as [`crate::Error::Driver`].
    async fn invoke(&self, method: &str, params: &[PropertyValue]) -> Result<Vec<PropertyValue>>;

    /// Query device identity (model, MAC address, versions).
    async fn info(&self) -> Result<DeviceInfo>;
}

#[async_trait]
impl<D: Driver + ?Sized> Driver for std::sync::Arc<D> {
    async fn invoke(&self, method: &str, params: &[PropertyValue]) -> Result<Vec<PropertyValue>> {
        (**self).invoke(method, params).await
    }

    async fn info(&self) -> Result<DeviceInfo> {
        (**self).info().await
    }
}
