//! Fixed-cadence polling loop.
//!
//! Hosts that schedule updates themselves call
//! [`AirQualitySensor::update`] directly. The [`Collector`] is for hosts
//! that want the cadence handled for them: it ticks on a fixed interval,
//! publishes a [`SensorSnapshot`] after every tick, and stops when its
//! cancellation token fires. A failed tick is not retried early; the loop
//! waits for the next tick.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cleargrass_types::EntityState;

use crate::sensor::AirQualitySensor;
use crate::traits::Driver;

/// Default time between polls.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// What the collector publishes after each tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Availability after the tick.
    pub available: Option<bool>,
    /// Last good state.
    pub state: Option<EntityState>,
}

impl SensorSnapshot {
    fn of<D: Driver>(sensor: &AirQualitySensor<D>) -> Self {
        Self {
            available: sensor.available(),
            state: sensor.entity_state().cloned(),
        }
    }
}

/// Polls one sensor on a fixed interval.
pub struct Collector<D> {
    sensor: AirQualitySensor<D>,
    period: Duration,
    tx: watch::Sender<SensorSnapshot>,
}

impl<D: Driver + 'static> Collector<D> {
    /// Create a collector polling every `period`.
    pub fn new(sensor: AirQualitySensor<D>, period: Duration) -> Self {
        let (tx, _) = watch::channel(SensorSnapshot::of(&sensor));
        Self { sensor, period, tx }
    }

    /// Create a collector with [`DEFAULT_SCAN_INTERVAL`].
    pub fn with_default_interval(sensor: AirQualitySensor<D>) -> Self {
        Self::new(sensor, DEFAULT_SCAN_INTERVAL)
    }

    /// Receive a snapshot after every tick.
    pub fn subscribe(&self) -> watch::Receiver<SensorSnapshot> {
        self.tx.subscribe()
    }

    /// Run until `cancel` fires, then hand the sensor back.
    ///
    /// The first tick happens one period after start, since [`crate::setup`]
    /// already polled once.
    pub async fn run(self, cancel: CancellationToken) -> AirQualitySensor<D> {
        let Self {
            mut sensor,
            period,
            tx,
        } = self;

        info!(
            "Starting collector for {} (interval: {}s)",
            sensor.unique_id(),
            period.as_secs()
        );

        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {
                    let available = sensor.update().await;
                    debug!("Tick for {}: available={}", sensor.unique_id(), available);
                    tx.send_replace(SensorSnapshot::of(&sensor));
                }
            }
        }

        info!("Stopped collector for {}", sensor.unique_id());
        sensor
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<AirQualitySensor<D>> {
        tokio::spawn(self.run(cancel))
    }
}
