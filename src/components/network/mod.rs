//! Network association and clock synchronization collaborators.
//!
//! Both expose a one-shot condition the cycle waits on with a bounded
//! timeout. Reconnect-on-drop is the provider's own business and invisible
//! here.

use crate::error::{network_error, time_sync_error, CalResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::info;

/// Brings the network link up and signals the connected condition
#[async_trait]
pub trait NetworkProvider: Send {
    fn init(&mut self) -> CalResult<()>;

    fn start(&mut self) -> CalResult<()>;

    /// Block until the connected condition is signaled, or time out
    async fn wait_connected(&mut self, limit: Duration) -> CalResult<()>;
}

/// Synchronizes the wall clock and reports device-local time
#[async_trait]
pub trait ClockSyncProvider: Send {
    fn start_sync(&mut self) -> CalResult<()>;

    /// Block until the time-set condition is signaled, or time out.
    /// Timing out is not fatal: `now()` then reports best-effort time.
    async fn wait_synced(&mut self, limit: Duration) -> CalResult<()>;

    /// Current wall-clock time in the device's timezone
    fn now(&self) -> DateTime<Tz>;
}

/// Host network: the OS owns the link, so the condition is signaled as soon
/// as the provider starts. The appliance build swaps in its Wi-Fi driver.
pub struct SystemNetwork {
    connected_tx: watch::Sender<bool>,
    connected_rx: watch::Receiver<bool>,
}

impl SystemNetwork {
    pub fn new() -> Self {
        let (connected_tx, connected_rx) = watch::channel(false);
        Self {
            connected_tx,
            connected_rx,
        }
    }
}

impl Default for SystemNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkProvider for SystemNetwork {
    fn init(&mut self) -> CalResult<()> {
        Ok(())
    }

    fn start(&mut self) -> CalResult<()> {
        let _ = self.connected_tx.send(true);
        Ok(())
    }

    async fn wait_connected(&mut self, limit: Duration) -> CalResult<()> {
        timeout(limit, self.connected_rx.wait_for(|connected| *connected))
            .await
            .map_err(|_| {
                network_error(&format!(
                    "Network not associated within {} s",
                    limit.as_secs()
                ))
            })?
            .map_err(|_| network_error("Network provider dropped its signal"))?;

        info!("Network connected");
        Ok(())
    }
}

/// Host clock: system time is already synchronized, converted through the
/// configured timezone.
pub struct SystemClock {
    tz: Tz,
    synced_tx: watch::Sender<bool>,
    synced_rx: watch::Receiver<bool>,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        let (synced_tx, synced_rx) = watch::channel(false);
        Self {
            tz,
            synced_tx,
            synced_rx,
        }
    }
}

#[async_trait]
impl ClockSyncProvider for SystemClock {
    fn start_sync(&mut self) -> CalResult<()> {
        let _ = self.synced_tx.send(true);
        Ok(())
    }

    async fn wait_synced(&mut self, limit: Duration) -> CalResult<()> {
        timeout(limit, self.synced_rx.wait_for(|synced| *synced))
            .await
            .map_err(|_| {
                time_sync_error(&format!(
                    "Clock not synchronized within {} s",
                    limit.as_secs()
                ))
            })?
            .map_err(|_| time_sync_error("Clock provider dropped its signal"))?;

        info!("Clock synchronized");
        Ok(())
    }

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}
