//! Finger capture collaborator
//!
//! Enrollment pauses between its begin and complete commands while the
//! terminal captures the finger. The terminal gives no progress feedback over
//! the wire, so the pause is delegated to a [`CaptureMonitor`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

/// Capture wait failures
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture not completed within {0:?}")]
    TimedOut(Duration),

    #[error("Capture aborted: {0}")]
    Aborted(String),
}

/// Suspension point between the two enrollment phases
///
/// Implementations resolve once the terminal has captured the finger, e.g.
/// by polling a device status source or awaiting a hardware callback. The
/// caller bounds the wait with its capture timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptureMonitor: Send + Sync {
    async fn wait_for_capture(&self, user_id: u32, finger_index: u32) -> Result<(), CaptureError>;
}

/// Waits a fixed time and assumes the capture happened
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayCapture {
    delay: Duration,
}

impl FixedDelayCapture {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelayCapture {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            biogate_core::constants::DEFAULT_CAPTURE_DELAY_MS,
        ))
    }
}

#[async_trait]
impl CaptureMonitor for FixedDelayCapture {
    async fn wait_for_capture(&self, user_id: u32, finger_index: u32) -> Result<(), CaptureError> {
        info!(
            "Place finger {} of user {} on the sensor ({:?})",
            finger_index, user_id, self.delay
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Run `monitor` bounded by `limit`
pub(crate) async fn await_capture(
    monitor: &dyn CaptureMonitor,
    limit: Duration,
    user_id: u32,
    finger_index: u32,
) -> Result<(), CaptureError> {
    match tokio::time::timeout(limit, monitor.wait_for_capture(user_id, finger_index)).await {
        Ok(result) => result,
        Err(_) => Err(CaptureError::TimedOut(limit)),
    }
}
