//! Estimate of the current server time between batches.

use std::time::Instant;

/// Maps local wall-clock time onto the server clock.
///
/// Each batch pins the server timestamp to the local instant it arrived;
/// the current server time is that timestamp plus the local time elapsed
/// since.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampEstimator {
    anchor: Option<(u64, Instant)>,
}

impl TimestampEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the timestamp of a batch received at `received_at`.
    pub fn update(&mut self, server_us: u64, received_at: Instant) {
        if let Some((previous_us, _)) = self.anchor {
            if server_us < previous_us {
                log::debug!("server clock went back from {previous_us}us to {server_us}us");
            }
        }
        self.anchor = Some((server_us, received_at));
    }

    /// Server time in microseconds at local instant `now`.
    ///
    /// Before the first batch there is nothing to anchor to and this
    /// returns 0.
    pub fn predict_now_us(&self, now: Instant) -> u64 {
        match self.anchor {
            Some((server_us, received_at)) => {
                let elapsed = now.saturating_duration_since(received_at);
                let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
                server_us.saturating_add(elapsed_us)
            }
            None => 0,
        }
    }

    /// Last server timestamp received, if any.
    pub fn last_server_us(&self) -> Option<u64> {
        self.anchor.map(|(server_us, _)| server_us)
    }
}
