use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{GeocodeError, Geocoder, LookupOutcome};
use crate::model::AddressRow;

/// Throttling and retry settings for a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Minimum time between the start of two provider calls.
    pub min_delay: Duration,
    /// Extra attempts after a transient failure.
    pub max_retries: u32,
    /// Pause after a transient failure before the next attempt.
    pub error_wait: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_retries: 2,
            error_wait: Duration::from_secs(3),
        }
    }
}

impl RateLimitPolicy {
    /// A policy that never sleeps. Retries still happen.
    pub fn unthrottled(max_retries: u32) -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_retries,
            error_wait: Duration::ZERO,
        }
    }
}

/// Wraps a [`Geocoder`] so calls are spaced out and retried, and so no
/// provider error ever escapes: every failure becomes a [`LookupOutcome`].
#[derive(Debug)]
pub struct RateLimiter<G> {
    geocoder: G,
    policy: RateLimitPolicy,
    last_call: Option<Instant>,
}

impl<G: Geocoder> RateLimiter<G> {
    pub fn new(geocoder: G, policy: RateLimitPolicy) -> Self {
        Self {
            geocoder,
            policy,
            last_call: None,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    pub fn into_inner(self) -> G {
        self.geocoder
    }

    pub fn lookup(&mut self, address: &AddressRow) -> LookupOutcome {
        let mut retries = 0;
        loop {
            self.wait_for_slot();
            match self.geocoder.lookup(address) {
                Ok(Some(coordinates)) => return LookupOutcome::Found(coordinates),
                Ok(None) => return LookupOutcome::NotFound,
                Err(GeocodeError::Transient(reason)) if retries < self.policy.max_retries => {
                    retries += 1;
                    warn!(
                        %address,
                        %reason,
                        attempt = retries,
                        "geocoding failed, retrying"
                    );
                    thread::sleep(self.policy.error_wait);
                }
                Err(GeocodeError::Transient(reason)) => {
                    warn!(%address, %reason, "geocoding failed, giving up");
                    return LookupOutcome::RetriesExhausted(reason);
                }
                Err(GeocodeError::Unexpected(reason)) => {
                    warn!(%address, %reason, "geocoding raised an unexpected error");
                    return LookupOutcome::Unexpected(reason);
                }
            }
        }
    }

    fn wait_for_slot(&mut self) {
        if let Some(last_call) = self.last_call {
            let elapsed = last_call.elapsed();
            if elapsed < self.policy.min_delay {
                let pause = self.policy.min_delay - elapsed;
                debug!(?pause, "throttling geocoder");
                thread::sleep(pause);
            }
        }
        self.last_call = Some(Instant::now());
    }
}
