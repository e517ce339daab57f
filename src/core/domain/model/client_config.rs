//! Tunables for the HTTP side of a collection cycle.

use crate::core::domain::error::ValidationError;
use std::num::NonZeroU32;
use std::time::Duration;

/// Path of the cluster-wide status document.
pub const DEFAULT_STATUS_PATH: &str = "/pools/default";

/// Upper bound on a single status request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-side limit on how often the status endpoint is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Returns both values as non-zero, as the limiter requires.
    pub(crate) fn validated(&self) -> Result<(NonZeroU32, NonZeroU32), ValidationError> {
        let rate = NonZeroU32::new(self.requests_per_second).ok_or_else(|| {
            ValidationError::Field {
                field: "requests_per_second".to_string(),
                message: "Rate limit must allow at least one request per second".to_string(),
            }
        })?;
        let burst = NonZeroU32::new(self.burst_size).ok_or_else(|| ValidationError::Field {
            field: "burst_size".to_string(),
            message: "Burst size cannot be 0".to_string(),
        })?;
        Ok((rate, burst))
    }
}

/// Settings for [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub status_path: String,
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            status_path: DEFAULT_STATUS_PATH.to_string(),
            rate_limit: None,
        }
    }
}
