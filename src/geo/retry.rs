//! Bounded retry with a fixed delay for reverse geocoding
//!
//! [`resolve_location`] never fails: after the last attempt it settles on the
//! unknown placeholder. Failed attempts are only logged.

use crate::constants::text::UNKNOWN;
use crate::geo::{Coordinates, ReverseGeocoder};
use std::time::Duration;
use tracing::warn;

/// Attempts and fixed delay between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_retries: u32,
    /// Sleep between consecutive attempts (not exponential)
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_millis(500),
        }
    }
}

/// Resolve "<settlement> / <province>" for a coordinate pair
pub async fn resolve_location<G: ReverseGeocoder>(
    geocoder: &G,
    coords: Coordinates,
    policy: RetryPolicy,
) -> String {
    for attempt in 1..=policy.max_retries {
        match geocoder.reverse(coords).await {
            Ok(address) => return address.label(),
            Err(err) => {
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    lat = coords.lat,
                    lon = coords.lon,
                    error = %err,
                    "reverse geocoding attempt failed"
                );
                if attempt < policy.max_retries {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    UNKNOWN.to_string()
}
