//! Rate limiting for the local gateway.
//!
//! The gateway accepts at most `max_calls` upstream calls in any trailing
//! `window`. Unlike a client-side limiter it never waits: a call over the
//! limit is rejected with [`TaoError::RateLimitExceeded`](crate::TaoError)
//! and the caller decides when to retry.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tao_income_api::rate_limit::{RateLimitConfig, RateLimitedClient};
//! use tao_income_api::rest::{TaoClient, TaoRestClient};
//!
//! # async fn run() -> tao_income_api::Result<()> {
//! let client = RateLimitedClient::new(TaoRestClient::new(), RateLimitConfig::default());
//!
//! // Rejected once ten calls have been made in the last minute.
//! let current = client.current().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod clock;
mod window;

pub use client::{RateLimitStatus, RateLimitedClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use window::CallWindow;

use std::time::Duration;

/// Default maximum calls per window.
pub const DEFAULT_MAX_CALLS: u32 = 10;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum calls accepted per window.
    pub max_calls: u32,
    /// Trailing window length.
    pub window: Duration,
    /// Whether to enable rate limiting.
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            window: DEFAULT_WINDOW,
            enabled: true,
        }
    }
}
