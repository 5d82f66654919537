//! Token bucket shared by every API endpoint.
//!
//! The bucket starts full and refills continuously at `refill_per_second`,
//! never holding more than `burst` tokens. A request that finds less than
//! one token is rejected immediately; nothing ever waits.

use std::sync::Mutex;
use std::time::Instant;

use tracing::debug;

use crate::config::RateLimitConfig;

pub struct RateLimiter {
    refill_per_second: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = f64::from(config.burst);
        Self {
            refill_per_second: config.refill_per_second.max(0.0),
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Takes one token if available.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// `try_acquire` against an explicit clock reading. Readings older than
    /// the last refill add no tokens.
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        // A poisoned bucket still holds a consistent pair of numbers.
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());

        let elapsed = now.saturating_duration_since(bucket.last_refill);
        if !elapsed.is_zero() {
            bucket.tokens =
                (bucket.tokens + elapsed.as_secs_f64() * self.refill_per_second).min(self.burst);
            bucket.last_refill = now;
        }

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            debug!(tokens = bucket.tokens, "Rate limiter bucket empty");
            false
        }
    }
}
