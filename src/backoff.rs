//! Retry delay policy shared by email delivery and the job queue

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BackoffStrategy;

/// Largest exponent applied to the base delay; later attempts reuse it.
const MAX_EXPONENT: u32 = 20;

/// Delay policy between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backoff {
    #[serde(rename = "type")]
    pub strategy: BackoffStrategy,
    /// Base delay in milliseconds
    pub delay_ms: u64,
}

impl Backoff {
    pub fn fixed(delay_ms: u64) -> Self {
        Self {
            strategy: BackoffStrategy::Fixed,
            delay_ms,
        }
    }

    pub fn exponential(delay_ms: u64) -> Self {
        Self {
            strategy: BackoffStrategy::Exponential,
            delay_ms,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Fixed backoff always returns the base delay. Exponential backoff
    /// returns `delay * 2^(attempt - 1)`, saturating instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ms = match self.strategy {
            BackoffStrategy::Fixed => self.delay_ms,
            BackoffStrategy::Exponential => {
                let exponent = attempt.saturating_sub(1).min(MAX_EXPONENT);
                self.delay_ms.saturating_mul(1u64 << exponent)
            }
        };
        Duration::from_millis(ms)
    }
}
