//! Clock abstraction for the pipeline's fixed-duration waits.
//!
//! The poll interval and confirmation window go through this trait so
//! tests drive the pipeline without real elapsed time.

use std::time::Duration;

#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the tokio timer.
pub struct TokioClock;

#[async_trait::async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
