//! @ai:module:intent Fixed pacing between consecutive generation calls
//! @ai:module:layer infrastructure
//! @ai:module:public_api RequestPacer
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Enforces a fixed delay between text-generation requests
///
/// The service is rate-limited per account; students are processed
/// sequentially with a pause between one student's call and the next.
pub struct RequestPacer {
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    /// @ai:intent Create a pacer with the given inter-request delay
    /// @ai:effects pure
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(None),
        }
    }

    /// @ai:intent Wait until the delay since the previous request has elapsed
    /// @ai:effects state:write, time
    pub async fn pause(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_millis(200));

        let start = Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_second_request_waits_for_delay() {
        let pacer = RequestPacer::new(Duration::from_millis(120));

        pacer.pause().await;
        let start = Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
