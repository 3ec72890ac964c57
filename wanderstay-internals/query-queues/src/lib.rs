//! Wanderstay Query Queues
//! Copyright (c) 2026 Wanderstay contributors
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! wanderstay-internals/query-queues
//! A work queue that bounds concurrent calls to an external service and retries
//! failures with exponential backoff and jitter, plus a search sequencer that
//! lets callers discard responses superseded by a newer search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time;

/// Custom error for the work queue
#[derive(Debug, Error)]
pub enum QueryQueueError {
    #[error("max retries exceeded: {0}")]
    MaxRetriesExceeded(#[source] anyhow::Error),
    #[error("queue is closed")]
    QueueClosed,
}

/// A work queue that limits concurrent requests to an external service
/// and uses exponential backoff with jitter for retries
///
/// # Examples
///
/// ```ignore
/// let queue = QueryQueue::with_max_concurrent(4);
/// let body = queue.with_retry(|| async { fetch().await }).await?;
/// ```
#[derive(Clone, Debug)]
pub struct QueryQueue {
    semaphore: Arc<Semaphore>,
    initial_delay: Duration,
    max_delay: Duration,
    jitter_factor: f64,
    max_retries: u32,
    exponential: bool,
}

impl Default for QueryQueue {
    fn default() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(4)),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(30000),
            jitter_factor: 0.5,
            max_retries: 3,
            exponential: true,
        }
    }
}

impl QueryQueue {
    /// Create a new work queue with max concurrent requests
    pub fn with_max_concurrent(max_concurrent: u64) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent as usize)),
            ..Default::default()
        }
    }

    /// Override the retry budget. Zero retries means a single attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Execute a function with concurrency limiting and retry
    ///
    /// The function `f` should return `Result<T, anyhow::Error>`.
    /// If the function returns `Err`, it will be retried with exponential
    /// backoff and jitter until the retry budget is exhausted.
    pub async fn with_retry<T, F, Fut>(&self, mut f: F) -> Result<T, QueryQueueError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| QueryQueueError::QueueClosed)?;

        let mut retry_count = 0;
        let mut delay = self.initial_delay;

        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    retry_count += 1;
                    if retry_count > self.max_retries {
                        return Err(QueryQueueError::MaxRetriesExceeded(e));
                    }

                    let jittered_delay = self.apply_jitter(delay);
                    time::sleep(jittered_delay).await;

                    if self.exponential {
                        delay = std::cmp::min(delay * 2, self.max_delay);
                    }
                }
            }
        }
    }

    /// Apply jitter to the delay
    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor == 0.0 {
            return delay;
        }

        let jitter_ms = (delay.as_millis() as f64 * self.jitter_factor) as u64;
        let rand_jitter = rand::thread_rng().gen_range(0..=jitter_ms);

        Duration::from_millis(delay.as_millis() as u64 + rand_jitter)
    }
}

/// Monotonic generation counter for user-driven searches.
///
/// Each call to [`SearchSequencer::begin`] supersedes every ticket issued
/// before it. A fetch tags its in-flight request with the ticket it was
/// started under and checks [`SearchTicket::is_current`] before applying the
/// response, so a slow response from an old search cannot overwrite the
/// results of a newer one.
#[derive(Clone, Debug, Default)]
pub struct SearchSequencer {
    generation: Arc<AtomicU64>,
}

/// Freshness token issued by [`SearchSequencer::begin`].
#[derive(Clone, Debug)]
pub struct SearchTicket {
    generation: Arc<AtomicU64>,
    issued_at: u64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, invalidating all previously issued tickets.
    pub fn begin(&self) -> SearchTicket {
        let issued_at = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            generation: Arc::clone(&self.generation),
            issued_at,
        }
    }

    /// Generation of the most recently started search.
    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl SearchTicket {
    /// True while no newer search has been started.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued_at
    }

    pub fn generation(&self) -> u64 {
        self.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[tokio::test]
    async fn retries_until_success() {
        let queue = QueryQueue {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            jitter_factor: 0.0,
            ..Default::default()
        };
        let attempts = AtomicU32::new(0);

        let out = queue
            .with_retry(|| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        anyhow::bail!("transient")
                    }
                    Ok(n)
                }
            })
            .await
            .unwrap();

        assert_eq!(out, 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_budget_reports_source_error() {
        let queue = QueryQueue {
            initial_delay: Duration::from_millis(1),
            jitter_factor: 0.0,
            max_retries: 1,
            ..Default::default()
        };

        let err = queue
            .with_retry(|| async { Err::<(), _>(anyhow::anyhow!("upstream down")) })
            .await
            .unwrap_err();

        match err {
            QueryQueueError::MaxRetriesExceeded(e) => {
                assert!(e.to_string().contains("upstream down"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn newer_search_supersedes_older_ticket() {
        let sequencer = SearchSequencer::new();
        let first = sequencer.begin();
        assert!(first.is_current());

        let second = sequencer.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(sequencer.current(), second.generation());
    }
}
