//! Admission-window executor.

use futures::{stream, FutureExt, StreamExt};
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use super::types::{ExecutionResult, FailureDetail, Outcome, PoolProgress};

/// Runs a worker over a batch of items with at most `limit` invocations in
/// flight at any time.
///
/// The pool is cooperative: all invocations are multiplexed on the calling
/// task, so no locking is needed around the in-flight set. Completion order is
/// unspecified.
#[derive(Debug, Clone)]
pub struct ConcurrencyPool {
    limit: usize,
    item_timeout: Option<Duration>,
}

impl ConcurrencyPool {
    /// Creates a pool. A limit of zero is clamped to one.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            item_timeout: None,
        }
    }

    /// Fails any invocation that runs longer than `timeout`.
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = Some(timeout);
        self
    }

    /// Sets or clears the per-item timeout.
    pub fn with_optional_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.item_timeout = timeout;
        self
    }

    /// Maximum number of in-flight invocations.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Per-item timeout, if any.
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout
    }

    /// Runs `worker` over every item and returns one result per item.
    pub async fn run<T, F, Fut, E>(&self, items: Vec<T>, worker: F) -> Vec<ExecutionResult<T>>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        self.run_with_progress(items, worker, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_result` as each item completes.
    ///
    /// `on_result` sees results in completion order together with a
    /// monotonically increasing completion counter.
    pub async fn run_with_progress<T, F, Fut, E, P>(
        &self,
        items: Vec<T>,
        worker: F,
        mut on_result: P,
    ) -> Vec<ExecutionResult<T>>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
        P: FnMut(&ExecutionResult<T>, PoolProgress),
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        let item_timeout = self.item_timeout;

        // buffer_unordered pulls the next item (and creates its future) only
        // once a slot frees up, which is what bounds the in-flight set.
        let mut in_flight = stream::iter(items)
            .map(|item| {
                let invocation = worker(item.clone());
                async move {
                    let outcome = execute(invocation, item_timeout).await;
                    ExecutionResult { item, outcome }
                }
            })
            .buffer_unordered(self.limit);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = in_flight.next().await {
            let progress = PoolProgress {
                completed: results.len() + 1,
                total,
            };
            on_result(&result, progress);
            results.push(result);
        }

        results
    }
}

/// Awaits one invocation, converting errors, timeouts and panics into a
/// failure outcome.
async fn execute<Fut, E>(invocation: Fut, item_timeout: Option<Duration>) -> Outcome
where
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let guarded = AssertUnwindSafe(invocation).catch_unwind();

    let finished = match item_timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(finished) => finished,
            Err(_) => {
                return Outcome::Failure(FailureDetail::Timeout {
                    after_ms: limit.as_millis() as u64,
                })
            }
        },
        None => guarded.await,
    };

    match finished {
        Ok(Ok(())) => Outcome::Success,
        Ok(Err(e)) => Outcome::Failure(FailureDetail::Transform {
            message: e.to_string(),
        }),
        Err(payload) => Outcome::Failure(FailureDetail::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
