//! Bounded-concurrency executor.
//!
//! The pool drives an async worker over a batch of items while keeping at most
//! `limit` invocations in flight. Every item produces exactly one
//! [`ExecutionResult`]; worker errors, timeouts and panics are recorded as
//! failures and never abort sibling items.
//!
//! # Example
//!
//! ```ignore
//! use iconchunk_core::pool::ConcurrencyPool;
//!
//! let pool = ConcurrencyPool::new(20).with_item_timeout(Duration::from_secs(30));
//! let results = pool
//!     .run(items, |item| async move { transformer.transform(item.job()).await.map(|_| ()) })
//!     .await;
//!
//! let succeeded = results.iter().filter(|r| r.is_success()).count();
//! ```

mod executor;
mod types;

pub use executor::ConcurrencyPool;
pub use types::{ExecutionResult, FailureDetail, Outcome, PoolProgress};
