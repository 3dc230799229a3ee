//! Category processing.
//!
//! [`CategoryProcessor`] handles one category end-to-end:
//! - Discovery: lists the category's source modules, or reports it absent
//! - Transformation: runs every module through the [`Transformer`] under a
//!   bounded [`ConcurrencyPool`], isolating per-item failures
//! - Aggregation: returns an immutable [`CategoryReport`] with sorted ids
//!
//! Progress is published as [`BuildProgress`] events on an optional channel.
//!
//! # Example
//!
//! ```ignore
//! use iconchunk_core::discovery::PackageDiscovery;
//! use iconchunk_core::processor::{CategoryProcessor, ProcessorConfig};
//! use iconchunk_core::transformer::EsbuildTransformer;
//!
//! let processor = CategoryProcessor::new(
//!     ProcessorConfig::new("./dist").with_concurrency(20),
//!     PackageDiscovery::new("./node_modules/@fortawesome", "fa", ".js"),
//!     EsbuildTransformer::with_defaults(),
//! );
//!
//! let report = processor.process("pro-regular-svg-icons").await;
//! println!("{}: {} icons", report.short_name, report.succeeded_count());
//! ```
//!
//! [`Transformer`]: crate::transformer::Transformer
//! [`ConcurrencyPool`]: crate::pool::ConcurrencyPool

mod category;
mod config;
mod types;

pub use category::CategoryProcessor;
pub use config::ProcessorConfig;
pub use types::{BuildProgress, CategoryReport, CategoryStatus, ItemFailure, WorkItem};
