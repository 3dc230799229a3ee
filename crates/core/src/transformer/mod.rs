//! Transformer module for converting icon modules to ES modules.
//!
//! This module provides the `Transformer` trait and an implementation that
//! shells out to an esbuild-compatible bundler. A transformer reads one
//! source module and writes exactly one output file; on failure nothing is
//! left at the output path.
//!
//! # Example
//!
//! ```ignore
//! use iconchunk_core::transformer::{EsbuildTransformer, Transformer, TransformJob};
//!
//! let transformer = EsbuildTransformer::with_defaults();
//!
//! // Validate the bundler is available
//! transformer.validate().await?;
//!
//! let job = TransformJob {
//!     source_path: PathBuf::from("node_modules/@fortawesome/pro-regular-svg-icons/faHouse.js"),
//!     output_path: PathBuf::from("dist/regular/faHouse.js"),
//!     minify: true,
//! };
//!
//! let result = transformer.transform(job).await?;
//! println!("Wrote {} bytes in {} ms", result.output_size_bytes, result.duration_ms);
//! ```

mod config;
mod entry;
mod error;
mod esbuild;
mod traits;
mod types;

pub use config::TransformerConfig;
pub use error::TransformError;
pub use esbuild::EsbuildTransformer;
pub use traits::Transformer;
pub use types::{TransformJob, TransformResult};
