//! Build orchestration.
//!
//! A build moves through `Init → Cleaning → ProcessingCategory(1..n) →
//! WritingManifest → Done`:
//! - **Cleaning**: the output root is deleted and recreated; failure is fatal
//! - **ProcessingCategory**: categories run sequentially, concurrency is
//!   bounded within a category by the pool
//! - **WritingManifest**: reports are merged into a [`Manifest`] and written
//!   to `<outputRoot>/manifest.json`; failure is fatal

mod config;
mod manifest;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use manifest::{sha256_hex, Manifest, MANIFEST_FILE};
pub use runner::BuildOrchestrator;
pub use types::{BuildError, BuildPhase, BuildSummary};
