//! Discovery of source modules per category.
//!
//! A category that does not exist is reported as
//! [`DiscoveryOutcome::NotFound`] rather than as an error, so callers can
//! tell "missing package" apart from "package with zero icons".

mod error;
mod package;
mod traits;
mod types;

pub use error::DiscoveryError;
pub use package::PackageDiscovery;
pub use traits::Discovery;
pub use types::{DiscoveryOutcome, SourceItem};
