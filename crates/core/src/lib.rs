pub mod config;
pub mod discovery;
pub mod metrics;
pub mod naming;
pub mod orchestrator;
pub mod pool;
pub mod processor;
pub mod testing;
pub mod transformer;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, BuildConfig,
    Config, ConfigError, ServerConfig,
};
pub use discovery::{Discovery, DiscoveryError, DiscoveryOutcome, PackageDiscovery, SourceItem};
pub use orchestrator::{
    BuildError, BuildOrchestrator, BuildSummary, Manifest, OrchestratorConfig, MANIFEST_FILE,
};
pub use pool::{ConcurrencyPool, ExecutionResult, FailureDetail, Outcome};
pub use processor::{
    BuildProgress, CategoryProcessor, CategoryReport, CategoryStatus, ProcessorConfig, WorkItem,
};
pub use transformer::{
    EsbuildTransformer, TransformError, TransformJob, Transformer, TransformerConfig,
};
