//! Command-line interface.
//!
//! `iconchunk build` runs one full build; `iconchunk serve` serves the output
//! root over HTTP, optionally building first.

use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use iconchunk_core::{
    config::split_styles, load_config, load_config_from_env, validate_config, BuildOrchestrator,
    BuildProgress, BuildSummary, CategoryStatus, Config,
};

use crate::api::create_router;
use crate::state::AppState;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "ICONCHUNK_CONFIG";

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "iconchunk.toml";

/// Buffer size for progress events.
const PROGRESS_BUFFER_SIZE: usize = 256;

/// Failures listed per category before the rest are summarized.
const MAX_REPORTED_FAILURES: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "iconchunk", version, about)]
pub struct Cli {
    /// Configuration file (TOML). Falls back to $ICONCHUNK_CONFIG, then ./iconchunk.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert every configured style into per-icon ES modules.
    Build(BuildArgs),
    /// Serve built modules over HTTP.
    Serve(ServeArgs),
}

#[derive(Debug, Default, Args)]
pub struct BuildArgs {
    /// Comma-separated style packages, e.g. pro-regular-svg-icons,pro-solid-svg-icons.
    #[arg(long)]
    pub styles: Option<String>,

    /// Output root. Deleted and recreated on every build.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory holding one sub-directory per style package.
    #[arg(long)]
    pub packages: Option<PathBuf>,

    /// Maximum concurrent transformations.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Emit unminified modules.
    #[arg(long)]
    pub no_minify: bool,

    /// Per-icon timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Bundler binary.
    #[arg(long)]
    pub bundler: Option<PathBuf>,
}

impl BuildArgs {
    /// Applies the flags on top of a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(styles) = &self.styles {
            config.build.styles = split_styles(styles);
        }
        if let Some(output) = &self.output {
            config.build.output_dir = output.clone();
        }
        if let Some(packages) = &self.packages {
            config.build.packages_dir = packages.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.build.concurrency = concurrency;
        }
        if self.no_minify {
            config.build.minify = false;
        }
        if let Some(timeout) = self.timeout {
            config.build.item_timeout_secs = Some(timeout);
        }
        if let Some(bundler) = &self.bundler {
            config.transformer.bundler_path = bundler.clone();
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Run a full build before binding the listener.
    #[arg(long)]
    pub build: bool,

    #[arg(long)]
    pub host: Option<IpAddr>,

    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Resolves the configuration file, loads it, applies command-line flags and
/// validates the result.
pub fn load_settings(cli: &Cli) -> Result<Config> {
    let explicit = cli
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
            load_config(Path::new(DEFAULT_CONFIG_FILE))
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE))?
        }
        None => load_config_from_env().context("Failed to load config from environment")?,
    };

    match &cli.command {
        Commands::Build(args) => args.apply(&mut config),
        Commands::Serve(args) => args.apply(&mut config),
    }

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Runs the selected subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_settings(&cli)?;

    match cli.command {
        Commands::Build(_) => {
            run_build(&config).await?;
        }
        Commands::Serve(args) => {
            if args.build {
                run_build(&config).await?;
            }
            run_serve(config).await?;
        }
    }

    Ok(())
}

/// Runs one build, rendering progress on stderr.
pub async fn run_build(config: &Config) -> Result<BuildSummary> {
    info!(
        styles = ?config.build.styles,
        output = %config.build.output_dir.display(),
        concurrency = config.build.concurrency,
        minify = config.build.minify,
        "Starting build"
    );

    let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let renderer = tokio::spawn(render_progress(progress_rx));

    let orchestrator = BuildOrchestrator::from_config(config).with_progress(progress_tx);
    let result = orchestrator.run().await;

    // Closing the last sender ends the renderer.
    drop(orchestrator);
    let _ = renderer.await;

    let summary = result.context("Build failed")?;
    report_problems(&summary);
    Ok(summary)
}

fn report_problems(summary: &BuildSummary) {
    for report in &summary.categories {
        if let CategoryStatus::Aborted { reason } = &report.status {
            warn!(style = %report.short_name, reason = %reason, "Style aborted");
        }

        for failure in report.failures.iter().take(MAX_REPORTED_FAILURES) {
            warn!(
                style = %report.short_name,
                icon = %failure.id,
                kind = failure.detail.kind(),
                "Icon failed: {}",
                failure.detail
            );
        }
        if report.failed_count > MAX_REPORTED_FAILURES {
            warn!(
                style = %report.short_name,
                "... and {} more failed icons",
                report.failed_count - MAX_REPORTED_FAILURES
            );
        }
    }
}

async fn render_progress(mut rx: mpsc::Receiver<BuildProgress>) {
    let mut stderr = std::io::stderr();

    while let Some(event) = rx.recv().await {
        let _ = match event {
            BuildProgress::CategoryStarted {
                short_name, total, ..
            } => write!(stderr, "\r[{}] 0/{}", short_name, total),
            BuildProgress::ItemCompleted {
                short_name,
                completed,
                total,
                ..
            } => write!(stderr, "\r[{}] {}/{}", short_name, completed, total),
            BuildProgress::CategorySkipped {
                short_name, reason, ..
            } => writeln!(stderr, "[{}] skipped: {}", short_name, reason),
            BuildProgress::CategoryFinished { .. } => writeln!(stderr),
        };
        let _ = stderr.flush();
    }
}

/// Serves the output root until Ctrl+C or SIGTERM.
pub async fn run_serve(config: Config) -> Result<()> {
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let icons_root = config.build.output_dir.clone();

    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(root = %icons_root.display(), "Serving icons on http://{}/icons/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from([
            "iconchunk",
            "build",
            "--styles",
            "pro-regular-svg-icons, free-solid-svg-icons",
            "--output",
            "/tmp/out",
            "--concurrency",
            "8",
            "--no-minify",
            "--timeout",
            "30",
        ]);

        let mut config = Config::default();
        match &cli.command {
            Commands::Build(args) => args.apply(&mut config),
            other => panic!("unexpected command: {:?}", other),
        }

        assert_eq!(
            config.build.styles,
            vec!["pro-regular-svg-icons", "free-solid-svg-icons"]
        );
        assert_eq!(config.build.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.build.concurrency, 8);
        assert!(!config.build.minify);
        assert_eq!(config.build.item_timeout_secs, Some(30));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = Config::default();
        config.build.concurrency = 5;

        BuildArgs::default().apply(&mut config);

        assert_eq!(config.build.concurrency, 5);
        assert!(config.build.minify);
        assert_eq!(config.build.styles, vec!["pro-regular-svg-icons"]);
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["iconchunk", "serve", "--config", "custom.toml", "--port", "8080"]);

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let mut config = Config::default();
        match &cli.command {
            Commands::Serve(args) => {
                assert!(!args.build);
                args.apply(&mut config);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
