//! esbuild-based transformer implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::TransformerConfig;
use super::entry;
use super::error::TransformError;
use super::traits::Transformer;
use super::types::{TransformJob, TransformResult};

/// Permissions of emitted modules; they are served by other processes.
#[cfg(unix)]
const MODULE_MODE: u32 = 0o644;

/// Transformer that bundles each source module with an esbuild-compatible
/// binary, emitting a single ES module.
///
/// When the source assigns named CommonJS exports, the bundler is fed an ESM
/// entry on stdin that re-exports them, so the output keeps the names.
pub struct EsbuildTransformer {
    config: TransformerConfig,
}

impl EsbuildTransformer {
    /// Creates a new transformer with the given configuration.
    pub fn new(config: TransformerConfig) -> Self {
        Self { config }
    }

    /// Creates a transformer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TransformerConfig::default())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Builds bundler arguments for one module.
    ///
    /// With `stdin_entry` the entry is read from stdin and resolved next to
    /// `source_path`; otherwise `source_path` itself is the entry.
    fn build_args(
        &self,
        source_path: &Path,
        outfile: &Path,
        minify: bool,
        stdin_entry: bool,
    ) -> Vec<String> {
        let mut args = Vec::new();
        match (stdin_entry, source_path.parent()) {
            (true, Some(dir)) => {
                let file_name = source_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                args.push(format!("--sourcefile=entry-{}", file_name));
                args.push(format!("--resolve-dir={}", dir.to_string_lossy()));
            }
            _ => args.push(source_path.to_string_lossy().to_string()),
        }
        args.extend([
            "--bundle".to_string(),
            "--format=esm".to_string(),
            format!("--platform={}", self.config.platform),
            "--log-level=error".to_string(),
            format!("--outfile={}", outfile.to_string_lossy()),
        ]);

        if minify {
            args.push("--minify".to_string());
        }

        args.extend(self.config.extra_args.iter().cloned());
        args
    }

    /// ESM entry re-exporting the source's named exports, if it has any.
    fn stdin_entry(&self, source_path: &Path, source: &str) -> Option<String> {
        let names = entry::commonjs_export_names(source);
        let file_name = source_path.file_name()?.to_string_lossy();
        if names.is_empty() {
            None
        } else {
            Some(entry::esm_entry(&file_name, &names))
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> TransformError {
        if e.kind() == std::io::ErrorKind::NotFound {
            TransformError::BundlerNotFound {
                path: self.config.bundler_path.clone(),
            }
        } else {
            TransformError::io(&self.config.bundler_path, e)
        }
    }
}

#[async_trait]
impl Transformer for EsbuildTransformer {
    fn name(&self) -> &str {
        "esbuild"
    }

    async fn transform(&self, job: TransformJob) -> Result<TransformResult, TransformError> {
        let start = Instant::now();

        let source = match tokio::fs::read(&job.source_path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TransformError::SourceNotFound {
                    path: job.source_path,
                });
            }
            Err(e) => return Err(TransformError::io(&job.source_path, e)),
        };
        let stdin_entry = self.stdin_entry(&job.source_path, &source);

        let output_dir = job.output_path.parent().ok_or_else(|| {
            TransformError::failed(&job.source_path, "output path has no parent directory", None)
        })?;

        // The bundler writes into a hidden sibling that is removed on drop
        // unless persisted, so a failed run never leaves a file at output_path.
        let temp_path = tempfile::Builder::new()
            .prefix(".iconchunk-")
            .suffix(".tmp")
            .tempfile_in(output_dir)
            .map_err(|e| TransformError::io(output_dir, e))?
            .into_temp_path();

        let args = self.build_args(
            &job.source_path,
            &temp_path,
            job.minify,
            stdin_entry.is_some(),
        );
        debug!(
            source = %job.source_path.display(),
            bundler = %self.config.bundler_path.display(),
            named_exports = stdin_entry.is_some(),
            "Running bundler"
        );

        let stdin = if stdin_entry.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(&self.config.bundler_path)
            .args(&args)
            .stdin(stdin)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let (Some(entry), Some(mut pipe)) = (&stdin_entry, child.stdin.take()) {
            // A bundler that exits early closes the pipe; its exit status
            // reports the failure.
            if let Err(e) = pipe.write_all(entry.as_bytes()).await {
                debug!(source = %job.source_path.display(), error = %e, "Bundler stdin closed");
            }
        }

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(TransformError::io(&job.source_path, e)),
            // Dropping the wait future drops the child, which kills it.
            Err(_) => {
                return Err(TransformError::Timeout {
                    source_path: job.source_path,
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TransformError::failed(
                &job.source_path,
                format!("bundler exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        let output_size_bytes = tokio::fs::metadata(&temp_path)
            .await
            .map_err(|e| TransformError::io(&job.source_path, e))?
            .len();
        if output_size_bytes == 0 {
            return Err(TransformError::failed(
                &job.source_path,
                "bundler produced an empty module",
                None,
            ));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(MODULE_MODE))
                .await
                .map_err(|e| TransformError::io(&job.output_path, e))?;
        }

        temp_path
            .persist(&job.output_path)
            .map_err(|e| TransformError::io(&job.output_path, e.error))?;

        Ok(TransformResult {
            output_path: job.output_path,
            output_size_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), TransformError> {
        let output = Command::new(&self.config.bundler_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(TransformError::failed(
                &self.config.bundler_path,
                format!(
                    "bundler version check exited with code: {:?}",
                    output.status.code()
                ),
                None,
            ));
        }

        debug!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "Bundler available"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn job_in(dir: &TempDir) -> TransformJob {
        let source_path = dir.path().join("faHouse.js");
        std::fs::write(&source_path, "exports.faHouse = {};").unwrap();
        let output_dir = dir.path().join("out");
        std::fs::create_dir_all(&output_dir).unwrap();
        TransformJob {
            source_path,
            output_path: output_dir.join("faHouse.js"),
            minify: true,
        }
    }

    #[test]
    fn test_build_args_minified() {
        let transformer = EsbuildTransformer::with_defaults();
        let args = transformer.build_args(
            Path::new("/src/faHouse.js"),
            Path::new("/out/.tmp"),
            true,
            false,
        );

        assert_eq!(args[0], "/src/faHouse.js");
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--format=esm".to_string()));
        assert!(args.contains(&"--platform=neutral".to_string()));
        assert!(args.contains(&"--outfile=/out/.tmp".to_string()));
        assert!(args.contains(&"--minify".to_string()));
    }

    #[test]
    fn test_build_args_extra_and_unminified() {
        let mut config = TransformerConfig::default().with_platform("browser");
        config.extra_args = vec!["--target=es2020".to_string()];
        let transformer = EsbuildTransformer::new(config);

        let args = transformer.build_args(Path::new("a.js"), Path::new("b.js"), false, false);

        assert!(!args.contains(&"--minify".to_string()));
        assert!(args.contains(&"--platform=browser".to_string()));
        assert_eq!(args.last().unwrap(), "--target=es2020");
    }

    #[test]
    fn test_build_args_stdin_entry() {
        let transformer = EsbuildTransformer::with_defaults();
        let args = transformer.build_args(
            Path::new("/pkg/pro-regular-svg-icons/faHouse.js"),
            Path::new("/out/.tmp"),
            true,
            true,
        );

        assert!(!args.contains(&"/pkg/pro-regular-svg-icons/faHouse.js".to_string()));
        assert_eq!(args[0], "--sourcefile=entry-faHouse.js");
        assert_eq!(args[1], "--resolve-dir=/pkg/pro-regular-svg-icons");
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--format=esm".to_string()));
    }

    #[test]
    fn test_stdin_entry_only_for_named_exports() {
        let transformer = EsbuildTransformer::with_defaults();
        let source_path = Path::new("/pkg/faHouse.js");

        assert_eq!(
            transformer.stdin_entry(source_path, "exports.faHouse = {};\nexports.prefix = 'far';"),
            Some("export { faHouse, prefix } from \"./faHouse.js\";\n".to_string())
        );
        assert_eq!(
            transformer.stdin_entry(source_path, "module.exports = {};"),
            None
        );
    }

    #[tokio::test]
    async fn test_validate_missing_bundler() {
        let transformer = EsbuildTransformer::new(TransformerConfig::with_bundler(
            PathBuf::from("/nonexistent/esbuild"),
        ));
        let err = transformer.validate().await.unwrap_err();
        assert!(matches!(err, TransformError::BundlerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let transformer = EsbuildTransformer::with_defaults();

        let err = transformer
            .transform(TransformJob {
                source_path: dir.path().join("faMissing.js"),
                output_path: dir.path().join("faMissing.out.js"),
                minify: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TransformError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_bundler_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let job = job_in(&dir);
        let output_dir = job.output_path.parent().unwrap().to_path_buf();
        let transformer = EsbuildTransformer::new(TransformerConfig::with_bundler(
            PathBuf::from("/nonexistent/esbuild"),
        ));

        let err = transformer.transform(job).await.unwrap_err();

        assert!(matches!(err, TransformError::BundlerNotFound { .. }));
        assert!(dir_entries(&output_dir).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_bundler_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let job = job_in(&dir);
        let output_dir = job.output_path.parent().unwrap().to_path_buf();
        let transformer =
            EsbuildTransformer::new(TransformerConfig::with_bundler(PathBuf::from("false")));

        let err = transformer.transform(job).await.unwrap_err();

        match err {
            TransformError::Failed { source_path, .. } => {
                assert!(source_path.ends_with("faHouse.js"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(dir_entries(&output_dir).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_rejected() {
        let dir = TempDir::new().unwrap();
        let job = job_in(&dir);
        let output_dir = job.output_path.parent().unwrap().to_path_buf();
        let transformer =
            EsbuildTransformer::new(TransformerConfig::with_bundler(PathBuf::from("true")));

        let err = transformer.transform(job).await.unwrap_err();

        assert!(err.to_string().contains("empty module"));
        assert!(dir_entries(&output_dir).is_empty());
    }

    /// Bundler stand-in: writes the stdin entry, or copies the source entry,
    /// to `--outfile`.
    #[cfg(unix)]
    fn copy_bundler(dir: &TempDir) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = r#"#!/bin/sh
out=""
stdin_entry=""
for arg in "$@"; do
  case "$arg" in
    --outfile=*) out="${arg#--outfile=}" ;;
    --sourcefile=*) stdin_entry=1 ;;
  esac
done
if [ -n "$stdin_entry" ]; then
  cat > "$out"
else
  cat "$1" > "$out"
fi
"#;
        let path = dir.path().join("fake-esbuild");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_named_exports_are_re_exported() {
        let dir = TempDir::new().unwrap();
        let transformer = EsbuildTransformer::new(TransformerConfig::with_bundler(copy_bundler(&dir)));
        let job = job_in(&dir);
        let output_path = job.output_path.clone();

        let result = transformer.transform(job).await.unwrap();

        assert_eq!(result.output_path, output_path);
        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "export { faHouse } from \"./faHouse.js\";\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_is_readable_by_others() {
        let dir = TempDir::new().unwrap();
        let transformer = EsbuildTransformer::new(TransformerConfig::with_bundler(copy_bundler(&dir)));

        let named = job_in(&dir);
        let named_output = named.output_path.clone();
        transformer.transform(named).await.unwrap();

        let plain_source = dir.path().join("faPlain.js");
        std::fs::write(&plain_source, "module.exports = 'plain';\n").unwrap();
        let plain_output = dir.path().join("out").join("faPlain.js");
        transformer
            .transform(TransformJob {
                source_path: plain_source,
                output_path: plain_output.clone(),
                minify: false,
            })
            .await
            .unwrap();

        assert_eq!(mode_of(&named_output), 0o644);
        assert_eq!(mode_of(&plain_output), 0o644);
        assert_eq!(
            std::fs::read_to_string(&plain_output).unwrap(),
            "module.exports = 'plain';\n"
        );
    }
}
