use figment::{
    providers::{Env, Format, Toml},
    value::Uncased,
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Variables understood by the original build script, mapped onto config keys.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("FA_ESM_STYLES", "build.styles"),
    ("FA_ESM_OUTPUT", "build.output_dir"),
    ("FA_ESM_CONCURRENCY", "build.concurrency"),
    ("FA_ESM_MINIFY", "build.minify"),
    ("SOURCE_DATE_EPOCH", "build.source_date_epoch"),
];

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    with_env_overrides(Figment::new().merge(Toml::file(path)))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    with_env_overrides(Figment::new())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// `ICONCHUNK_BUILD__CONCURRENCY=8` style overrides, then the legacy names.
fn with_env_overrides(figment: Figment) -> Figment {
    figment
        .merge(Env::prefixed("ICONCHUNK_").split("__"))
        .merge(Env::raw().filter_map(|key| {
            LEGACY_ENV
                .iter()
                .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
                .map(|(_, path)| Uncased::from(*path))
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[build]
styles = ["pro-solid-svg-icons"]
concurrency = 8

[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.build.styles, vec!["pro-solid-svg-icons"]);
        assert_eq!(config.build.concurrency, 8);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[build]
concurrency = "many"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/iconchunk.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "iconchunk.toml",
                r#"
[build]
styles = "pro-regular-svg-icons, free-brands-svg-icons"
output_dir = "public/icons"
minify = false

[server]
host = "127.0.0.1"
port = 4000
"#,
            )?;

            let config = load_config(Path::new("iconchunk.toml")).unwrap();
            assert_eq!(
                config.build.styles,
                vec!["pro-regular-svg-icons", "free-brands-svg-icons"]
            );
            assert_eq!(config.build.output_dir, PathBuf::from("public/icons"));
            assert!(!config.build.minify);
            assert_eq!(config.server.port, 4000);
            assert_eq!(config.server.host.to_string(), "127.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("iconchunk.toml", "[build]\nconcurrency = 4\n")?;
            jail.set_env("ICONCHUNK_BUILD__CONCURRENCY", "12");
            jail.set_env("ICONCHUNK_TRANSFORMER__BUNDLER_PATH", "/opt/esbuild");

            let config = load_config(Path::new("iconchunk.toml")).unwrap();
            assert_eq!(config.build.concurrency, 12);
            assert_eq!(
                config.transformer.bundler_path,
                PathBuf::from("/opt/esbuild")
            );
            Ok(())
        });
    }

    #[test]
    fn test_legacy_env_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("FA_ESM_STYLES", "pro-regular-svg-icons,free-solid-svg-icons");
            jail.set_env("FA_ESM_OUTPUT", "./out");
            jail.set_env("FA_ESM_MINIFY", "false");
            jail.set_env("SOURCE_DATE_EPOCH", "1700000000");

            let config = load_config_from_env().unwrap();
            assert_eq!(
                config.build.styles,
                vec!["pro-regular-svg-icons", "free-solid-svg-icons"]
            );
            assert_eq!(config.build.output_dir, PathBuf::from("./out"));
            assert!(!config.build.minify);
            assert_eq!(config.build.source_date_epoch, Some(1_700_000_000));
            Ok(())
        });
    }

    #[test]
    fn test_env_defaults_without_overrides() {
        Jail::expect_with(|_jail| {
            let config = load_config_from_env().unwrap();
            assert_eq!(config.build.styles, vec!["pro-regular-svg-icons"]);
            assert_eq!(config.build.concurrency, 20);
            assert!(config.build.minify);
            Ok(())
        });
    }
}
