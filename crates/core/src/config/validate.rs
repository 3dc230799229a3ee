use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one style is requested
/// - Style ids are plain directory names (no separators, no `..`)
/// - Concurrency is at least 1
/// - Item timeout, when set, is not 0
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.build.styles.is_empty() {
        return Err(ConfigError::ValidationError(
            "build.styles must name at least one style".to_string(),
        ));
    }

    if let Some(style) = config.build.styles.iter().find(|s| !is_plain_style_id(s)) {
        return Err(ConfigError::ValidationError(format!(
            "build.styles entry {:?} must be a single directory name",
            style
        )));
    }

    if config.build.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "build.concurrency must be at least 1".to_string(),
        ));
    }

    if config.build.item_timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "build.item_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// Style ids are joined onto the packages and output roots, so they must not
/// be able to leave them.
fn is_plain_style_id(style: &str) -> bool {
    !style.is_empty()
        && style != "."
        && !style.contains("..")
        && !style.contains(['/', '\\', ':'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = Config::default();
        config.build.concurrency = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_styles_fails() {
        let mut config = Config::default();
        config.build.styles.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.build.item_timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_style_ids_cannot_escape_roots() {
        for style in ["/etc", "../outside", "..", ".", "pro/../../x", "a\\b", "C:icons", "a..b"] {
            let mut config = Config::default();
            config.build.styles = vec!["pro-regular-svg-icons".to_string(), style.to_string()];
            let err = validate_config(&config).unwrap_err();
            assert!(
                matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("build.styles")),
                "{:?} should be rejected",
                style
            );
        }
    }

    #[test]
    fn test_validate_accepts_package_style_ids() {
        let mut config = Config::default();
        config.build.styles = vec![
            "pro-regular-svg-icons".to_string(),
            "free-brands-svg-icons".to_string(),
            "custom_icons.v2".to_string(),
        ];
        assert!(validate_config(&config).is_ok());
    }
}
