use crate::config::schema::{LintConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names looked up by [`discover`], in order of preference.
pub const CONFIG_FILE_NAMES: &[&str] = &["member-spacing.toml", "tslint.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are tslint-style JSON; anything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = Some(path.to_path_buf());
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml { path, source },
            ConfigError::Json { path: None, source } => ConfigError::Json { path, source },
            ConfigError::Validation { path: None, source } => {
                ConfigError::Validation { path, source }
            }
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read lint config from {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse lint config TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse lint config TOML: {}", source),
            },
            ConfigError::Json { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse lint config JSON ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse lint config JSON: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid lint config ({}): {}", path.display(), source),
                None => write!(f, "invalid lint config: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str, format: ConfigFormat) -> Result<LintConfig, ConfigError> {
    let config: LintConfig = match format {
        ConfigFormat::Toml => toml_edit::de::from_str(input)
            .map_err(|source| ConfigError::Toml { path: None, source })?,
        ConfigFormat::Json => serde_json::from_str(input)
            .map_err(|source| ConfigError::Json { path: None, source })?,
    };
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<LintConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_from_str(&contents, ConfigFormat::from_path(path))
        .map_err(|error| error.with_path(path))?;
    debug!(path = %path.display(), rules = config.rules.len(), "loaded lint config");
    Ok(config)
}

/// Find the nearest config file in `start` or one of its ancestors.
pub fn discover(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{Severity, SpacingConfig};

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("tslint.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a/B.JSON")), ConfigFormat::Json);
        assert_eq!(
            ConfigFormat::from_path(Path::new("member-spacing.toml")),
            ConfigFormat::Toml
        );
        assert_eq!(ConfigFormat::from_path(Path::new("lintrc")), ConfigFormat::Toml);
    }

    #[test]
    fn loads_toml_list_form() {
        let config = load_from_str(
            "[rules]\nlines-between-class-members = [true, 2]\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        let rule = config.lines_between_class_members().unwrap();
        assert_eq!(rule.config(), &SpacingConfig::Exactly(2));
    }

    #[test]
    fn loads_json_object_form() {
        let config = load_from_str(
            r#"{
                "extends": "tslint:recommended",
                "rules": {
                    "lines-between-class-members": { "severity": "warning", "options": [1] }
                }
            }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let rule = config.lines_between_class_members().unwrap();
        assert_eq!(rule.severity(), Severity::Warning);
        assert_eq!(rule.config(), &SpacingConfig::Exactly(1));
    }

    #[test]
    fn validation_errors_are_reported() {
        let err = load_from_str(
            "[rules.lines-between-class-members]\nseverity = \"loud\"\n",
            ConfigFormat::Toml,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { path: None, .. }));
        assert!(err.to_string().contains("unknown severity 'loud'"));
    }

    #[test]
    fn parse_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tslint.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_from_path(&path).unwrap_err();
        match err {
            ConfigError::Json { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(dir.path().join("member-spacing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn discover_walks_up_and_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src/models");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("tslint.json"), "{}").unwrap();
        assert_eq!(discover(&nested), Some(dir.path().join("tslint.json")));

        fs::write(dir.path().join("member-spacing.toml"), "").unwrap();
        assert_eq!(discover(&nested), Some(dir.path().join("member-spacing.toml")));
    }
}
