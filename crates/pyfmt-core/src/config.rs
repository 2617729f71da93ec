//! Configuration management for pyfmt
//!
//! Settings are layered, later layers winning field by field:
//! 1. Built-in defaults
//! 2. Global config (`$XDG_CONFIG_HOME/pyfmt/config.toml`)
//! 3. Repo config (`.pyfmt.toml` in the working directory)
//! 4. An explicit `--config` file
//!
//! Environment variables and CLI flags are applied on top by the binary.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: &str = "1";

/// Supported configuration versions
pub const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["1"];

pub const DEFAULT_LINE_LENGTH: usize = 100;

pub const DEFAULT_SELECT: &str = "all";

pub const DEFAULT_EXTENSIONS: &[&str] = &["py"];

/// Name of the per-repository config file
pub const REPO_CONFIG_FILE: &str = ".pyfmt.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version for tracking schema changes
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Max characters per line handed to both formatters
    #[serde(default)]
    pub line_length: Option<usize>,

    /// Default selection policy name
    #[serde(default)]
    pub select: Option<String>,

    /// File extensions (without the dot) considered source files
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<String>,

    #[serde(default)]
    pub formatters: FormattersConfig,

    /// Problems found while loading, to be logged once logging is set up
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            line_length: None,
            select: None,
            extensions: None,
            log_file: None,
            formatters: FormattersConfig::default(),
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormattersConfig {
    #[serde(default)]
    pub isort: Option<FormatterConfig>,

    #[serde(default)]
    pub black: Option<FormatterConfig>,
}

/// Overrides for a single formatter. Unset fields fall back to the built-in template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Executable to run
    #[serde(default)]
    pub program: Option<String>,

    /// Flags placed between the program and the extra arguments.
    /// May contain `{line_length}` placeholders.
    #[serde(default)]
    pub args: Option<Vec<String>>,

    /// Flag appended in check mode
    #[serde(default)]
    pub check_flag: Option<String>,

    /// Extra arguments used when none are given on the command line
    #[serde(default)]
    pub extra_args: Option<String>,

    /// Python target version (black only), e.g. `py311`
    #[serde(default)]
    pub target_version: Option<String>,
}

impl FormatterConfig {
    fn merge(self, other: FormatterConfig) -> Self {
        Self {
            program: other.program.or(self.program),
            args: other.args.or(self.args),
            check_flag: other.check_flag.or(self.check_flag),
            extra_args: other.extra_args.or(self.extra_args),
            target_version: other.target_version.or(self.target_version),
        }
    }
}

fn merge_section(
    base: Option<FormatterConfig>,
    other: Option<FormatterConfig>,
) -> Option<FormatterConfig> {
    match (base, other) {
        (Some(base), Some(other)) => Some(base.merge(other)),
        (base, other) => other.or(base),
    }
}

fn default_config_version() -> String {
    CURRENT_CONFIG_VERSION.to_string()
}

/// Resolve the user's config home, respecting `XDG_CONFIG_HOME`
pub fn get_config_home() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

impl Config {
    /// Check if the configuration version is supported
    pub fn is_version_supported(&self) -> bool {
        SUPPORTED_CONFIG_VERSIONS.contains(&self.version.as_str())
    }

    /// Get a warning message for unsupported versions
    pub fn version_warning(&self) -> Option<String> {
        if !self.is_version_supported() {
            Some(format!(
                "Configuration version '{}' is not supported (supported: {})",
                self.version,
                SUPPORTED_CONFIG_VERSIONS.join(", ")
            ))
        } else {
            None
        }
    }

    /// Get the default config directory path
    pub fn get_config_dir() -> Option<PathBuf> {
        get_config_home().map(|h| h.join("pyfmt"))
    }

    /// Load configuration with priority:
    /// 1. Defaults
    /// 2. Global config
    /// 3. Repo config
    /// 4. Custom config file, which must exist when given
    pub fn load(custom_config: Option<&str>) -> ConfigResult<Self> {
        let global = Self::get_config_dir().map(|dir| dir.join("config.toml"));
        let repo = PathBuf::from(REPO_CONFIG_FILE);
        let custom = custom_config.map(expand_path);
        Self::load_layers(global.as_deref(), &repo, custom.as_deref())
    }

    fn load_layers(
        global: Option<&Path>,
        repo: &Path,
        custom: Option<&Path>,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(global) = global.filter(|p| p.exists()) {
            config = config.merge(Self::load_from_file(global)?);
        }

        if repo.exists() {
            config = config.merge(Self::load_from_file(repo)?);
        }

        if let Some(custom) = custom {
            config = config.merge(Self::load_from_file(custom)?);
        }

        if let Some(log_file) = config.log_file.take() {
            config.log_file = Some(expand_path(&log_file).to_string_lossy().into_owned());
        }

        Ok(config)
    }

    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(warning) = config.version_warning() {
            config.warnings.push(format!("{}: {}", path.display(), warning));
        }

        if config.version.is_empty() {
            config.version = CURRENT_CONFIG_VERSION.to_string();
        }

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(self, other: Config) -> Self {
        let mut warnings = self.warnings;
        warnings.extend(other.warnings);
        Self {
            version: other.version,
            line_length: other.line_length.or(self.line_length),
            select: other.select.or(self.select),
            extensions: other.extensions.or(self.extensions),
            log_file: other.log_file.or(self.log_file),
            formatters: FormattersConfig {
                isort: merge_section(self.formatters.isort, other.formatters.isort),
                black: merge_section(self.formatters.black, other.formatters.black),
            },
            warnings,
        }
    }

    pub fn line_length(&self) -> usize {
        self.line_length.unwrap_or(DEFAULT_LINE_LENGTH)
    }

    pub fn select(&self) -> &str {
        self.select.as_deref().unwrap_or(DEFAULT_SELECT)
    }

    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) => exts.clone(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Resolve a leading `~` or `~/` against the home directory
pub fn expand_path(path: &str) -> PathBuf {
    let home_relative = match path.strip_prefix('~') {
        Some("") => Some(""),
        Some(rest) => rest.strip_prefix('/'),
        None => None,
    };
    match (home_relative, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1");
        assert_eq!(config.line_length(), 100);
        assert_eq!(config.select(), "all");
        assert_eq!(config.extensions(), vec!["py".to_string()]);
        assert!(config.formatters.isort.is_none());
        assert!(config.formatters.black.is_none());
    }

    #[test]
    fn test_config_version_validation() {
        let config = Config::default();
        assert!(config.is_version_supported());
        assert!(config.version_warning().is_none());

        let unsupported = Config {
            version: "999".to_string(),
            ..Config::default()
        };
        assert!(!unsupported.is_version_supported());
        assert!(unsupported.version_warning().is_some());
    }

    #[test]
    fn test_parse_config_with_formatters() {
        let toml_str = r#"
version = "1"
line_length = 88
select = "modified"
extensions = ["py", "pyi"]

[formatters.isort]
check_flag = "--check"

[formatters.black]
program = "/opt/black/bin/black"
target_version = "py311"
extra_args = "--skip-string-normalization"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.line_length(), 88);
        assert_eq!(config.select(), "modified");
        assert_eq!(config.extensions(), vec!["py", "pyi"]);

        let isort = config.formatters.isort.unwrap();
        assert_eq!(isort.check_flag.as_deref(), Some("--check"));
        assert!(isort.program.is_none());

        let black = config.formatters.black.unwrap();
        assert_eq!(black.program.as_deref(), Some("/opt/black/bin/black"));
        assert_eq!(black.target_version.as_deref(), Some("py311"));
        assert_eq!(
            black.extra_args.as_deref(),
            Some("--skip-string-normalization")
        );
    }

    #[test]
    fn test_merge_prefers_other_field_by_field() {
        let base: Config = toml::from_str(
            r#"
line_length = 79
select = "staged"

[formatters.black]
program = "black"
target_version = "py38"
"#,
        )
        .unwrap();
        let other: Config = toml::from_str(
            r#"
line_length = 120

[formatters.black]
target_version = "py312"
"#,
        )
        .unwrap();

        let merged = base.merge(other);
        assert_eq!(merged.line_length(), 120);
        assert_eq!(merged.select(), "staged");

        let black = merged.formatters.black.unwrap();
        assert_eq!(black.program.as_deref(), Some("black"));
        assert_eq!(black.target_version.as_deref(), Some("py312"));
    }

    #[test]
    fn test_load_layers_order() {
        let global = write_config("line_length = 80\nselect = \"head\"\n");
        let custom = write_config("line_length = 90\n");
        let dir = TempDir::new().unwrap();
        let missing_repo = dir.path().join(REPO_CONFIG_FILE);

        let config =
            Config::load_layers(Some(global.path()), &missing_repo, Some(custom.path())).unwrap();
        assert_eq!(config.line_length(), 90);
        assert_eq!(config.select(), "head");
    }

    #[test]
    fn test_load_layers_repo_config() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join(REPO_CONFIG_FILE);
        fs::write(&repo, "select = \"local\"\n").unwrap();

        let config = Config::load_layers(None, &repo, None).unwrap();
        assert_eq!(config.select(), "local");
        assert_eq!(config.line_length(), DEFAULT_LINE_LENGTH);
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let repo = dir.path().join(REPO_CONFIG_FILE);

        let err = Config::load_layers(None, &repo, Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let bad = write_config("line_length = \"wide\"\n");
        let err = Config::load_from_file(bad.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unsupported_version_is_reported_with_its_path() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join(REPO_CONFIG_FILE);
        fs::write(&repo, "version = \"999\"\nline_length = 88\n").unwrap();
        let global = write_config("version = \"1\"\n");

        let config = Config::load_layers(Some(global.path()), &repo, None).unwrap();
        assert_eq!(config.line_length(), 88);
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].starts_with(&repo.display().to_string()));
        assert!(config.warnings[0].contains("'999' is not supported"));
    }

    #[test]
    fn test_expand_path() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/logs/pyfmt.log"), home.join("logs/pyfmt.log"));
            assert_eq!(expand_path("~"), home);
        }
        assert_eq!(expand_path("relative/path"), PathBuf::from("relative/path"));
        assert_eq!(expand_path("~other/x"), PathBuf::from("~other/x"));
    }
}
