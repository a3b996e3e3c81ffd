//! Configuration for the linter
//!
//! Reads configuration from:
//! - `.lint40.yaml` / `.lint40.yml` / `.lint40.json` (project-level)
//! - the same names in the home directory (user-level)
//!
//! Every section is optional; the defaults reproduce the built-in style
//! (80 columns, eight-space indentation, nesting depth three).

use crate::diagnostic::Severity;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names searched by [`Config::load_default`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".lint40.yaml",
    ".lint40.yml",
    ".lint40.json",
    "lint40.yaml",
    "lint40.yml",
    "lint40.json",
];

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lint files on a thread pool
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Compact,
    Github,
    Lsp,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "compact" => Ok(OutputFormat::Compact),
            "github" => Ok(OutputFormat::Github),
            "lsp" => Ok(OutputFormat::Lsp),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// File handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.c".to_string(), "**/*.h".to_string()],
            exclude: vec!["build/**".to_string(), "**/.git/**".to_string()],
        }
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rule codes
    pub disabled: Vec<String>,

    /// Enabled rule codes (empty = all)
    pub enabled: Vec<String>,

    /// Ignore rules by code prefix (e.g. "paren-" ignores both paren rules)
    pub ignore: Vec<String>,

    /// Severity overrides (code -> severity)
    pub severity: HashMap<String, Severity>,

    /// Per-file rule ignores (glob pattern -> codes)
    pub per_file: HashMap<String, Vec<String>>,
}

/// Style limits used by the checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub max_line_length: usize,

    /// Width of one indentation level in spaces
    pub indent_width: usize,

    pub max_nesting_depth: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            max_line_length: 80,
            indent_width: 8,
            max_nesting_depth: 3,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode a session starts in
    pub mode: Mode,

    pub engine: EngineConfig,

    pub output: OutputConfig,

    pub files: FilesConfig,

    pub rules: RulesConfig,

    pub style: StyleConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => match serde_yaml::from_str(&content) {
                Ok(config) => config,
                Err(_) => serde_json::from_str(&content)?,
            },
        };

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::find_default() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// First existing config file in the current or home directory
    pub fn find_default() -> Option<PathBuf> {
        let local = CONFIG_FILE_NAMES.iter().map(PathBuf::from);
        let home = dirs::home_dir()
            .into_iter()
            .flat_map(|home| CONFIG_FILE_NAMES.iter().map(move |name| home.join(name)));
        local.chain(home).find(|path| path.exists())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.style.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "style.max_line_length must be positive".to_string(),
            ));
        }
        if self.style.indent_width == 0 {
            return Err(ConfigError::Invalid(
                "style.indent_width must be positive".to_string(),
            ));
        }
        if self.style.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid(
                "style.max_nesting_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize as YAML, used by `lint40 init`
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        mode: Option<Mode>,
        format: Option<OutputFormat>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
    ) {
        if let Some(m) = mode {
            self.mode = m;
        }
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, code: &str) -> bool {
        if self.rules.disabled.iter().any(|c| c == code) {
            return false;
        }

        if self.matches_ignore_prefix(code) {
            return false;
        }

        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|c| c == code);
        }

        true
    }

    /// Check if a rule matches any prefix in the ignore list
    pub fn matches_ignore_prefix(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        self.rules
            .ignore
            .iter()
            .any(|prefix| code.starts_with(&prefix.to_lowercase()))
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, code: &str) -> Option<Severity> {
        self.rules.severity.get(code).copied()
    }

    /// Check if a rule should be ignored for a file
    pub fn should_ignore_rule_for_file(&self, code: &str, file_path: &Path) -> bool {
        let file_str = file_path.to_string_lossy();

        for (pattern, codes) in &self.rules.per_file {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_str.as_ref())
                    && codes.iter().any(|c| c == "all" || c == code)
                {
                    return true;
                }
            }
        }

        false
    }
}
