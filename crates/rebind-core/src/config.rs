use crate::error::{Error, Result};
use rebind_hygiene::{TranspileOptions, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "rebind.json";

/// Runtime configuration for the rebind CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Text placed between an original name and its counter.
    pub separator: String,

    /// Indentation unit for emitted code. `None` means two spaces.
    pub indent: Option<String>,
}

/// The subset of [`Config`] that may come from `rebind.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    separator: Option<String>,
    indent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            separator: DEFAULT_SEPARATOR.to_string(),
            indent: None,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Layer a config file over the defaults.
    ///
    /// An explicit `path` must exist. Without one, `rebind.json` in `cwd`
    /// is used when present and silently skipped otherwise. Relative
    /// paths are taken relative to `cwd`.
    pub fn load(cwd: PathBuf, path: Option<&Path>) -> Result<Self> {
        let mut config = Self::new(cwd);
        let (path, required) = match path {
            Some(p) => (config.cwd.join(p), true),
            None => (config.cwd.join(CONFIG_FILE_NAME), false),
        };
        if !required && !path.is_file() {
            return Ok(config);
        }

        let text = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let file: FileConfig =
            serde_json::from_str(&text).map_err(|source| Error::ConfigParse { path, source })?;

        if let Some(separator) = file.separator {
            config = config.with_separator(separator)?;
        }
        config.indent = file.indent;
        Ok(config)
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Set the rename separator, rejecting values that would not form an
    /// identifier when appended to one.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Result<Self> {
        let separator = separator.into();
        validate_separator(&separator)?;
        self.separator = separator;
        Ok(self)
    }

    /// Set the indentation unit.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    /// Options for the renaming engine.
    #[must_use]
    pub fn transpile_options(&self) -> TranspileOptions {
        TranspileOptions {
            separator: self.separator.clone(),
            indent: self.indent.clone(),
        }
    }
}

/// Check that `separator` can sit inside a JavaScript identifier and
/// keeps generated names distinct.
pub fn validate_separator(separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(Error::InvalidSeparator {
            separator: separator.to_string(),
            reason: "must not be empty",
        });
    }
    if !separator
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(Error::InvalidSeparator {
            separator: separator.to_string(),
            reason: "only ASCII letters, digits, '_' and '$' are allowed",
        });
    }
    // A trailing digit merges into the counter: with "1", `a1` at counter 0
    // and `a` at counter 10 both become `a110`.
    if separator.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(Error::InvalidSeparator {
            separator: separator.to_string(),
            reason: "must not end with a digit",
        });
    }
    Ok(())
}
