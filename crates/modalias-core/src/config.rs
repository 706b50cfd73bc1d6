use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration for the modalias CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory. Alias config discovery starts here.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Explicit alias config file, bypassing discovery.
    pub alias_file: Option<PathBuf>,

    /// Search upward from `cwd` for an alias config when no file is given.
    pub discover: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            alias_file: None,
            discover: true,
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

    /// Use a specific alias config file. Relative paths are taken from `cwd`.
    #[must_use]
    pub fn with_alias_file(mut self, path: Option<PathBuf>) -> Self {
        self.alias_file = path;
        self
    }

    /// Enable or disable alias config discovery.
    #[must_use]
    pub fn with_discovery(mut self, discover: bool) -> Self {
        self.discover = discover;
        self
    }

    /// The alias config file to load, if any.
    ///
    /// An explicit file always wins; otherwise the nearest config found by
    /// walking up from `cwd` (unless discovery is off).
    #[must_use]
    pub fn alias_config_path(&self) -> Option<PathBuf> {
        if let Some(ref file) = self.alias_file {
            return Some(absolutize(&self.cwd, file));
        }
        if self.discover {
            return crate::alias::find_alias_config(&self.cwd);
        }
        None
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
