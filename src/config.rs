//! Site configuration.
//!
//! Configuration lives in `.gitpress/config.json` at the repository root.
//! All fields are optional; CLI flags override file values, file values
//! override the stock defaults.
//!
//! ```json
//! {
//!   "outdir": "docs",
//!   "use_epochname": false,
//!   "extname": "html",
//!   "narchive": 40
//! }
//! ```
//!
//! Validation runs before any build work: the archive capacity must be
//! positive, the extension must be a plain word token, and the output
//! directory must not nest inside the tool's own state directory.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// The tool's private state directory; config lives here and output
/// never may.
pub const DOT_DIR: &str = ".gitpress";

static EXTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("extname pattern is valid"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid outdir {0:?} - cannot be output to the {DOT_DIR:?} directory")]
    OutdirInDotDir(String),
    #[error("invalid outdir - must not be empty")]
    EmptyOutdir,
    #[error("invalid extname {0:?} - extname must be [0-9a-zA-Z_]+")]
    BadExtname(String),
    #[error("invalid narchive {0} - narchive must be greater than 0")]
    BadNarchive(usize),
}

/// Site configuration. Unknown keys are rejected to catch typos early.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output directory, relative to the repository root.
    pub outdir: String,
    /// Name output files by creation epoch instead of source name.
    pub use_epochname: bool,
    /// Extension of generated files.
    pub extname: String,
    /// Documents per archive/tag page.
    pub narchive: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            outdir: "docs".to_string(),
            use_epochname: false,
            extname: "html".to_string(),
            narchive: 40,
        }
    }
}

impl Config {
    /// Path of the config file under `repo_root`.
    pub fn file_path(repo_root: &Path) -> PathBuf {
        repo_root.join(DOT_DIR).join("config.json")
    }

    /// Load `.gitpress/config.json`, falling back to defaults when the
    /// file does not exist. A present-but-malformed file is an error.
    pub fn load(repo_root: &Path) -> Result<Config, ConfigError> {
        let path = Config::file_path(repo_root);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check the stated invariants. Called once before any build work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.outdir.is_empty() {
            return Err(ConfigError::EmptyOutdir);
        }
        if Path::new(&self.outdir).starts_with(DOT_DIR) {
            return Err(ConfigError::OutdirInDotDir(self.outdir.clone()));
        }
        if !EXTNAME.is_match(&self.extname) {
            return Err(ConfigError::BadExtname(self.extname.clone()));
        }
        if self.narchive < 1 {
            return Err(ConfigError::BadNarchive(self.narchive));
        }
        Ok(())
    }
}

/// Stock config as pretty JSON, printed by `gitpress gen-config`.
pub fn stock_config_json() -> String {
    // Defaults always serialize.
    serde_json::to_string_pretty(&Config::default()).unwrap_or_default()
}
