//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. `--config <path>`
//! 2. `$EXPLORER_CONFIG` environment variable (path to config file)
//! 3. Project-local `.explorer.toml` in the current working directory
//! 4. Global `~/.config/explorer/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::fs::listing::{clean_path, DEFAULT_CACHE_TTL};
use crate::fs::operations::{OpenOptions, DEFAULT_MAX_FILE_BYTES};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory the browser starts in.
    pub root: Option<String>,
}

/// Directory tree settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// List dot-entries.
    pub show_hidden: Option<bool>,
    /// How long a directory listing is served from cache.
    pub cache_ttl_ms: Option<u64>,
}

/// File viewer settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    /// Files above this size are refused.
    pub max_file_bytes: Option<u64>,
    /// Where opened files are materialized.
    pub temp_dir: Option<String>,
}

/// Shell used for the command line.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    pub program: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub exec_fg: Option<String>,
    pub output_fg: Option<String>,
    pub prompt_fg: Option<String>,
    pub border_fg: Option<String>,
    pub border_focused_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub viewer: ViewerConfig,
    pub shell: ShellConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default starting directory.
pub const DEFAULT_ROOT: &str = "/";
/// Default shell program, invoked as `<program> -c <command>`.
pub const DEFAULT_SHELL: &str = "sh";

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config file paths in priority order, excluding `--config`.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("EXPLORER_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".explorer.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("explorer").join("config.toml"));
    }

    paths
}

/// Read and parse a TOML config file. Missing files are skipped silently;
/// unparseable ones with a warning.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                root: other.general.root.clone().or(self.general.root),
            },
            tree: TreeConfig {
                show_hidden: other.tree.show_hidden.or(self.tree.show_hidden),
                cache_ttl_ms: other.tree.cache_ttl_ms.or(self.tree.cache_ttl_ms),
            },
            viewer: ViewerConfig {
                max_file_bytes: other.viewer.max_file_bytes.or(self.viewer.max_file_bytes),
                temp_dir: other.viewer.temp_dir.clone().or(self.viewer.temp_dir),
            },
            shell: ShellConfig {
                program: other.shell.program.clone().or(self.shell.program),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
        }
    }

    /// Load the final merged configuration.
    pub fn load(cli_config_path: Option<&Path>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Starting directory as a cleaned absolute path; relative values resolve
    /// against the working directory.
    pub fn root(&self) -> PathBuf {
        let raw = PathBuf::from(self.general.root.as_deref().unwrap_or(DEFAULT_ROOT));
        let absolute = std::path::absolute(&raw).unwrap_or(raw);
        clean_path(&absolute)
    }

    pub fn show_hidden(&self) -> bool {
        self.tree.show_hidden.unwrap_or(true)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.tree
            .cache_ttl_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.viewer.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.viewer
            .temp_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn shell(&self) -> &str {
        self.shell.program.as_deref().unwrap_or(DEFAULT_SHELL)
    }

    /// Options for opening files into the viewer.
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            max_file_bytes: self.max_file_bytes(),
            temp_dir: self.temp_dir(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
