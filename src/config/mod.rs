use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::infrastructure::abi::{
    ResolverOptions, ScanOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILE_BYTES,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `felt_lens=debug`
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub abi_paths: Vec<String>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_file_bytes: self.scan.max_file_bytes,
            resolver: self.resolver_options(),
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_depth: self.resolver.max_depth,
        }
    }

    /// Configured ABI roots, expanded against `cwd`
    pub fn abi_roots(&self, cwd: &Path) -> Vec<PathBuf> {
        self.abi_paths
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| expand_path(p.trim(), cwd))
            .collect()
    }
}

/// Load the config from its default location
///
/// A missing or unreadable file yields the defaults.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path).unwrap_or_default()
}

/// Load the config from an explicit path, reporting any problem
pub fn load_from(path: &Path) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse(content: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("FELT_LENS_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("felt-lens").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("felt-lens").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "felt-lens", "felt-lens")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Expand `~/` and make relative paths absolute against `cwd`
pub fn expand_path(raw: &str, cwd: &Path) -> PathBuf {
    if raw == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
