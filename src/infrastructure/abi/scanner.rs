//! ABI file scanner - discovers contract ABIs on the filesystem

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::parser::{extract_abi, parse_abi_with, ParsedAbi};
use super::resolver::ResolverOptions;
use crate::domain::abi::{AbiError, SelectorRegistry};

pub const DEFAULT_MAX_FILE_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Larger files are skipped without being read
    pub max_file_bytes: u64,
    pub resolver: ResolverOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            resolver: ResolverOptions::default(),
        }
    }
}

/// ABI file scanner
///
/// Picks up raw ABI arrays as well as Scarb/RPC contract class files
/// (`*.contract_class.json`, class responses with an `abi` field).
#[derive(Debug, Clone, Default)]
pub struct AbiScanner {
    options: ScanOptions,
}

impl AbiScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan a directory tree (or a single file) for ABI files
    pub fn scan(&self, root: impl AsRef<Path>) -> SelectorRegistry {
        let started = Instant::now();
        let root = root.as_ref();
        let mut registry = SelectorRegistry::new();
        let mut scanned_files = 0;
        let mut errors = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > self.options.max_file_bytes {
                debug!(path = %path.display(), bytes = metadata.len(), "skipping oversized file");
                continue;
            }

            scanned_files += 1;

            match self.load_file(path) {
                Ok(Some(parsed)) => {
                    for function in parsed.functions() {
                        let mut function = function.clone();
                        function.source = Some(path.to_path_buf());
                        registry.insert(function);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    let message = format!("{err:#}");
                    warn!(path = %path.display(), error = %message, "failed to load ABI");
                    errors.push(format!("{}: {}", path.display(), message));
                }
            }
        }

        registry.scanned_files = scanned_files;
        registry.loaded_functions = registry.len();
        registry.errors = errors;
        registry.scan_ms = started.elapsed().as_millis();

        debug!(
            root = %root.display(),
            files = registry.scanned_files,
            functions = registry.loaded_functions,
            errors = registry.errors.len(),
            "scanned ABI root"
        );
        registry
    }

    /// Scan multiple roots; earlier roots win on selector clashes
    pub fn scan_roots(&self, roots: &[PathBuf]) -> SelectorRegistry {
        let started = Instant::now();
        let mut registry = SelectorRegistry::new();

        for root in roots {
            registry.merge(self.scan(root));
        }

        registry.loaded_functions = registry.len();
        registry.scan_ms = started.elapsed().as_millis();

        registry
    }

    /// Load one ABI file
    ///
    /// Returns `Ok(None)` for JSON documents that hold no ABI at all.
    pub fn load_file(&self, path: &Path) -> anyhow::Result<Option<ParsedAbi>> {
        let content = fs::read_to_string(path).context("failed to read file")?;
        let value: serde_json::Value = serde_json::from_str(&content).context("invalid JSON")?;

        let entries = match extract_abi(&value) {
            Ok(entries) => entries,
            Err(AbiError::MissingAbi) => return Ok(None),
            Err(err) => return Err(err).context("malformed ABI"),
        };

        let parsed = parse_abi_with(&entries, self.options.resolver).context("unresolvable ABI")?;
        Ok(Some(parsed))
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "node_modules" | ".snfoundry_cache" | ".next" | "dist"
                )
            })
            .unwrap_or(false)
    }
}
