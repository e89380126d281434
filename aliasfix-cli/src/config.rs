//! Configuration file loading for aliasfix.
//!
//! Discovers and loads `aliasfix.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use aliasfix_core::AliasConfig;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "aliasfix.toml";

/// Source root used when neither the CLI nor the config file names one.
pub const DEFAULT_SOURCE_ROOT: &str = "src";

/// Top-level configuration from aliasfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AliasfixConfig {
    /// Directory the alias marker maps to, relative to the project root.
    pub source_root: Option<Utf8PathBuf>,

    pub alias: AliasSection,

    pub extensions: ExtensionsSection,

    pub walk: WalkSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AliasSection {
    pub marker: Option<String>,
}

/// Extension lists. Each one, when present, replaces the built-in list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtensionsSection {
    /// Files scanned for imports.
    pub source: Option<Vec<String>>,

    /// Tried in order after the alias path; `""` means the path as written.
    pub resolve: Option<Vec<String>>,

    /// Tried for `index<ext>` when the alias names a directory.
    pub index: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WalkSection {
    /// Directory names skipped at any depth.
    pub exclude: Option<Vec<String>>,
}

/// Discover the aliasfix.toml config file.
///
/// Returns `None` if there is none in `project_root`.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an aliasfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<AliasfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<AliasfixConfig> {
    let config: AliasfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<AliasfixConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(AliasfixConfig::default()),
    }
}

/// Settings after merging the config file with CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub source_root: Utf8PathBuf,
    pub alias: AliasConfig,
}

/// CLI values that take part in the merge.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides<'a> {
    pub source_root: Option<&'a Utf8Path>,
    pub marker: Option<&'a str>,
    pub exclude: &'a [String],
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: AliasfixConfig,
}

impl ConfigMerger {
    pub fn new(config: AliasfixConfig) -> Self {
        Self { config }
    }

    /// CLI `source_root` and `marker` override the config file; CLI `exclude` extends it.
    ///
    /// A source root from the config file is relative to `project_root`; one from the CLI is
    /// taken as given.
    pub fn merge(self, project_root: &Utf8Path, cli: &CliOverrides<'_>) -> MergedConfig {
        let source_root = match cli.source_root {
            Some(root) => root.to_path_buf(),
            None => under_project(
                project_root,
                self.config
                    .source_root
                    .as_deref()
                    .unwrap_or(Utf8Path::new(DEFAULT_SOURCE_ROOT)),
            ),
        };

        let mut alias = AliasConfig::default();
        if let Some(marker) = cli.marker.map(str::to_string).or(self.config.alias.marker) {
            alias.marker = marker;
        }
        if let Some(source) = self.config.extensions.source {
            alias.source_extensions = source;
        }
        if let Some(resolve) = self.config.extensions.resolve {
            alias.resolve_extensions = resolve;
        }
        if let Some(index) = self.config.extensions.index {
            alias.index_extensions = index;
        }
        if let Some(exclude) = self.config.walk.exclude {
            alias.exclude_dirs = exclude;
        }
        for name in cli.exclude {
            if !alias.exclude_dirs.contains(name) {
                alias.exclude_dirs.push(name.clone());
            }
        }

        MergedConfig { source_root, alias }
    }
}

fn under_project(project_root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if project_root == Utf8Path::new(".") {
        rel.to_path_buf()
    } else {
        project_root.join(rel)
    }
}
