//! Clap-free settings for a pass.

use aliasfix_domain::AliasConfig;
use aliasfix_types::report::PassMode;
use camino::Utf8PathBuf;

#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Directory the alias marker maps to.
    pub source_root: Utf8PathBuf,

    pub mode: PassMode,

    pub config: AliasConfig,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            source_root: Utf8PathBuf::from("src"),
            mode: PassMode::default(),
            config: AliasConfig::default(),
        }
    }
}
