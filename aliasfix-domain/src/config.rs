use thiserror::Error;

/// Alias convention and file-type policy for one repair pass.
///
/// Passed explicitly to the resolver, repairer and walker; there is no global default state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConfig {
    /// Root marker every alias starts with, e.g. `@/`.
    pub marker: String,

    /// Extensions of files scanned for import statements.
    pub source_extensions: Vec<String>,

    /// Ordered extensions tried when resolving an alias to a file. `""` means "as written".
    pub resolve_extensions: Vec<String>,

    /// Ordered extensions tried for a directory's `index` file.
    pub index_extensions: Vec<String>,

    /// Directory names never descended into (build output, vendored packages).
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("alias marker must not be empty")]
    EmptyMarker,

    #[error("alias marker must not contain quotes: {0:?}")]
    QuotedMarker(String),

    #[error("at least one source extension is required")]
    NoSourceExtensions,

    #[error("source extension must not be empty")]
    EmptySourceExtension,
}

pub const INDEX_STEM: &str = "index";

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            marker: "@/".to_string(),
            source_extensions: strings(&[".js", ".jsx", ".ts", ".tsx"]),
            resolve_extensions: strings(&["", ".js", ".jsx", ".ts", ".tsx", ".json"]),
            index_extensions: strings(&[".js", ".jsx", ".ts", ".tsx"]),
            exclude_dirs: strings(&["node_modules", ".git", "dist", "build", "coverage"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AliasConfig {
    /// Normalize extension lists (leading dot, no duplicates, order kept) and validate.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.source_extensions = normalize_extensions(&self.source_extensions);
        self.resolve_extensions = normalize_extensions(&self.resolve_extensions);
        self.index_extensions = normalize_extensions(&self.index_extensions);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if self.marker.contains(['"', '\'']) {
            return Err(ConfigError::QuotedMarker(self.marker.clone()));
        }
        if self.source_extensions.is_empty() {
            return Err(ConfigError::NoSourceExtensions);
        }
        if self.source_extensions.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::EmptySourceExtension);
        }
        Ok(())
    }

    /// The root-relative part of an alias, or `None` if it does not start with the marker.
    pub fn strip_marker<'a>(&self, alias: &'a str) -> Option<&'a str> {
        alias.strip_prefix(self.marker.as_str())
    }

    /// Build an alias from a root-relative path, always with forward slashes.
    pub fn to_alias(&self, relative: &str) -> String {
        format!("{}{}", self.marker, relative.replace('\\', "/"))
    }

    pub fn is_source_file(&self, file_name: &str) -> bool {
        self.source_extensions
            .iter()
            .any(|ext| file_name.len() > ext.len() && file_name.ends_with(ext.as_str()))
    }

    pub fn is_excluded_dir(&self, dir_name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == dir_name)
    }

    /// `index.js`, `index.jsx`, ... in configured order.
    pub fn index_file_names(&self) -> impl Iterator<Item = String> + '_ {
        self.index_extensions
            .iter()
            .map(|ext| format!("{INDEX_STEM}{ext}"))
    }
}

fn normalize_extensions(exts: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(exts.len());
    for ext in exts {
        let ext = ext.trim();
        let ext = if ext.is_empty() || ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{ext}")
        };
        if !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}
