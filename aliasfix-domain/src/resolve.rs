use crate::config::AliasConfig;
use crate::ports::{TreeView, stays_under_root};
use camino::{Utf8Path, Utf8PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved,
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(self) -> bool {
        self == Resolution::Resolved
    }
}

/// Decide whether `alias` points at an existing module.
///
/// Resolved when `<relative><ext>` is a file for some resolvable extension (tried in order,
/// `""` included), or when `<relative>` is a directory holding `index<ext>` for some index
/// extension. Anything missing along the way is just `Unresolved`, and so is a relative part
/// that is absolute or climbs out with `..`.
pub fn resolve(alias: &str, view: &dyn TreeView, config: &AliasConfig) -> Resolution {
    let Some(relative) = config.strip_marker(alias) else {
        return Resolution::Unresolved;
    };
    if !stays_under_root(Utf8Path::new(relative)) {
        return Resolution::Unresolved;
    }

    for ext in &config.resolve_extensions {
        let candidate = format!("{relative}{ext}");
        if !candidate.is_empty() && view.is_file(Utf8Path::new(&candidate)) {
            return Resolution::Resolved;
        }
    }

    let dir = Utf8Path::new(relative.trim_end_matches('/'));
    if view.is_dir(dir) && has_index_file(view, dir, config) {
        return Resolution::Resolved;
    }

    Resolution::Unresolved
}

pub fn is_resolved(alias: &str, view: &dyn TreeView, config: &AliasConfig) -> bool {
    resolve(alias, view, config).is_resolved()
}

pub(crate) fn has_index_file(view: &dyn TreeView, dir: &Utf8Path, config: &AliasConfig) -> bool {
    config.index_file_names().any(|name| {
        let path = if dir.as_str().is_empty() {
            Utf8PathBuf::from(name)
        } else {
            dir.join(name)
        };
        view.is_file(&path)
    })
}
