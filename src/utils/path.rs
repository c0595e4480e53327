//! Path utilities: expand ~ and resolve paths relative to the config dir.

use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Absolute paths are kept; relative ones are placed under `base`.
pub fn resolve_under(base: &Path, path: &str) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_land_under_base() {
        let base = Path::new("/srv/sitebook");
        assert_eq!(
            resolve_under(base, "ledger.sqlite"),
            PathBuf::from("/srv/sitebook/ledger.sqlite")
        );
        assert_eq!(
            resolve_under(base, "/data/ledger.sqlite"),
            PathBuf::from("/data/ledger.sqlite")
        );
    }
}
