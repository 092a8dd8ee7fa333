use sanctuary_core::paths::CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Resolve the site root directory.
///
/// Priority:
/// 1. `--root` flag / `SANCTUARY_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `sanctuary.yaml`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_config_dir(&cwd).unwrap_or(cwd)
}

fn find_config_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}
