use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "sanctuary.yaml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
