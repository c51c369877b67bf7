use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SLIPWAY_DIR: &str = ".slipway";
pub const MARKERS_DIR: &str = ".slipway/markers";

pub const CONFIG_FILE: &str = "deploy.yaml";

pub const BUILD_MARKER: &str = "build";
pub const PUSH_MARKER: &str = "push";

pub const DEFAULT_BACKUP_DIR: &str = "backups";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn slipway_dir(root: &Path) -> PathBuf {
    root.join(SLIPWAY_DIR)
}

pub fn markers_dir(root: &Path) -> PathBuf {
    root.join(MARKERS_DIR)
}

pub fn marker_path(root: &Path, marker: &str) -> PathBuf {
    markers_dir(root).join(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(config_path(root), PathBuf::from("/tmp/proj/deploy.yaml"));
        assert_eq!(
            marker_path(root, BUILD_MARKER),
            PathBuf::from("/tmp/proj/.slipway/markers/build")
        );
    }
}
