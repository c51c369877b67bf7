//! Persisted stage-completion markers.
//!
//! Each completed pipeline stage leaves one file under `.slipway/markers/`
//! holding key=value lines. Markers make repeat invocations skip work that is
//! already done and carry stage outputs across separate invocations. They are
//! trusted as-is: no staleness probe, the operator invalidates them with
//! `slipway build` or `slipway clean`.

use crate::error::{Result, SlipwayError};
use crate::io;
use crate::paths;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic, best-effort-unique version id: wall-clock seconds at build time.
/// Same-second rebuilds collide; acceptable for an operator-driven tool.
pub fn version_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Marker records
// ---------------------------------------------------------------------------

/// Output of the build stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMarker {
    /// `<name>:<version>`
    pub image_tag: String,
    /// `<org>/<name>:<version>`
    pub local_image_ref: String,
}

impl BuildMarker {
    /// Version component of the image tag.
    pub fn version(&self) -> &str {
        self.image_tag.rsplit(':').next().unwrap_or("")
    }
}

/// Output of the publish stage; absent for local-only targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMarker {
    pub remote_image_ref: String,
}

// ---------------------------------------------------------------------------
// MarkerStore
// ---------------------------------------------------------------------------

pub struct MarkerStore {
    dir: PathBuf,
}

impl MarkerStore {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: paths::markers_dir(root),
        }
    }

    pub fn load_build(&self) -> Result<Option<BuildMarker>> {
        let Some(kv) = self.read(paths::BUILD_MARKER)? else {
            return Ok(None);
        };
        Ok(Some(BuildMarker {
            image_tag: require(&kv, paths::BUILD_MARKER, "image_tag")?,
            local_image_ref: require(&kv, paths::BUILD_MARKER, "local_image_ref")?,
        }))
    }

    /// A fresh build invalidates any previously pushed image.
    pub fn save_build(&self, marker: &BuildMarker) -> Result<()> {
        self.remove(paths::PUSH_MARKER)?;
        let body = format!(
            "image_tag={}\nlocal_image_ref={}\n",
            marker.image_tag, marker.local_image_ref
        );
        io::atomic_write(&self.dir.join(paths::BUILD_MARKER), body.as_bytes())
    }

    pub fn load_push(&self) -> Result<Option<PushMarker>> {
        let Some(kv) = self.read(paths::PUSH_MARKER)? else {
            return Ok(None);
        };
        Ok(Some(PushMarker {
            remote_image_ref: require(&kv, paths::PUSH_MARKER, "remote_image_ref")?,
        }))
    }

    pub fn save_push(&self, marker: &PushMarker) -> Result<()> {
        let body = format!("remote_image_ref={}\n", marker.remote_image_ref);
        io::atomic_write(&self.dir.join(paths::PUSH_MARKER), body.as_bytes())
    }

    /// Delete every marker. Idempotent.
    pub fn clean(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn read(&self, marker: &str) -> Result<Option<HashMap<String, String>>> {
        let path = self.dir.join(marker);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(parse_kv(&content)))
    }

    fn remove(&self, marker: &str) -> Result<()> {
        let path = self.dir.join(marker);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn parse_kv(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            line.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

fn require(kv: &HashMap<String, String>, marker: &str, key: &str) -> Result<String> {
    kv.get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| SlipwayError::CorruptMarker {
            marker: marker.to_string(),
            key: key.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> MarkerStore {
        MarkerStore::new(dir.path())
    }

    #[test]
    fn build_marker_roundtrip() {
        let dir = TempDir::new().unwrap();
        let marker = BuildMarker {
            image_tag: "todo:1700000000".into(),
            local_image_ref: "local/todo:1700000000".into(),
        };
        store(&dir).save_build(&marker).unwrap();
        assert_eq!(store(&dir).load_build().unwrap(), Some(marker));
    }

    #[test]
    fn absent_markers_load_as_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).load_build().unwrap(), None);
        assert_eq!(store(&dir).load_push().unwrap(), None);
    }

    #[test]
    fn save_build_invalidates_push_marker() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.save_push(&PushMarker {
            remote_image_ref: "reg.example.com/todo:1".into(),
        })
        .unwrap();
        s.save_build(&BuildMarker {
            image_tag: "todo:2".into(),
            local_image_ref: "local/todo:2".into(),
        })
        .unwrap();
        assert_eq!(s.load_push().unwrap(), None);
    }

    #[test]
    fn corrupt_marker_names_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = paths::marker_path(dir.path(), paths::BUILD_MARKER);
        io::atomic_write(&path, b"image_tag=todo:1\n").unwrap();
        let err = store(&dir).load_build().unwrap_err();
        assert!(matches!(
            err,
            SlipwayError::CorruptMarker { ref key, .. } if key == "local_image_ref"
        ));
    }

    #[test]
    fn kv_parser_skips_comments_and_blanks() {
        let kv = parse_kv("# header\n\nimage_tag = todo:1\n");
        assert_eq!(kv.get("image_tag").map(String::as_str), Some("todo:1"));
    }

    #[test]
    fn clean_removes_all_markers() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.save_build(&BuildMarker {
            image_tag: "todo:1".into(),
            local_image_ref: "local/todo:1".into(),
        })
        .unwrap();
        s.clean().unwrap();
        assert_eq!(s.load_build().unwrap(), None);
        s.clean().unwrap(); // idempotent
    }

    #[test]
    fn marker_version_component() {
        let marker = BuildMarker {
            image_tag: "todo:1700000000".into(),
            local_image_ref: "local/todo:1700000000".into(),
        };
        assert_eq!(marker.version(), "1700000000");
    }
}
