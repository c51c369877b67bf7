//! Database backup and restore, run inside the cluster's database workload
//! via `kubectl exec` so no local postgres client is needed.

use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::{Result, SlipwayError};
use crate::io;
use crate::tools::Cluster;

/// Dump the configured database into `backup_dir`, returning the dump path.
/// Filenames are timestamped so repeated backups never overwrite each other.
pub fn backup(cluster: &dyn Cluster, config: &ProjectConfig, backup_dir: &Path) -> Result<PathBuf> {
    let db = config
        .database
        .as_ref()
        .ok_or(SlipwayError::MissingField("database"))?;
    let ns = config.resolved_namespace();
    tracing::info!(namespace = ns, database = db.name.as_str(), "dumping database");
    let dump = cluster.exec_capture(
        ns,
        &db.target,
        &["pg_dump", "-U", &db.user, "--clean", "--if-exists", &db.name],
    )?;
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let path = backup_dir.join(format!("{}-{stamp}.sql", db.name));
    io::atomic_write(&path, dump.as_bytes())?;
    Ok(path)
}

/// Feed a previously taken dump back through psql.
pub fn restore(cluster: &dyn Cluster, config: &ProjectConfig, dump: &Path) -> Result<()> {
    let db = config
        .database
        .as_ref()
        .ok_or(SlipwayError::MissingField("database"))?;
    let ns = config.resolved_namespace();
    let input = std::fs::read_to_string(dump)?;
    tracing::info!(namespace = ns, database = db.name.as_str(), dump = %dump.display(), "restoring database");
    cluster.exec_stdin(ns, &db.target, &["psql", "-U", &db.user, &db.name], &input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct ScriptedCluster {
        dump_output: String,
        restored: RefCell<Option<String>>,
    }

    impl Cluster for ScriptedCluster {
        fn current_context(&self) -> Result<String> {
            Ok("minikube".into())
        }
        fn namespace_exists(&self, _: &str) -> Result<bool> {
            Ok(true)
        }
        fn create_namespace(&self, _: &str) -> Result<()> {
            Ok(())
        }
        fn delete_namespace(&self, _: &str) -> Result<()> {
            Ok(())
        }
        fn has_cronjob(&self, _: &str, _: &str) -> Result<bool> {
            Ok(false)
        }
        fn trigger_cronjob(&self, _: &str, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        fn exec_capture(&self, _ns: &str, _target: &str, argv: &[&str]) -> Result<String> {
            assert_eq!(argv[0], "pg_dump");
            Ok(self.dump_output.clone())
        }
        fn exec_stdin(&self, _ns: &str, _target: &str, argv: &[&str], input: &str) -> Result<()> {
            assert_eq!(argv[0], "psql");
            *self.restored.borrow_mut() = Some(input.to_string());
            Ok(())
        }
    }

    fn config() -> ProjectConfig {
        serde_yaml::from_str("name: todo\ndatabase:\n  target: deploy/todo-db\n  name: todo\n")
            .unwrap()
    }

    #[test]
    fn backup_writes_timestamped_dump() {
        let dir = TempDir::new().unwrap();
        let cluster = ScriptedCluster {
            dump_output: "-- dump\n".into(),
            restored: RefCell::new(None),
        };
        let path = backup(&cluster, &config(), dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("todo-") && name.ends_with(".sql"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "-- dump\n");
    }

    #[test]
    fn restore_feeds_dump_to_psql() {
        let dir = TempDir::new().unwrap();
        let dump = dir.path().join("todo.sql");
        std::fs::write(&dump, "DROP TABLE x;\n").unwrap();
        let cluster = ScriptedCluster {
            dump_output: String::new(),
            restored: RefCell::new(None),
        };
        restore(&cluster, &config(), &dump).unwrap();
        assert_eq!(
            cluster.restored.borrow().as_deref(),
            Some("DROP TABLE x;\n")
        );
    }

    #[test]
    fn backup_without_database_config_fails() {
        let dir = TempDir::new().unwrap();
        let cluster = ScriptedCluster {
            dump_output: String::new(),
            restored: RefCell::new(None),
        };
        let cfg: ProjectConfig = serde_yaml::from_str("name: todo\n").unwrap();
        let err = backup(&cluster, &cfg, dir.path()).unwrap_err();
        assert!(matches!(err, SlipwayError::MissingField("database")));
    }
}
