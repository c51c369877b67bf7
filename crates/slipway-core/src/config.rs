use crate::error::{Result, SlipwayError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ImageRepoKind
// ---------------------------------------------------------------------------

/// Where built images get published. `None` means the image only ever lives
/// in the local docker daemon (local-cluster workflows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageRepoKind {
    #[default]
    None,
    Ecr,
    Nexus,
}

impl ImageRepoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRepoKind::None => "none",
            ImageRepoKind::Ecr => "ecr",
            ImageRepoKind::Nexus => "nexus",
        }
    }
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Postgres instance reachable inside the cluster, used by backup/restore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// kubectl exec target, e.g. `deploy/todo-db`.
    pub target: String,
    /// Database name to dump/restore.
    pub name: String,
    #[serde(default = "default_db_user")]
    pub user: String,
}

fn default_db_user() -> String {
    "postgres".to_string()
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name: release name, image name, and default namespace.
    #[serde(default)]
    pub name: String,
    /// Target namespace; defaults to the project name when unset or null.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Org segment of the local image ref (`<org>/<name>:<version>`).
    #[serde(default = "default_org")]
    pub org: String,
    #[serde(default)]
    pub image_repo: ImageRepoKind,
    /// Helm chart directory, relative to the project root.
    #[serde(default = "default_chart")]
    pub chart: String,
    /// Optional helm values file, relative to the project root.
    #[serde(default)]
    pub values: Option<String>,
    /// Port the service listens on; used by `slipway run`.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

fn default_org() -> String {
    "local".to_string()
}

fn default_chart() -> String {
    "chart".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ProjectConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SlipwayError::ConfigNotFound(path));
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: ProjectConfig = serde_yaml::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SlipwayError::MissingField("name"));
        }
        Ok(())
    }

    /// Namespace defaults to the project name when unset or explicitly null.
    pub fn resolved_namespace(&self) -> &str {
        match &self.namespace {
            Some(ns) if !ns.trim().is_empty() => ns,
            _ => &self.name,
        }
    }

    pub fn image_tag(&self, version: u64) -> String {
        format!("{}:{}", self.name, version)
    }

    pub fn local_image_ref(&self, version: u64) -> String {
        format!("{}/{}:{}", self.org, self.name, version)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
