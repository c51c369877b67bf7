//! Narrow interfaces over the external CLIs the pipeline drives.
//!
//! Each tool sits behind one trait so the pipeline's control flow is testable
//! with fakes, independent of docker/kubectl/helm being installed.

use std::path::{Path, PathBuf};

use crate::config::ImageRepoKind;
use crate::error::Result;

mod docker;
mod helm;
mod kubectl;
mod registry;
mod secretgen;

pub use docker::DockerCli;
pub use helm::HelmCli;
pub use kubectl::Kubectl;
pub use registry::{EcrRegistry, NexusRegistry};
pub use secretgen::SecretgenCli;

/// Builds a container image from the project root.
pub trait ImageBuilder {
    fn build(&self, root: &Path, local_ref: &str, version: u64) -> Result<()>;
}

/// A remote image registry (ECR or Nexus). Absent for local-only targets.
pub trait Registry {
    /// Authenticate; returns the registry host remote refs are rooted at.
    fn login(&self) -> Result<String>;
    /// Existence-check-then-create; "already exists" counts as success.
    fn ensure_repository(&self, name: &str) -> Result<()>;
    fn push(&self, local_ref: &str, remote_ref: &str) -> Result<()>;
}

/// The target cluster, as seen through kubectl.
pub trait Cluster {
    fn current_context(&self) -> Result<String>;
    fn namespace_exists(&self, namespace: &str) -> Result<bool>;
    fn create_namespace(&self, namespace: &str) -> Result<()>;
    fn delete_namespace(&self, namespace: &str) -> Result<()>;
    fn has_cronjob(&self, namespace: &str, name: &str) -> Result<bool>;
    /// Trigger one immediate run of a registered cronjob.
    fn trigger_cronjob(&self, namespace: &str, name: &str, job: &str) -> Result<()>;
    /// Exec a command in a workload, capturing stdout (pg_dump).
    fn exec_capture(&self, namespace: &str, target: &str, argv: &[&str]) -> Result<String>;
    /// Exec a command in a workload, feeding stdin (psql restore).
    fn exec_stdin(&self, namespace: &str, target: &str, argv: &[&str], input: &str) -> Result<()>;
}

/// (Re)generates namespace-scoped secrets.
pub trait SecretProvisioner {
    fn provision(&self, namespace: &str) -> Result<()>;
}

/// Parameters for one atomic upgrade-or-install.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallRequest {
    pub release: String,
    pub namespace: String,
    pub chart: PathBuf,
    pub values: Option<PathBuf>,
    pub image_ref: String,
    pub local: bool,
}

/// Installs and removes releases via the package manager.
pub trait Releaser {
    fn upgrade_install(&self, req: &InstallRequest) -> Result<()>;
    fn uninstall(&self, release: &str, namespace: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Toolchain
// ---------------------------------------------------------------------------

/// The real shell-out implementations, bundled for CLI wiring.
pub struct Toolchain {
    pub docker: DockerCli,
    pub kubectl: Kubectl,
    pub helm: HelmCli,
    pub secretgen: SecretgenCli,
    pub registry: Option<Box<dyn Registry>>,
}

impl Toolchain {
    pub fn new(kind: ImageRepoKind) -> Self {
        let registry: Option<Box<dyn Registry>> = match kind {
            ImageRepoKind::None => None,
            ImageRepoKind::Ecr => Some(Box::new(EcrRegistry::from_env())),
            ImageRepoKind::Nexus => Some(Box::new(NexusRegistry::from_env())),
        };
        Self {
            docker: DockerCli,
            kubectl: Kubectl,
            helm: HelmCli,
            secretgen: SecretgenCli,
            registry,
        }
    }
}
