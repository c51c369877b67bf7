pub mod clean;
pub mod db;
pub mod deploy;
pub mod dev;
pub mod image;
pub mod local;
pub mod secrets;

use anyhow::Context;
use slipway_core::config::ProjectConfig;
use slipway_core::context::DeployContext;
use slipway_core::pipeline::Pipeline;
use slipway_core::tools::Toolchain;
use std::path::{Path, PathBuf};

/// Resolved inputs shared by the cluster-facing commands: project config,
/// deploy context, and the real toolchain.
pub(crate) struct Env {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub context: DeployContext,
    pub tools: Toolchain,
}

impl Env {
    pub fn load(root: &Path, context_override: Option<&str>) -> anyhow::Result<Self> {
        let config = ProjectConfig::load(root).context("failed to load project config")?;
        let tools = Toolchain::new(config.image_repo);
        let context = DeployContext::resolve(context_override, &tools.kubectl)
            .context("failed to resolve deploy context")?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            context,
            tools,
        })
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(
            &self.root,
            &self.config,
            &self.context,
            &self.tools.docker,
            self.tools.registry.as_deref(),
            &self.tools.kubectl,
            &self.tools.secretgen,
            &self.tools.helm,
        )
    }

    /// The `context/project` string shown in prompts and status lines.
    pub fn target(&self) -> String {
        self.context.target(&self.config.name)
    }
}
