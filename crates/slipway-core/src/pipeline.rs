//! The deploy pipeline: build -> [publish] -> namespace -> secrets -> install.
//!
//! Strictly sequential; each stage's typed result is the next stage's input.
//! On-disk markers exist only so a re-invocation can skip stages that already
//! completed. Any stage failure aborts the invocation; re-running the pipeline
//! resumes from the markers.

use std::path::Path;

use crate::config::ProjectConfig;
use crate::context::DeployContext;
use crate::error::{Result, SlipwayError};
use crate::marker::{self, BuildMarker, MarkerStore, PushMarker};
use crate::tools::{Cluster, ImageBuilder, InstallRequest, Registry, Releaser, SecretProvisioner};

/// Cronjob looked up after namespace creation; when registered, one immediate
/// run is triggered fire-and-forget.
pub const SECRET_ROTATION_CRONJOB: &str = "secret-rotation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Building,
    Publishing,
    NamespaceEnsuring,
    SecretProvisioning,
    Installing,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Building => "building",
            Stage::Publishing => "publishing",
            Stage::NamespaceEnsuring => "namespace-ensuring",
            Stage::SecretProvisioning => "secret-provisioning",
            Stage::Installing => "installing",
            Stage::Done => "done",
        }
    }
}

pub struct Pipeline<'a> {
    root: &'a Path,
    config: &'a ProjectConfig,
    context: &'a DeployContext,
    markers: MarkerStore,
    builder: &'a dyn ImageBuilder,
    registry: Option<&'a dyn Registry>,
    cluster: &'a dyn Cluster,
    secrets: &'a dyn SecretProvisioner,
    releaser: &'a dyn Releaser,
}

impl<'a> Pipeline<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root: &'a Path,
        config: &'a ProjectConfig,
        context: &'a DeployContext,
        builder: &'a dyn ImageBuilder,
        registry: Option<&'a dyn Registry>,
        cluster: &'a dyn Cluster,
        secrets: &'a dyn SecretProvisioner,
        releaser: &'a dyn Releaser,
    ) -> Self {
        Self {
            root,
            config,
            context,
            markers: MarkerStore::new(root),
            builder,
            registry,
            cluster,
            secrets,
            releaser,
        }
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    /// Build the image and persist a fresh BuildMarker (invalidating any
    /// previous push). A failed build is fatal; no retry.
    pub fn build(&self) -> Result<BuildMarker> {
        let version = marker::version_now();
        let local_ref = self.config.local_image_ref(version);
        tracing::info!(stage = Stage::Building.as_str(), image = %local_ref, "building image");
        self.builder
            .build(self.root, &local_ref, version)
            .map_err(SlipwayError::into_build)?;
        let m = BuildMarker {
            image_tag: self.config.image_tag(version),
            local_image_ref: local_ref,
        };
        self.markers.save_build(&m)?;
        Ok(m)
    }

    /// Reuse an existing BuildMarker unless `force`. The marker is trusted
    /// as-is; staleness is the operator's call (`slipway clean`).
    pub fn ensure_built(&self, force: bool) -> Result<BuildMarker> {
        if !force {
            if let Some(m) = self.markers.load_build()? {
                tracing::info!(image = %m.local_image_ref, "build marker present, skipping build");
                return Ok(m);
            }
        }
        self.build()
    }

    /// Authenticate, ensure the remote repository, tag and push. Exact no-op
    /// (zero external calls) without a configured registry.
    pub fn publish(&self, build: &BuildMarker) -> Result<Option<PushMarker>> {
        let Some(registry) = self.registry else {
            return Ok(None);
        };
        tracing::info!(stage = Stage::Publishing.as_str(), "publishing image");
        let host = registry.login()?;
        registry.ensure_repository(&self.config.name)?;
        let remote_ref = format!("{host}/{}:{}", self.config.name, build.version());
        registry.push(&build.local_image_ref, &remote_ref)?;
        let m = PushMarker {
            remote_image_ref: remote_ref,
        };
        self.markers.save_push(&m)?;
        Ok(Some(m))
    }

    /// Reuse the PushMarker when it is still valid for the current build
    /// (a rebuild deletes it), otherwise publish.
    pub fn ensure_published(&self, build: &BuildMarker) -> Result<Option<PushMarker>> {
        if self.registry.is_none() {
            return Ok(None);
        }
        if let Some(m) = self.markers.load_push()? {
            tracing::info!(image = %m.remote_image_ref, "push marker present, skipping publish");
            return Ok(Some(m));
        }
        self.publish(build)
    }

    /// Create the namespace if absent. Trigger failure of the registered
    /// secret-rotation job is logged and ignored: the namespace already
    /// exists, which is what later stages need.
    pub fn ensure_namespace(&self) -> Result<()> {
        let ns = self.config.resolved_namespace();
        if self.cluster.namespace_exists(ns)? {
            tracing::debug!(namespace = ns, "namespace exists");
            return Ok(());
        }
        tracing::info!(stage = Stage::NamespaceEnsuring.as_str(), namespace = ns, "creating namespace");
        self.cluster.create_namespace(ns)?;
        match self.cluster.has_cronjob(ns, SECRET_ROTATION_CRONJOB) {
            Ok(true) => {
                let job = format!("{SECRET_ROTATION_CRONJOB}-initial");
                if let Err(e) = self.cluster.trigger_cronjob(ns, SECRET_ROTATION_CRONJOB, &job) {
                    tracing::warn!(error = %e, "failed to trigger secret-rotation job");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "could not check for secret-rotation cronjob"),
        }
        Ok(())
    }

    /// Secrets are regenerated on every deploy. Deliberately not marker-gated:
    /// secret material may need rotation.
    pub fn provision_secrets(&self) -> Result<()> {
        let ns = self.config.resolved_namespace();
        tracing::info!(stage = Stage::SecretProvisioning.as_str(), namespace = ns, "provisioning secrets");
        self.secrets.provision(ns)
    }

    /// Atomic upgrade-or-install. Local contexts consume the locally built
    /// image; remote contexts require a pushed one.
    pub fn install(&self, build: &BuildMarker, push: Option<&PushMarker>) -> Result<()> {
        let image_ref = if self.context.is_local() {
            build.local_image_ref.clone()
        } else {
            push.map(|m| m.remote_image_ref.clone()).ok_or_else(|| {
                SlipwayError::MissingArtifact(format!(
                    "no pushed image for remote context '{}'; run 'slipway push' \
                     (requires image_repo in deploy.yaml)",
                    self.context
                ))
            })?
        };
        tracing::info!(
            stage = Stage::Installing.as_str(),
            release = self.config.name.as_str(),
            image = %image_ref,
            "installing release"
        );
        let req = InstallRequest {
            release: self.config.name.clone(),
            namespace: self.config.resolved_namespace().to_string(),
            chart: self.root.join(&self.config.chart),
            values: self.config.values.as_ref().map(|v| self.root.join(v)),
            image_ref,
            local: self.context.is_local(),
        };
        self.releaser
            .upgrade_install(&req)
            .map_err(|e| e.into_install(&self.config.name))
    }

    // -----------------------------------------------------------------------
    // Composite flows
    // -----------------------------------------------------------------------

    /// The whole release pipeline. Stages already recorded in markers are
    /// skipped; everything downstream of the markers always runs.
    pub fn deploy(&self, force: bool) -> Result<()> {
        let build = self.ensure_built(force)?;
        let push = self.ensure_published(&build)?;
        self.ensure_namespace()?;
        self.provision_secrets()?;
        self.install(&build, push.as_ref())?;
        tracing::info!(stage = Stage::Done.as_str(), release = self.config.name.as_str(), "deployed");
        Ok(())
    }

    /// Uninstall the release and drop its namespace.
    pub fn undeploy(&self) -> Result<()> {
        let ns = self.config.resolved_namespace();
        tracing::info!(release = self.config.name.as_str(), namespace = ns, "uninstalling release");
        self.releaser
            .uninstall(&self.config.name, ns)
            .map_err(|e| e.into_install(&self.config.name))?;
        self.cluster.delete_namespace(ns)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
