//! Run the last-built image on the local docker daemon, outside any cluster.

use anyhow::Context;
use slipway_core::config::ProjectConfig;
use slipway_core::marker::MarkerStore;
use slipway_core::tools::DockerCli;
use slipway_core::SlipwayError;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let config = ProjectConfig::load(root).context("failed to load project config")?;
    let marker = MarkerStore::new(root)
        .load_build()?
        .ok_or_else(|| SlipwayError::MissingArtifact("no image built; run 'slipway build'".into()))?;
    DockerCli.run_detached(&config.name, &marker.local_image_ref, config.port)?;
    println!(
        "running {} ({}) on port {}",
        config.name, marker.local_image_ref, config.port
    );
    Ok(())
}

pub fn stop(root: &Path) -> anyhow::Result<()> {
    let config = ProjectConfig::load(root).context("failed to load project config")?;
    DockerCli.stop(&config.name)?;
    println!("stopped {}", config.name);
    Ok(())
}
