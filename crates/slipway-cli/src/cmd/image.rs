use crate::cmd::Env;
use slipway_core::config::ImageRepoKind;
use std::path::Path;

pub fn build(root: &Path, context: Option<&str>) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    let marker = env.pipeline().build()?;
    println!("built {}", marker.local_image_ref);
    Ok(())
}

pub fn push(root: &Path, context: Option<&str>) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    if env.config.image_repo == ImageRepoKind::None {
        println!("image_repo is 'none'; nothing to publish");
        return Ok(());
    }
    let pipeline = env.pipeline();
    // Missing build marker means the build stage simply hasn't run yet.
    let build = pipeline.ensure_built(false)?;
    if let Some(marker) = pipeline.publish(&build)? {
        println!("pushed {}", marker.remote_image_ref);
    }
    Ok(())
}
