use crate::cmd::Env;
use std::path::Path;

pub fn run(root: &Path, context: Option<&str>) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    env.pipeline().provision_secrets()?;
    println!("secrets provisioned for '{}'", env.config.resolved_namespace());
    Ok(())
}
