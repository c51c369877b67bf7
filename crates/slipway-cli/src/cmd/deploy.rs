use crate::cmd::Env;
use crate::confirm;
use std::path::Path;

pub fn deploy(root: &Path, context: Option<&str>, yes: bool, force: bool) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    let target = env.target();
    if !confirm::approve(&format!("Deploy to {target}?"), yes)? {
        eprintln!("aborted");
        return Ok(());
    }
    env.pipeline().deploy(force)?;
    println!("deployed {target}");
    Ok(())
}

pub fn undeploy(root: &Path, context: Option<&str>, yes: bool) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    let target = env.target();
    eprintln!("This removes release '{}' and namespace '{}'.", env.config.name, env.config.resolved_namespace());
    if !confirm::exact(&target, yes)? {
        eprintln!("confirmation did not match; aborting");
        return Ok(());
    }
    env.pipeline().undeploy()?;
    println!("removed {target}");
    Ok(())
}

/// Undeploy then deploy under one confirmation.
pub fn redeploy(root: &Path, context: Option<&str>, yes: bool) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    let target = env.target();
    eprintln!("This removes and reinstalls '{target}'.");
    if !confirm::exact(&target, yes)? {
        eprintln!("confirmation did not match; aborting");
        return Ok(());
    }
    let pipeline = env.pipeline();
    pipeline.undeploy()?;
    pipeline.deploy(false)?;
    println!("redeployed {target}");
    Ok(())
}
