use crate::cmd::Env;
use crate::confirm;
use slipway_core::{db, paths};
use std::path::{Path, PathBuf};

fn backup_dir(root: &Path) -> PathBuf {
    std::env::var("BACKUP_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| root.join(paths::DEFAULT_BACKUP_DIR))
}

pub fn backup(root: &Path, context: Option<&str>) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    let path = db::backup(&env.tools.kubectl, &env.config, &backup_dir(root))?;
    println!("backup written to {}", path.display());
    Ok(())
}

pub fn restore(root: &Path, context: Option<&str>, yes: bool, dump: &Path) -> anyhow::Result<()> {
    let env = Env::load(root, context)?;
    let prompt = format!(
        "Restore {} into '{}' on {}?",
        dump.display(),
        env.config.resolved_namespace(),
        env.context
    );
    if !confirm::approve(&prompt, yes)? {
        eprintln!("aborted");
        return Ok(());
    }
    db::restore(&env.tools.kubectl, &env.config, dump)?;
    println!("restored {}", dump.display());
    Ok(())
}
