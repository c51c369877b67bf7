//! Wrapper commands for the project's own dev tooling. These run the tool in
//! the project root and propagate its exit code unchanged.

use slipway_core::exec;
use std::path::Path;

pub fn lint(root: &Path) -> anyhow::Result<()> {
    exec::run_in(root, "flake8", &["."])?;
    // API lint only applies when the project ships an API document.
    if root.join("openapi.yaml").is_file() {
        exec::run_in(root, "spectral", &["lint", "openapi.yaml"])?;
    }
    Ok(())
}

pub fn deps(root: &Path) -> anyhow::Result<()> {
    exec::run_in(root, "pip", &["install", "-r", "requirements.txt"])?;
    Ok(())
}

pub fn test(root: &Path) -> anyhow::Result<()> {
    exec::run_in(root, "pytest", &[])?;
    Ok(())
}
