use crate::error::Result;
use crate::exec;
use crate::tools::{InstallRequest, Releaser};

const HELM: &str = "helm";

/// Release management via the helm CLI. Installs are always atomic: a failed
/// upgrade rolls back to the previous good release and no partial deployment
/// stays live.
pub struct HelmCli;

/// Argument list for `helm upgrade`, kept separate so the flag set is testable.
fn install_args(req: &InstallRequest) -> Vec<String> {
    let mut args = vec![
        "upgrade".to_string(),
        "--install".to_string(),
        req.release.clone(),
        req.chart.display().to_string(),
        "--namespace".to_string(),
        req.namespace.clone(),
        "--create-namespace".to_string(),
        "--atomic".to_string(),
        "--wait".to_string(),
        "--set".to_string(),
        format!("image={}", req.image_ref),
        "--set".to_string(),
        format!("local={}", req.local),
    ];
    if let Some(values) = &req.values {
        args.push("--values".to_string());
        args.push(values.display().to_string());
    }
    args
}

impl Releaser for HelmCli {
    fn upgrade_install(&self, req: &InstallRequest) -> Result<()> {
        let args = install_args(req);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        exec::run_streamed(&mut exec::command(HELM, &argv)?, HELM)
    }

    fn uninstall(&self, release: &str, namespace: &str) -> Result<()> {
        let mut cmd = exec::command(
            HELM,
            &["uninstall", release, "--namespace", namespace, "--wait"],
        )?;
        exec::run_streamed(&mut cmd, HELM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request() -> InstallRequest {
        InstallRequest {
            release: "todo".into(),
            namespace: "todo".into(),
            chart: PathBuf::from("chart"),
            values: None,
            image_ref: "local/todo:1700000000".into(),
            local: true,
        }
    }

    #[test]
    fn install_is_atomic_and_blocking() {
        let args = install_args(&request());
        assert!(args.contains(&"--atomic".to_string()));
        assert!(args.contains(&"--wait".to_string()));
        assert!(args.contains(&"--create-namespace".to_string()));
    }

    #[test]
    fn install_sets_image_and_local_flag() {
        let args = install_args(&request());
        assert!(args.contains(&"image=local/todo:1700000000".to_string()));
        assert!(args.contains(&"local=true".to_string()));
    }

    #[test]
    fn values_file_is_optional() {
        let mut req = request();
        assert!(!install_args(&req).contains(&"--values".to_string()));
        req.values = Some(PathBuf::from("values.yaml"));
        let args = install_args(&req);
        assert!(args.contains(&"--values".to_string()));
        assert!(args.contains(&"values.yaml".to_string()));
    }
}
