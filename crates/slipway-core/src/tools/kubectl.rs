use crate::error::{Result, SlipwayError};
use crate::exec;
use crate::tools::Cluster;

const KUBECTL: &str = "kubectl";

/// Cluster operations via the kubectl CLI.
pub struct Kubectl;

impl Cluster for Kubectl {
    fn current_context(&self) -> Result<String> {
        let mut cmd = exec::command(KUBECTL, &["config", "current-context"])?;
        match exec::run_capture(&mut cmd, KUBECTL) {
            Ok(out) => {
                let ctx = out.trim().to_string();
                if ctx.is_empty() {
                    return Err(SlipwayError::NoContext);
                }
                Ok(ctx)
            }
            // kubectl exits non-zero when no context is selected
            Err(SlipwayError::ToolFailed { .. }) => Err(SlipwayError::NoContext),
            Err(e) => Err(e),
        }
    }

    fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let mut cmd = exec::command(KUBECTL, &["get", "namespace", namespace])?;
        exec::probe(&mut cmd, KUBECTL)
    }

    fn create_namespace(&self, namespace: &str) -> Result<()> {
        let mut cmd = exec::command(KUBECTL, &["create", "namespace", namespace])?;
        exec::run_streamed(&mut cmd, KUBECTL)
    }

    fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let mut cmd = exec::command(
            KUBECTL,
            &["delete", "namespace", namespace, "--ignore-not-found"],
        )?;
        exec::run_streamed(&mut cmd, KUBECTL)
    }

    fn has_cronjob(&self, namespace: &str, name: &str) -> Result<bool> {
        let mut cmd = exec::command(KUBECTL, &["get", "cronjob", name, "-n", namespace])?;
        exec::probe(&mut cmd, KUBECTL)
    }

    fn trigger_cronjob(&self, namespace: &str, name: &str, job: &str) -> Result<()> {
        let from = format!("--from=cronjob/{name}");
        let mut cmd = exec::command(
            KUBECTL,
            &["create", "job", &from, job, "-n", namespace],
        )?;
        exec::run_streamed(&mut cmd, KUBECTL)
    }

    fn exec_capture(&self, namespace: &str, target: &str, argv: &[&str]) -> Result<String> {
        let mut args = vec!["exec", "-n", namespace, target, "--"];
        args.extend_from_slice(argv);
        exec::run_capture(&mut exec::command(KUBECTL, &args)?, KUBECTL)
    }

    fn exec_stdin(&self, namespace: &str, target: &str, argv: &[&str], input: &str) -> Result<()> {
        let mut args = vec!["exec", "-i", "-n", namespace, target, "--"];
        args.extend_from_slice(argv);
        exec::run_with_stdin(&mut exec::command(KUBECTL, &args)?, KUBECTL, input)
    }
}
