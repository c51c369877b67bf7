use crate::error::Result;
use crate::exec;
use crate::tools::SecretProvisioner;

const SECRETGEN: &str = "k8s-secretgen";

/// Namespace-scoped secret generation via the k8s-secretgen CLI.
pub struct SecretgenCli;

impl SecretProvisioner for SecretgenCli {
    fn provision(&self, namespace: &str) -> Result<()> {
        let mut cmd = exec::command(SECRETGEN, &["--namespace", namespace])?;
        exec::run_streamed(&mut cmd, SECRETGEN)
    }
}
