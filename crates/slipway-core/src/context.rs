use crate::error::Result;
use crate::tools::Cluster;

/// Local development clusters: the image is consumed straight from the local
/// docker daemon and no registry push happens.
const LOCAL_CONTEXTS: &[&str] = &["minikube", "docker-desktop"];
const LOCAL_PREFIXES: &[&str] = &["kind-", "k3d-"];

/// The active cluster/environment a deploy targets. Resolved once at pipeline
/// start and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    name: String,
}

impl DeployContext {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Resolve the context: an explicit override (`--context` / env) wins,
    /// otherwise ask the cluster tool for its current context.
    pub fn resolve(explicit: Option<&str>, cluster: &dyn Cluster) -> Result<Self> {
        match explicit {
            Some(name) if !name.trim().is_empty() => Ok(Self::named(name.trim())),
            _ => Ok(Self::named(cluster.current_context()?)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_local(&self) -> bool {
        LOCAL_CONTEXTS.contains(&self.name.as_str())
            || LOCAL_PREFIXES.iter().any(|p| self.name.starts_with(p))
    }

    /// The `<context>/<project>` string used in confirmation prompts.
    pub fn target(&self, project: &str) -> String {
        format!("{}/{}", self.name, project)
    }
}

impl std::fmt::Display for DeployContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_contexts() {
        for name in ["minikube", "docker-desktop", "kind-dev", "k3d-test"] {
            assert!(DeployContext::named(name).is_local(), "expected local: {name}");
        }
    }

    #[test]
    fn remote_contexts() {
        for name in ["prod-cluster", "staging", "arn:aws:eks:us-east-1:1:cluster/x"] {
            assert!(!DeployContext::named(name).is_local(), "expected remote: {name}");
        }
    }

    #[test]
    fn target_string() {
        let ctx = DeployContext::named("minikube");
        assert_eq!(ctx.target("todo"), "minikube/todo");
    }
}
