//! Remote image registries: AWS ECR and the org Nexus.
//!
//! Both authenticate the local docker daemon and expose tag+push. ECR also
//! owns repository creation: first use creates the repository and attaches
//! the org-wide lifecycle policy fetched from infra.

use crate::error::{Result, SlipwayError};
use crate::exec;
use crate::tools::{DockerCli, Registry};

const AWS: &str = "aws";

const DEFAULT_ECR_REGION: &str = "us-east-1";
const LIFECYCLE_POLICY_URL: &str = "https://infra.orchard9.dev/policies/ecr-lifecycle.json";

const DEFAULT_NEXUS_HOST: &str = "docker.nexus.orchard9.dev";

/// Fetch the lifecycle policy document and verify it is valid JSON before
/// handing it to `aws ecr put-lifecycle-policy`.
pub fn fetch_lifecycle_policy(url: &str) -> Result<String> {
    let resp = reqwest::blocking::get(url).map_err(|e| SlipwayError::PolicyFetch(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(SlipwayError::PolicyFetch(format!(
            "{url} returned {}",
            resp.status()
        )));
    }
    let body = resp
        .text()
        .map_err(|e| SlipwayError::PolicyFetch(e.to_string()))?;
    serde_json::from_str::<serde_json::Value>(&body)
        .map_err(|e| SlipwayError::PolicyFetch(format!("not valid JSON: {e}")))?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// ECR
// ---------------------------------------------------------------------------

pub struct EcrRegistry {
    region: String,
    policy_url: String,
    docker: DockerCli,
}

impl EcrRegistry {
    pub fn from_env() -> Self {
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|_| DEFAULT_ECR_REGION.to_string());
        Self::new(region, LIFECYCLE_POLICY_URL)
    }

    pub fn new(region: impl Into<String>, policy_url: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            policy_url: policy_url.into(),
            docker: DockerCli,
        }
    }

    fn registry_host(&self) -> Result<String> {
        let mut cmd = exec::command(
            AWS,
            &[
                "sts",
                "get-caller-identity",
                "--query",
                "Account",
                "--output",
                "text",
            ],
        )?;
        let account = exec::run_capture(&mut cmd, AWS)
            .map_err(SlipwayError::into_publish)?
            .trim()
            .to_string();
        Ok(format!("{account}.dkr.ecr.{}.amazonaws.com", self.region))
    }

    fn repository_exists(&self, name: &str) -> Result<bool> {
        let mut cmd = exec::command(
            AWS,
            &[
                "ecr",
                "describe-repositories",
                "--repository-names",
                name,
                "--region",
                &self.region,
            ],
        )?;
        exec::probe(&mut cmd, AWS)
    }

    fn create_repository(&self, name: &str) -> Result<()> {
        let mut cmd = exec::command(
            AWS,
            &[
                "ecr",
                "create-repository",
                "--repository-name",
                name,
                "--region",
                &self.region,
            ],
        )?;
        match exec::run_capture(&mut cmd, AWS) {
            Ok(_) => Ok(()),
            // Another invocation won the race; the repository is there.
            Err(SlipwayError::ToolFailed { ref stderr, .. })
                if stderr.contains("RepositoryAlreadyExistsException") =>
            {
                tracing::debug!(repository = name, "repository already exists");
                Ok(())
            }
            Err(e) => Err(e.into_publish()),
        }
    }

    fn attach_lifecycle_policy(&self, name: &str) -> Result<()> {
        let policy = fetch_lifecycle_policy(&self.policy_url)?;
        let mut cmd = exec::command(
            AWS,
            &[
                "ecr",
                "put-lifecycle-policy",
                "--repository-name",
                name,
                "--region",
                &self.region,
                "--lifecycle-policy-text",
                &policy,
            ],
        )?;
        exec::run_capture(&mut cmd, AWS)
            .map_err(SlipwayError::into_publish)
            .map(|_| ())
    }
}

impl Registry for EcrRegistry {
    fn login(&self) -> Result<String> {
        let host = self.registry_host()?;
        let mut cmd = exec::command(
            AWS,
            &["ecr", "get-login-password", "--region", &self.region],
        )?;
        let password = exec::run_capture(&mut cmd, AWS).map_err(SlipwayError::into_publish)?;
        self.docker
            .login(&host, "AWS", password.trim())
            .map_err(SlipwayError::into_publish)?;
        Ok(host)
    }

    fn ensure_repository(&self, name: &str) -> Result<()> {
        if self.repository_exists(name)? {
            return Ok(());
        }
        tracing::info!(repository = name, "creating ECR repository");
        self.create_repository(name)?;
        self.attach_lifecycle_policy(name)
    }

    fn push(&self, local_ref: &str, remote_ref: &str) -> Result<()> {
        self.docker
            .tag(local_ref, remote_ref)
            .and_then(|_| self.docker.push(remote_ref))
            .map_err(SlipwayError::into_publish)
    }
}

// ---------------------------------------------------------------------------
// Nexus
// ---------------------------------------------------------------------------

pub struct NexusRegistry {
    host: String,
    docker: DockerCli,
}

impl NexusRegistry {
    pub fn from_env() -> Self {
        let host =
            std::env::var("NEXUS_REGISTRY").unwrap_or_else(|_| DEFAULT_NEXUS_HOST.to_string());
        Self { host, docker: DockerCli }
    }
}

impl Registry for NexusRegistry {
    fn login(&self) -> Result<String> {
        let user = std::env::var("NEXUS_USER").map_err(|_| SlipwayError::MissingEnv("NEXUS_USER"))?;
        let password =
            std::env::var("NEXUS_PASSWORD").map_err(|_| SlipwayError::MissingEnv("NEXUS_PASSWORD"))?;
        self.docker
            .login(&self.host, &user, &password)
            .map_err(SlipwayError::into_publish)?;
        Ok(self.host.clone())
    }

    /// Nexus repositories are provisioned out of band; nothing to ensure.
    fn ensure_repository(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn push(&self, local_ref: &str, remote_ref: &str) -> Result<()> {
        self.docker
            .tag(local_ref, remote_ref)
            .and_then(|_| self.docker.push(remote_ref))
            .map_err(SlipwayError::into_publish)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_policy_fetch_ok() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/policies/ecr-lifecycle.json")
            .with_status(200)
            .with_body(r#"{"rules": []}"#)
            .create();
        let url = format!("{}/policies/ecr-lifecycle.json", server.url());
        let policy = fetch_lifecycle_policy(&url).unwrap();
        assert!(policy.contains("rules"));
        mock.assert();
    }

    #[test]
    fn lifecycle_policy_fetch_rejects_http_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/policies/ecr-lifecycle.json")
            .with_status(404)
            .create();
        let url = format!("{}/policies/ecr-lifecycle.json", server.url());
        let err = fetch_lifecycle_policy(&url).unwrap_err();
        assert!(matches!(err, SlipwayError::PolicyFetch(_)));
    }

    #[test]
    fn lifecycle_policy_fetch_rejects_non_json() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/policies/ecr-lifecycle.json")
            .with_status(200)
            .with_body("<html>login required</html>")
            .create();
        let url = format!("{}/policies/ecr-lifecycle.json", server.url());
        let err = fetch_lifecycle_policy(&url).unwrap_err();
        assert!(matches!(err, SlipwayError::PolicyFetch(ref d) if d.contains("JSON")));
    }
}
