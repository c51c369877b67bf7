use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlipwayError {
    #[error("no deploy.yaml found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("deploy.yaml is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("no active deploy context: set --context or configure kubectl")]
    NoContext,

    #[error("'{0}' not found on PATH")]
    ToolMissing(String),

    #[error("{tool} failed{}: {stderr}", exit_suffix(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("image build failed{}", exit_suffix(.code))]
    BuildFailed { code: Option<i32> },

    #[error("publish failed: {detail}")]
    PublishFailed { detail: String, code: Option<i32> },

    #[error("install of release '{release}' failed and was rolled back{}", exit_suffix(.code))]
    InstallFailed { release: String, code: Option<i32> },

    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    #[error("marker '{marker}' is corrupt: missing key '{key}' (run 'slipway clean')")]
    CorruptMarker { marker: String, key: String },

    #[error("failed to fetch lifecycle policy: {0}")]
    PolicyFetch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!(" (exit code {c})"),
        None => String::new(),
    }
}

impl SlipwayError {
    /// Exit code of the failing external tool, when one is known.
    /// The CLI propagates this as the process exit code.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            SlipwayError::ToolFailed { code, .. }
            | SlipwayError::BuildFailed { code }
            | SlipwayError::PublishFailed { code, .. }
            | SlipwayError::InstallFailed { code, .. } => *code,
            _ => None,
        }
    }

    /// Reclassify a generic tool failure as a build failure, keeping the code.
    pub fn into_build(self) -> Self {
        match self {
            SlipwayError::ToolFailed { code, .. } => SlipwayError::BuildFailed { code },
            other => other,
        }
    }

    /// Reclassify a generic tool failure as a publish failure, keeping the code.
    pub fn into_publish(self) -> Self {
        match self {
            SlipwayError::ToolFailed { tool, code, stderr } => SlipwayError::PublishFailed {
                detail: format!("{tool}: {stderr}"),
                code,
            },
            other => other,
        }
    }

    /// Reclassify a generic tool failure as an install failure, keeping the code.
    pub fn into_install(self, release: &str) -> Self {
        match self {
            SlipwayError::ToolFailed { code, .. } => SlipwayError::InstallFailed {
                release: release.to_string(),
                code,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlipwayError>;
