//! Run configuration collected from the CI environment
//!
//! All environment access happens here, once, up front. The rest of the
//! crate receives an explicit `Config` instead of reading ambient state.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),

    #[error("GHCR_ORG and GHCR_USER environment variables are not set")]
    MissingOwner,
}

/// Who owns the package on GHCR. When both variables are set, the
/// organization takes precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Org(String),
    User(String),
}

impl Owner {
    pub fn name(&self) -> &str {
        match self {
            Owner::Org(name) | Owner::User(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub API token with `read:packages`.
    pub token: String,
    pub owner: Owner,
    /// Container package name, e.g. `my-service`.
    pub image: String,
    /// Base branch for release mode, e.g. `release-1.2`.
    pub branch: Option<String>,
    /// File CI outputs are appended to (GITHUB_ENV).
    pub env_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            env::var("GITHUB_TOKEN").ok(),
            env::var("GHCR_ORG").ok(),
            env::var("GHCR_USER").ok(),
            env::var("GHCR_IMAGE_NAME").ok(),
            env::var("BASE_REF_NAME").ok(),
            env::var("GITHUB_ENV").ok(),
        )
    }

    fn from_vars(
        token: Option<String>,
        org: Option<String>,
        user: Option<String>,
        image: Option<String>,
        branch: Option<String>,
        env_file: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = non_empty(token).ok_or(ConfigError::MissingVar("GITHUB_TOKEN"))?;

        let owner = match (non_empty(org), non_empty(user)) {
            (Some(org), _) => Owner::Org(org),
            (None, Some(user)) => Owner::User(user),
            (None, None) => return Err(ConfigError::MissingOwner),
        };

        let image = non_empty(image).ok_or(ConfigError::MissingVar("GHCR_IMAGE_NAME"))?;

        Ok(Self {
            token,
            owner,
            image,
            branch: non_empty(branch),
            env_file: non_empty(env_file).map(PathBuf::from),
        })
    }

    /// The release flow needs the base branch; the RC flow does not.
    pub fn require_branch(&self) -> Result<&str, ConfigError> {
        self.branch
            .as_deref()
            .ok_or(ConfigError::MissingVar("BASE_REF_NAME"))
    }
}

/// Empty environment values count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
