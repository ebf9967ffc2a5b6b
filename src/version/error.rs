use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("branch name '{0}' does not match pattern 'release-x.y'")]
    InvalidBranch(String),

    #[error("no RC tags found for {major}.{minor}.0-rc.n")]
    NoCandidate { major: u64, minor: u64 },
}
