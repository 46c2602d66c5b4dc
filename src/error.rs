//! Error types for quill modules using thiserror.

use thiserror::Error;

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "OPENAI_API_KEY environment variable not set. Define it in your .env file or your environment."
    )]
    MissingApiKey,
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("No changes to commit (working tree is clean)")]
    NoChanges,

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),

    #[error("HEAD is detached; check out a branch before running quill")]
    DetachedHead,

    #[error("Could not determine current branch: {0}")]
    HeadUnreadable(#[source] git2::Error),

    #[error("'{0}' is not a valid git branch name")]
    InvalidBranchName(String),

    #[error("Failed to create branch '{name}': {source}")]
    BranchCreationFailed {
        name: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to check out branch '{name}': {source}")]
    CheckoutFailed {
        name: String,
        #[source]
        source: git2::Error,
    },

    #[error("git command not found. Ensure git is installed and in your PATH.")]
    GitNotInstalled,

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("Failed to run git {operation}: {source}")]
    CommandSpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No 'origin' remote found: {0}")]
    NoOriginRemote(#[source] git2::Error),

    #[error("Remote 'origin' does not point to a GitHub repository")]
    NotAGitHubRemote,
}

/// Errors from the OpenAI HTTP API.
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("OpenAI API request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("OpenAI rejected the API key (HTTP 401). Check OPENAI_API_KEY.")]
    AuthFailed,

    #[error("OpenAI rate limit exceeded (HTTP 429)")]
    RateLimited,

    #[error("OpenAI API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("OpenAI returned an empty completion")]
    EmptyResponse,

    #[error("Failed to parse OpenAI response: {0}")]
    ParseFailed(String),

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<OpenAiError>),
}

impl OpenAiError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Auth and malformed-response failures are deterministic; network
    /// hiccups, rate limits, and empty completions are transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OpenAiError::Network(_) | OpenAiError::RateLimited | OpenAiError::EmptyResponse
        )
    }
}
