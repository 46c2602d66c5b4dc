//! Origin remote parsing and pull-request URL construction.

use git2::Repository;

use crate::error::GitError;

/// Get the URL of the `origin` remote.
pub fn origin_url(repo: &Repository) -> Result<String, GitError> {
    let remote = repo
        .find_remote("origin")
        .map_err(GitError::NoOriginRemote)?;

    remote
        .url()
        .map(String::from)
        .ok_or(GitError::NotAGitHubRemote)
}

/// Extract owner and repo from a git remote URL.
pub fn parse_github_remote(url: &str) -> Result<(String, String), GitError> {
    // Handle SSH format: git@github.com:owner/repo.git
    if url.starts_with("git@github.com:") {
        let path = url
            .strip_prefix("git@github.com:")
            .ok_or(GitError::NotAGitHubRemote)?;
        return parse_owner_repo_path(path);
    }

    // Handle HTTPS format: https://github.com/owner/repo.git
    if url.contains("github.com/") {
        let path = url
            .split("github.com/")
            .nth(1)
            .ok_or(GitError::NotAGitHubRemote)?;
        return parse_owner_repo_path(path);
    }

    Err(GitError::NotAGitHubRemote)
}

fn parse_owner_repo_path(path: &str) -> Result<(String, String), GitError> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let parts: Vec<&str> = path.split('/').collect();

    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Ok((parts[0].to_string(), parts[1].to_string()))
    } else {
        Err(GitError::NotAGitHubRemote)
    }
}

/// Build the GitHub "open a pull request" URL for a pushed branch.
pub fn pr_url(owner: &str, repo: &str, branch: &str) -> String {
    format!("https://github.com/{owner}/{repo}/pull/new/{branch}")
}
