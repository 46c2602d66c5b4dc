//! Branch inspection and creation via git2.

use git2::{Branch, BranchType, Repository, build::CheckoutBuilder};

use crate::error::GitError;

/// Get the current branch name.
pub fn current_branch(repo: &Repository) -> Result<String, GitError> {
    let head = repo.head().map_err(GitError::HeadUnreadable)?;

    if !head.is_branch() {
        return Err(GitError::DetachedHead);
    }

    head.shorthand()
        .map(String::from)
        .ok_or(GitError::DetachedHead)
}

/// Whether git would accept `name` as a branch name.
pub fn is_valid_branch_name(name: &str) -> bool {
    Branch::name_is_valid(name).unwrap_or(false)
}

/// Create a branch at HEAD and check it out.
///
/// Fails if the name is not git-legal or the branch already exists;
/// the working tree is left untouched on failure.
pub fn create_and_checkout(repo: &Repository, name: &str) -> Result<(), GitError> {
    if !is_valid_branch_name(name) {
        return Err(GitError::InvalidBranchName(name.to_string()));
    }

    if repo.find_branch(name, BranchType::Local).is_ok() {
        return Err(GitError::BranchCreationFailed {
            name: name.to_string(),
            source: git2::Error::from_str("a branch with that name already exists"),
        });
    }

    let head_commit = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .map_err(GitError::HeadUnreadable)?;

    repo.branch(name, &head_commit, false)
        .map_err(|e| GitError::BranchCreationFailed {
            name: name.to_string(),
            source: e,
        })?;

    let refname = format!("refs/heads/{name}");
    repo.set_head(&refname).map_err(|e| GitError::CheckoutFailed {
        name: name.to_string(),
        source: e,
    })?;

    // The new branch points at HEAD, so only metadata moves; safe checkout
    // keeps any staged changes in place.
    repo.checkout_head(Some(CheckoutBuilder::new().safe()))
        .map_err(|e| GitError::CheckoutFailed {
            name: name.to_string(),
            source: e,
        })?;

    Ok(())
}

/// Check out an existing local branch.
pub fn checkout_existing(repo: &Repository, name: &str) -> Result<(), GitError> {
    repo.find_branch(name, BranchType::Local)
        .map_err(|e| GitError::CheckoutFailed {
            name: name.to_string(),
            source: e,
        })?;

    let refname = format!("refs/heads/{name}");
    repo.set_head(&refname).map_err(|e| GitError::CheckoutFailed {
        name: name.to_string(),
        source: e,
    })?;

    repo.checkout_head(Some(CheckoutBuilder::new().safe()))
        .map_err(|e| GitError::CheckoutFailed {
            name: name.to_string(),
            source: e,
        })?;

    Ok(())
}
