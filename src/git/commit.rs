//! Staging and commit creation via git2.

use git2::{IndexAddOption, Oid, Repository};

use crate::error::GitError;

/// Stage every pending change, like `git add .`.
pub fn stage_all(repo: &Repository) -> Result<(), GitError> {
    let mut index = repo.index().map_err(GitError::StagingFailed)?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(GitError::StagingFailed)?;
    // add_all does not drop entries for files deleted from the worktree
    index
        .update_all(["*"].iter(), None)
        .map_err(GitError::StagingFailed)?;
    index.write().map_err(GitError::StagingFailed)?;
    Ok(())
}

/// Create a commit from the staged index with the given message.
///
/// The signature comes from git config. On an unborn branch (fresh repo)
/// the commit is created with no parents.
pub fn commit_staged(repo: &Repository, message: &str) -> Result<Oid, GitError> {
    let mut index = repo.index().map_err(GitError::StagingFailed)?;
    let tree_id = index.write_tree().map_err(GitError::StagingFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    let sig = repo.signature().map_err(GitError::ConfigError)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e)
            if e.code() == git2::ErrorCode::UnbornBranch
                || e.code() == git2::ErrorCode::NotFound =>
        {
            None
        }
        Err(e) => return Err(GitError::CommitFailed(e)),
    };

    let parents: Vec<&git2::Commit> = parent.iter().collect();
    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(GitError::CommitFailed)?;

    Ok(oid)
}
