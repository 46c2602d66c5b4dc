//! Pushing via the system `git` binary.
//!
//! Push shells out to `git` instead of using git2 so the user's existing
//! credential helpers, SSH agent, and config all apply.

use std::io::ErrorKind;
use std::process::Command;

use crate::error::GitError;

/// Push `branch` to `remote`.
///
/// `set_upstream` adds `--set-upstream` so a branch created this run starts
/// tracking its remote counterpart.
pub fn push(remote: &str, branch: &str, set_upstream: bool) -> Result<(), GitError> {
    let mut args = vec!["push"];
    if set_upstream {
        args.push("--set-upstream");
    }
    args.push(remote);
    args.push(branch);

    run_git(&args, "push")
}

/// Run a git command and return success or a descriptive error.
fn run_git(args: &[&str], operation: &str) -> Result<(), GitError> {
    let output = Command::new("git").args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            GitError::GitNotInstalled
        } else {
            GitError::CommandSpawnFailed {
                operation: operation.to_string(),
                source: e,
            }
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_run_git_version_succeeds() {
        // git --version should always succeed
        let result = run_git(&["--version"], "version check");
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_git_invalid_command_fails() {
        let result = run_git(&["not-a-real-command"], "invalid");
        assert!(matches!(result, Err(GitError::CommandFailed { .. })));
    }

    #[test]
    #[serial] // changes the process working directory
    fn test_push_without_remote_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();

        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = push("no-such-remote", "main", false);
        std::env::set_current_dir(prev).unwrap();

        match result {
            Err(GitError::CommandFailed { operation, stderr }) => {
                assert_eq!(operation, "push");
                assert!(!stderr.is_empty());
            }
            other => panic!("Expected CommandFailed, got: {:?}", other),
        }
    }
}
