//! Git operations: git2-rs for repository state, system git for push.

pub mod branch;
pub mod commit;
pub mod diff;
pub mod push;
pub mod remote;

pub use branch::{checkout_existing, create_and_checkout, current_branch, is_valid_branch_name};
pub use commit::{commit_staged, stage_all};
pub use diff::{ChangedFile, DiffSummary, FileStatus, collect_staged_diff};
pub use push::push;
pub use remote::{origin_url, parse_github_remote, pr_url};
