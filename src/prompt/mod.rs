//! Prompt construction for commit message and branch name suggestions.

mod sanitize;

pub use sanitize::{clean_suggestion, sanitize_diff};

use crate::git::DiffSummary;

/// Maximum length for sanitized diff text inside a prompt.
const MAX_DIFF_SANITIZED_LENGTH: usize = 30_000;

/// Build the LLM prompt for a single-line conventional commit message.
///
/// `rejected` carries suggestions the user already turned down; the prompt
/// asks for something different from each of them.
pub fn build_commit_message_prompt(diff: &DiffSummary, rejected: &[String]) -> String {
    let files_section = files_section(diff);
    let sanitized_diff = sanitize_diff(&diff.diff_text, MAX_DIFF_SANITIZED_LENGTH);
    let truncation_note = truncation_note(diff);
    let rejected_section = rejected_section(rejected);

    format!(
        r#"You are an assistant that generates commit messages in the conventional commits format.
Based on the git diff below, identify the MOST SIGNIFICANT change and generate a short, clear commit message in English about it.
Focus on the main purpose of the change.
Use prefixes like feat, fix, chore, refactor, test, docs, style, perf, ci, build, revert.
Only the message, with no extra explanations or remarks.
Generate ONLY ONE commit message, with no line breaks or special formatting.
Nothing but a commit message.{rejected_section}

## Changed Files ({additions} additions, {deletions} deletions)
{files_section}

## Diff
```
{sanitized_diff}
```{truncation_note}"#,
        additions = diff.additions,
        deletions = diff.deletions,
    )
}

/// Build the LLM prompt for a `type/short-description` branch name.
pub fn build_branch_name_prompt(diff: &DiffSummary, rejected: &[String]) -> String {
    let files_section = files_section(diff);
    let sanitized_diff = sanitize_diff(&diff.diff_text, MAX_DIFF_SANITIZED_LENGTH);
    let truncation_note = truncation_note(diff);
    let rejected_section = rejected_section(rejected);

    format!(
        r#"You are an assistant that generates Git branch names.
Based on the git diff below, identify the MOST SIGNIFICANT change and generate a short, descriptive branch name in English for it, using hyphens to separate words and following the 'type/short-description' format.
The name should reflect the main purpose of the changes.
Use prefixes like feat/, fix/, chore/, refactor/, test/, docs/, style/, perf/, ci/, build/, revert/.
Examples: feat/add-user-login, fix/resolve-payment-bug, chore/update-dependencies.
Generate ONLY the branch name, with no extra explanations or remarks.{rejected_section}

## Changed Files ({additions} additions, {deletions} deletions)
{files_section}

## Diff
```
{sanitized_diff}
```{truncation_note}"#,
        additions = diff.additions,
        deletions = diff.deletions,
    )
}

fn files_section(diff: &DiffSummary) -> String {
    diff.changed_files
        .iter()
        .map(|f| format!("- {} ({})", f.path, f.status))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncation_note(diff: &DiffSummary) -> &'static str {
    if diff.truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    }
}

fn rejected_section(rejected: &[String]) -> String {
    if rejected.is_empty() {
        return String::new();
    }

    let mut section = String::from(
        "\n\nCrucially, provide a different and unique suggestion from the ones I have already rejected:",
    );
    for suggestion in rejected {
        section.push_str("\n- ");
        section.push_str(suggestion);
    }
    section
}
