//! quill - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use git2::Repository;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quill::browser::open_url;
use quill::config::Config;
use quill::error::{GitError, OpenAiError};
use quill::git::{
    self, DiffSummary, checkout_existing, collect_staged_diff, commit_staged, create_and_checkout,
    current_branch, origin_url, parse_github_remote, pr_url, stage_all,
};
use quill::interact::{SuggestionKind, confirm, review};
use quill::openai::OpenAiClient;
use quill::prompt::{build_branch_name_prompt, build_commit_message_prompt};

/// Write commit messages and branch names with AI, then commit and push.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Write commit messages and branch names with AI, then commit and push")]
#[command(version)]
struct Cli {
    /// Suggest a branch name and create the branch before committing
    #[arg(short = 'b', long)]
    branch: bool,

    /// Offer to open a pull request in the browser after a successful push
    #[arg(long)]
    pr: bool,

    /// Preview the suggestions without committing or pushing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "quill=debug" } else { "quill=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Step 1: Configuration and prerequisites
    let config = Config::from_env()?;

    if which::which("git").is_err() {
        return Err(GitError::GitNotInstalled.into());
    }

    let repo = Repository::open(".")
        .context("Not a git repository. Run quill from within a git repository.")?;

    // Step 2: Stage everything and collect the diff
    stage_all(&repo).context("Failed to stage changes")?;

    let diff = match collect_staged_diff(&repo) {
        Ok(diff) => diff,
        Err(GitError::NoChanges) => {
            println!("No staged changes found. Nothing to commit.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to collect staged diff"),
    };

    debug!(
        "Diff: {} files, {} additions, {} deletions, truncated={}",
        diff.changed_files.len(),
        diff.additions,
        diff.deletions,
        diff.truncated
    );

    let client = OpenAiClient::new(&config).context("Failed to build OpenAI client")?;

    let original_branch = current_branch(&repo)?;

    // Step 3: Optional branch step
    let mut new_branch = None;
    if cli.branch {
        new_branch = run_branch_step(&repo, &client, &diff, &original_branch).await?;
    }

    // Step 4: Commit message review loop
    let commit_message = review(SuggestionKind::CommitMessage, |temperature, rejected| {
        let prompt = build_commit_message_prompt(&diff, &rejected);
        let client = &client;
        async move { client.suggest(&prompt, temperature).await }
    })
    .await
    .map_err(summarize_llm_error)?;

    let Some(commit_message) = commit_message else {
        println!("Commit canceled.");
        offer_return_to_original(&repo, new_branch.as_deref(), &original_branch)?;
        return Ok(());
    };

    // Step 5: Review summary and confirmation
    let branch_to_commit_on = current_branch(&repo)?;

    println!();
    println!("Commit review:");
    println!("  Message: \"{commit_message}\"");
    if new_branch.is_some() {
        println!("  Branch:  {branch_to_commit_on} (new)");
    } else {
        println!("  Branch:  {branch_to_commit_on} (current)");
    }

    if cli.dry_run {
        println!();
        println!("Dry run complete. No changes made.");
        return Ok(());
    }

    println!();
    if !confirm("Proceed with commit and push?", true) {
        println!("Operation canceled.");
        offer_return_to_original(&repo, new_branch.as_deref(), &original_branch)?;
        return Ok(());
    }

    // Step 6: Commit and push
    commit_staged(&repo, &commit_message).context("Failed to create commit")?;
    println!("Created commit: {commit_message}");

    let branch_to_push = current_branch(&repo)?;
    println!("Pushing to branch '{branch_to_push}'...");
    git::push("origin", &branch_to_push, new_branch.is_some())
        .context("Failed to push. The commit was created; fix the push issue and push manually.")?;

    println!("Pushed to origin/{branch_to_push}.");

    // Step 7: Pull request offer
    if cli.pr {
        offer_pull_request(&repo, &branch_to_push);
    }

    Ok(())
}

/// Run the branch-name review loop and create the accepted branch.
///
/// Returns the name of the branch created this run, or None when the user
/// canceled, the suggestion matched the current branch, or creation failed
/// (the flow continues on the current branch in all three cases).
async fn run_branch_step(
    repo: &Repository,
    client: &OpenAiClient,
    diff: &DiffSummary,
    original_branch: &str,
) -> Result<Option<String>> {
    let suggestion = review(SuggestionKind::BranchName, |temperature, rejected| {
        let prompt = build_branch_name_prompt(diff, &rejected);
        async move { client.suggest(&prompt, temperature).await }
    })
    .await
    .map_err(summarize_llm_error)?;

    let Some(name) = suggestion else {
        println!("Branch creation canceled. Continuing on the current branch.");
        return Ok(None);
    };

    if name == original_branch {
        println!(
            "The suggested branch ('{name}') is the same as the current branch. No new branch will be created."
        );
        return Ok(None);
    }

    println!("Creating and checking out branch '{name}'...");
    match create_and_checkout(repo, &name) {
        Ok(()) => {
            println!("Switched to new branch '{name}'.");
            Ok(Some(name))
        }
        Err(e) => {
            eprintln!("Could not create or switch to branch '{name}': {e}");
            eprintln!("Continuing on branch '{original_branch}'.");
            Ok(None)
        }
    }
}

/// After a cancel, offer to return to the original branch if a new one was
/// created this run.
fn offer_return_to_original(
    repo: &Repository,
    new_branch: Option<&str>,
    original_branch: &str,
) -> Result<()> {
    let Some(branch) = new_branch else {
        return Ok(());
    };
    if branch == original_branch {
        return Ok(());
    }

    let prompt = format!(
        "You created the branch '{branch}'. Return to the original branch '{original_branch}'?"
    );
    if confirm(&prompt, false) {
        checkout_existing(repo, original_branch)
            .with_context(|| format!("Failed to return to branch '{original_branch}'"))?;
        println!("Returned to '{original_branch}'.");
    } else {
        println!("Staying on branch '{branch}'.");
    }

    Ok(())
}

/// Build the GitHub PR URL for the pushed branch and offer to open it.
fn offer_pull_request(repo: &Repository, branch: &str) {
    let url = match origin_url(repo).and_then(|u| parse_github_remote(&u)) {
        Ok((owner, repo_name)) => pr_url(&owner, &repo_name, branch),
        Err(e) => {
            debug!("Skipping PR offer: {e}");
            return;
        }
    };

    println!();
    if confirm("Open a pull request in your browser?", true) {
        println!("Opening PR link in your browser...");
        if !open_url(&url) {
            eprintln!("Could not open the browser automatically.");
            eprintln!("Copy and paste this URL:\n  {url}");
        }
    } else {
        println!("Open it later at:\n  {url}");
    }
}

/// Flatten a generation failure into a single user-facing error.
fn summarize_llm_error(e: OpenAiError) -> anyhow::Error {
    match e {
        OpenAiError::RetriesExhausted(inner) => {
            anyhow::anyhow!("OpenAI request failed after retries: {inner}")
        }
        other => anyhow::anyhow!("{other}"),
    }
}
