//! Interactive review loop: accept, regenerate, or cancel a suggestion.

use std::future::Future;

use dialoguer::{Confirm, Input};

use crate::error::OpenAiError;

/// Temperature increase applied on each regeneration.
const TEMPERATURE_STEP: f32 = 0.2;

/// Upper bound for the sampling temperature.
const MAX_TEMPERATURE: f32 = 1.0;

/// What the user chose for a displayed suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Accept,
    Regenerate,
    Cancel,
}

/// Parse a line of user input into a [`Choice`].
///
/// Empty input or `y` accepts, `r` regenerates, anything else cancels.
pub fn parse_choice(input: &str) -> Choice {
    match input.trim().to_lowercase().as_str() {
        "" | "y" => Choice::Accept,
        "r" => Choice::Regenerate,
        _ => Choice::Cancel,
    }
}

/// The kind of suggestion under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    CommitMessage,
    BranchName,
}

impl SuggestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::CommitMessage => "Suggested commit message",
            SuggestionKind::BranchName => "Suggested branch name",
        }
    }

    /// Branch names benefit from more variety than commit messages.
    pub fn initial_temperature(&self) -> f32 {
        match self {
            SuggestionKind::CommitMessage => 0.3,
            SuggestionKind::BranchName => 0.5,
        }
    }
}

/// Raise the temperature one step, capped at the maximum.
fn next_temperature(current: f32) -> f32 {
    (current + TEMPERATURE_STEP).min(MAX_TEMPERATURE)
}

/// Run the review loop for one suggestion kind.
///
/// `generate` is called with the current temperature and the list of
/// rejected suggestions so far. Returns `Ok(Some(suggestion))` on accept,
/// `Ok(None)` on cancel, and `Err` when generation itself fails.
pub async fn review<G, Fut>(
    kind: SuggestionKind,
    generate: G,
) -> Result<Option<String>, OpenAiError>
where
    G: FnMut(f32, Vec<String>) -> Fut,
    Fut: Future<Output = Result<String, OpenAiError>>,
{
    review_with(kind, generate, prompt_choice).await
}

/// Review loop with an injectable choice reader, for tests.
async fn review_with<G, Fut, R>(
    kind: SuggestionKind,
    mut generate: G,
    mut read_choice: R,
) -> Result<Option<String>, OpenAiError>
where
    G: FnMut(f32, Vec<String>) -> Fut,
    Fut: Future<Output = Result<String, OpenAiError>>,
    R: FnMut() -> Choice,
{
    let mut temperature = kind.initial_temperature();
    let mut rejected: Vec<String> = Vec::new();

    loop {
        let suggestion = generate(temperature, rejected.clone()).await?;

        println!();
        println!("{}:", kind.label());
        println!("{suggestion}");

        match read_choice() {
            Choice::Accept => return Ok(Some(suggestion)),
            Choice::Regenerate => {
                rejected.push(suggestion);
                temperature = next_temperature(temperature);
                println!("Trying a different suggestion (temperature: {temperature:.1})...");
            }
            Choice::Cancel => return Ok(None),
        }
    }
}

/// Read one accept/regenerate/cancel line from the terminal.
///
/// Interrupted input (Ctrl-C, closed stdin) counts as cancel.
fn prompt_choice() -> Choice {
    let input: Result<String, _> = Input::new()
        .with_prompt("Accept? (Y) | Regenerate? (r) | Cancel? (n)")
        .allow_empty(true)
        .interact_text();

    match input {
        Ok(line) => parse_choice(&line),
        Err(_) => Choice::Cancel,
    }
}

/// Ask a yes/no question with a default answer.
///
/// Interrupted input counts as declining.
pub fn confirm(prompt: &str, default: bool) -> bool {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_parse_choice_accepts() {
        assert_eq!(parse_choice(""), Choice::Accept);
        assert_eq!(parse_choice("y"), Choice::Accept);
        assert_eq!(parse_choice("Y"), Choice::Accept);
        assert_eq!(parse_choice("  y  "), Choice::Accept);
    }

    #[test]
    fn test_parse_choice_regenerates() {
        assert_eq!(parse_choice("r"), Choice::Regenerate);
        assert_eq!(parse_choice("R"), Choice::Regenerate);
    }

    #[test]
    fn test_parse_choice_cancels_on_anything_else() {
        assert_eq!(parse_choice("n"), Choice::Cancel);
        assert_eq!(parse_choice("no"), Choice::Cancel);
        assert_eq!(parse_choice("q"), Choice::Cancel);
        assert_eq!(parse_choice("yes"), Choice::Cancel);
    }

    #[test]
    fn test_initial_temperatures() {
        assert_eq!(SuggestionKind::CommitMessage.initial_temperature(), 0.3);
        assert_eq!(SuggestionKind::BranchName.initial_temperature(), 0.5);
    }

    #[test]
    fn test_next_temperature_caps_at_one() {
        let mut t = SuggestionKind::CommitMessage.initial_temperature();
        for _ in 0..10 {
            t = next_temperature(t);
        }
        assert!(t <= MAX_TEMPERATURE);
        assert!((t - MAX_TEMPERATURE).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_review_accept_returns_suggestion() {
        let result = review_with(
            SuggestionKind::CommitMessage,
            |_temp, _rejected| async { Ok("feat: add login".to_string()) },
            || Choice::Accept,
        )
        .await;

        assert_eq!(result.unwrap().as_deref(), Some("feat: add login"));
    }

    #[tokio::test]
    async fn test_review_cancel_returns_none() {
        let result = review_with(
            SuggestionKind::CommitMessage,
            |_temp, _rejected| async { Ok("feat: add login".to_string()) },
            || Choice::Cancel,
        )
        .await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_review_regenerate_tracks_history_and_temperature() {
        let calls = RefCell::new(Vec::new());
        let choices = RefCell::new(vec![Choice::Accept, Choice::Regenerate, Choice::Regenerate]);

        let result = review_with(
            SuggestionKind::CommitMessage,
            |temp, rejected| {
                calls.borrow_mut().push((temp, rejected.clone()));
                let n = calls.borrow().len();
                async move { Ok(format!("suggestion {n}")) }
            },
            || choices.borrow_mut().pop().unwrap(),
        )
        .await;

        assert_eq!(result.unwrap().as_deref(), Some("suggestion 3"));

        let calls = calls.borrow();
        assert_eq!(calls.len(), 3);
        // Temperature escalates by 0.2 per rejection
        assert!((calls[0].0 - 0.3).abs() < 1e-6);
        assert!((calls[1].0 - 0.5).abs() < 1e-6);
        assert!((calls[2].0 - 0.7).abs() < 1e-6);
        // Rejected history accumulates in order
        assert!(calls[0].1.is_empty());
        assert_eq!(calls[1].1, vec!["suggestion 1"]);
        assert_eq!(calls[2].1, vec!["suggestion 1", "suggestion 2"]);
    }

    #[tokio::test]
    async fn test_review_propagates_generation_error() {
        let result = review_with(
            SuggestionKind::BranchName,
            |_temp, _rejected| async { Err(OpenAiError::AuthFailed) },
            || Choice::Accept,
        )
        .await;

        assert!(matches!(result, Err(OpenAiError::AuthFailed)));
    }
}
