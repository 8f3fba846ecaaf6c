//! commit-genius - CLI entry point.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use commit_genius::config::Settings;
use commit_genius::credentials::{
    SecretPrompt, TerminalPrompt, default_credential_path, resolve_api_key,
    resolve_api_key_lenient,
};
use commit_genius::error::GitError;
use commit_genius::git::{GitRepo, VersionControl};
use commit_genius::interact::{Decision, TerminalReviewer, review};
use commit_genius::llm::{GenerationRequest, LlmRouter, Mode};
use commit_genius::ollama::OllamaBackend;
use commit_genius::remote::RemoteBackend;
use commit_genius::rules::RulesBackend;

/// Generate a conventional commit message for the staged changes.
#[derive(Parser, Debug)]
#[command(name = "commit-genius")]
#[command(about = "Generate a conventional commit message for the staged changes")]
#[command(version)]
struct Cli {
    /// Only use the local Ollama model
    #[arg(long, conflicts_with = "cloud")]
    local: bool,

    /// Only use the hosted API (prompts for an API key if none is configured)
    #[arg(long)]
    cloud: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.local {
            Mode::ForceLocal
        } else if self.cloud {
            Mode::ForceRemote
        } else {
            Mode::Auto
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("commit_genius={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is the common case.
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    println!("commit-genius: writing a commit message for your staged changes\n");

    // Step 1: Check the repository and staged changes
    let git = GitRepo::new(".");
    if !git.is_repository() {
        return Err(GitError::NotARepository.into());
    }
    if !git
        .has_staged_changes()
        .context("Failed to inspect the index")?
    {
        return Err(GitError::NoStagedChanges.into());
    }

    let diff = git.staged_diff().context("Failed to read staged changes")?;
    println!("Analyzing {} staged file(s)...", diff.paths.len());

    // Step 2: Resolve credentials; only a forced cloud run may prompt
    let mode = cli.mode();
    let settings = Settings::from_env();
    debug!(?mode, ?settings, "resolved settings");

    let terminal_prompt = (mode == Mode::ForceRemote && std::io::stdin().is_terminal())
        .then_some(TerminalPrompt);
    let credential_path = default_credential_path();
    let prompt = terminal_prompt.as_ref().map(|p| p as &dyn SecretPrompt);
    // Only a forced cloud run depends on the key; elsewhere a bad file is skipped.
    let api_key = if mode == Mode::ForceRemote {
        resolve_api_key(credential_path.as_deref(), prompt)
    } else {
        resolve_api_key_lenient(credential_path.as_deref(), prompt)
    }
    .context("Failed to load API key")?
    .map(|(key, source)| {
        debug!(?source, "API key found");
        key
    });

    // Step 3: Build backends and generate
    let local = OllamaBackend::new(&settings.local).context("Failed to build HTTP client")?;
    let remote =
        RemoteBackend::new(&settings.remote, api_key).context("Failed to build HTTP client")?;
    let router = LlmRouter::new(Box::new(local), Box::new(remote), Box::new(RulesBackend));

    let result = router
        .generate(&GenerationRequest::new(&diff.text, mode))
        .await
        .context("Failed to generate a commit message")?;

    if result.fallbacks.is_empty() {
        println!("Generated with {}:", result.label);
    } else {
        println!(
            "Generated with {} after {} fallback(s):",
            result.label,
            result.fallbacks.len()
        );
    }
    println!("\n  {}\n", result.message);

    // Step 4: Review and commit
    match review(&TerminalReviewer, &result.message)? {
        Decision::Commit(message) => {
            git.commit(&message).context("Commit failed")?;
            println!("✓ Committed: {}", message.lines().next().unwrap_or_default());
        }
        Decision::Cancel => println!("Commit cancelled. Nothing was committed."),
    }

    Ok(())
}
