//! Mozgalica - command-line entry point
//!
//! Plays the games in the terminal and manages the score history.

#![warn(missing_docs)]

mod cli;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use mozgalica::engines::{Difficulty, GameKey, MathQuizEngine, MemoryEngine, TicTacToeEngine};
use mozgalica::{
    AppConfig, HistoryFilter, MathQuizSession, MemorySession, ProfileService, ScoreReporter,
    ScoreRepository, TicTacToeSession,
};
use terminal::Prompt;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the game on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.db_path {
        config = config.with_database_path(path);
    }
    info!(database = %config.database_path(), "Configuration resolved");

    let repository = ScoreRepository::open(config.database_path().clone())
        .with_context(|| format!("Cannot open score database '{}'", config.database_path()))?;

    match cli.command {
        Command::Play {
            game,
            difficulty,
            user,
        } => play(&config, repository, game, difficulty, user).await,
        Command::History { user, game, json } => history(&repository, user, game, json),
        Command::Stats { user } => stats(repository, &user),
        Command::ClearHistory { yes } => clear_history(&repository, yes).await,
    }
}

/// Runs one game in the terminal, recording the score for `user` if given.
#[instrument(skip(config, repository))]
async fn play(
    config: &AppConfig,
    repository: ScoreRepository,
    game: GameKey,
    difficulty: Difficulty,
    user: Option<String>,
) -> Result<()> {
    let profiles = Arc::new(ProfileService::new(repository.clone()));
    match user {
        Some(name) => {
            let user = profiles.login(&name)?;
            println!("Playing as {}.", user.username());
        }
        None => println!("Playing as guest; scores are not recorded."),
    }

    let reporter = ScoreReporter::new(Arc::new(repository), profiles.clone());
    let mut prompt = Prompt::stdin();

    match game {
        GameKey::TicTacToe => {
            let engine = TicTacToeEngine::new(config.rng());
            let mut session = TicTacToeSession::new(engine, reporter, config.computer_delay());
            terminal::play_tictactoe(&mut session, difficulty, &mut prompt).await?;
        }
        GameKey::Memory => {
            let engine = MemoryEngine::new(config.rng()).with_scored_moves(config.scored_moves());
            let mut session = MemorySession::new(engine, reporter, config.mismatch_delay());
            terminal::play_memory(&mut session, difficulty, &mut prompt).await?;
        }
        GameKey::MathQuiz => {
            let engine = MathQuizEngine::new(config.rng());
            let mut session = MathQuizSession::new(engine, reporter);
            terminal::play_math_quiz(&mut session, difficulty, &mut prompt).await?;
        }
    }

    profiles.logout();
    Ok(())
}

/// Prints the score history, newest first.
#[instrument(skip(repository))]
fn history(
    repository: &ScoreRepository,
    user: Option<String>,
    game: Option<GameKey>,
    json: bool,
) -> Result<()> {
    let mut filter = HistoryFilter::all();
    if let Some(user) = user {
        filter = filter.username(user);
    }
    if let Some(game) = game {
        filter = filter.game(game);
    }

    let entries = repository.score_history(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No scores recorded.");
        return Ok(());
    }

    println!("{:<20} {:<12} {:>6}  {}", "Player", "Game", "Score", "Played");
    for entry in &entries {
        let game = entry
            .parse_game_key()
            .map(|game| game.to_string())
            .unwrap_or_else(|_| entry.game_key().clone());
        println!(
            "{:<20} {:<12} {:>6}  {}",
            entry.username(),
            game,
            entry.score(),
            entry.played_at().format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Prints best score and games played per game for one user.
#[instrument(skip(repository))]
fn stats(repository: ScoreRepository, user: &str) -> Result<()> {
    let profiles = ProfileService::new(repository);
    let summaries = profiles.summaries(user.trim())?;

    if summaries.is_empty() {
        println!("{} has no recorded games.", user.trim());
        return Ok(());
    }

    println!("{:<12} {:>6} {:>7}", "Game", "Best", "Played");
    for summary in &summaries {
        println!(
            "{:<12} {:>6} {:>7}",
            summary.game().to_string(),
            summary.best_score(),
            summary.games_played()
        );
    }
    Ok(())
}

/// Deletes every score after confirmation.
#[instrument(skip(repository))]
async fn clear_history(repository: &ScoreRepository, yes: bool) -> Result<()> {
    if !yes {
        let mut prompt = Prompt::stdin();
        if !prompt.confirm("Delete the whole score history?").await? {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    let deleted = repository.clear_history()?;
    println!("Deleted {deleted} scores.");
    Ok(())
}
