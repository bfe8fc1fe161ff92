//! Command-line interface for mozgalica.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mozgalica_engines::{Difficulty, GameKey};

/// Mozgalica - brain games with a local score history
#[derive(Parser, Debug)]
#[command(name = "mozgalica")]
#[command(about = "Tic-tac-toe, memory and a math quiz in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the score database (overrides config and MOZGALICA_DB)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Game to play: tictactoe, memory or math-quiz
        game: GameKey,

        /// Difficulty: easy, medium or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,

        /// Username to record scores under (at least 3 characters)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List recorded scores, newest first
    History {
        /// Only users whose name contains this text
        #[arg(short, long)]
        user: Option<String>,

        /// Only this game
        #[arg(short, long)]
        game: Option<GameKey>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show best scores per game for a user
    Stats {
        /// Username
        #[arg(short, long)]
        user: String,
    },

    /// Delete every recorded score (users are kept)
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
