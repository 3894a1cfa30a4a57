//! Command-line interface for heart_game.

use clap::{Parser, Subcommand};
use heart_game::GameMode;
use std::path::PathBuf;

/// Heart Game - combine cards to hit the target number
#[derive(Parser, Debug)]
#[command(name = "heart_game")]
#[command(about = "Arithmetic card puzzle with player progression", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "heart_game.toml")]
    pub config: PathBuf,

    /// Override the users file from the config
    #[arg(long, global = true)]
    pub users_file: Option<PathBuf>,

    /// Deal cards locally instead of calling the card service
    #[arg(long, global = true)]
    pub offline: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new player
    Register {
        /// Player name
        username: String,
    },

    /// Play rounds in the terminal
    Play {
        /// Player name (registered on first play)
        username: String,

        /// Game mode: standard, timed or streak
        #[arg(short, long, default_value = "standard")]
        mode: GameMode,
    },

    /// Show a player's statistics
    Stats {
        /// Player name
        username: String,
    },

    /// Show players ranked by best score
    Leaderboard {
        /// Number of players to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// List achievements, marking the ones a player has unlocked
    Achievements {
        /// Player name
        username: Option<String>,
    },
}
