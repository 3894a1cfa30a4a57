//! Heart Game - terminal front end
//!
//! Thin shell over the `heart_game` library: profile commands and a
//! line-oriented play loop.

#![warn(missing_docs)]

mod cli;
mod play;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use heart_game::{GameConfig, ProfileService, UserStore, catalog};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = GameConfig::load_or_default(&cli.config)?;
    if let Some(users_file) = cli.users_file {
        config = config.with_users_file(users_file);
    }
    if cli.offline {
        config = config.with_offline(true);
    }
    debug!(?config, "Configuration resolved");

    let mut service = ProfileService::new(UserStore::open(config.users_file()));

    match cli.command {
        Command::Register { username } => run_register(&mut service, &username),
        Command::Play { username, mode } => {
            play::run(&mut service, &config, &username, mode).await
        }
        Command::Stats { username } => run_stats(&service, &username),
        Command::Leaderboard { limit } => run_leaderboard(&service, limit),
        Command::Achievements { username } => run_achievements(&service, username.as_deref()),
    }
}

/// Register a new player
fn run_register(service: &mut ProfileService, username: &str) -> Result<()> {
    if service.register(username) {
        info!(username, "Registered");
        println!("Registered {}", username.trim());
        Ok(())
    } else {
        bail!("Cannot register '{}': name is blank or already taken", username)
    }
}

/// Print a player's statistics
fn run_stats(service: &ProfileService, username: &str) -> Result<()> {
    let Some(profile) = service.login(username) else {
        bail!("No player named '{}'", username);
    };

    println!("Player:        {}", profile.username());
    println!("Registered:    {}", profile.registration_date().format("%Y-%m-%d"));
    println!("Games played:  {}", profile.total_games_played());
    println!("Won / lost:    {} / {}", profile.games_won(), profile.games_lost());
    println!("Win rate:      {:.1}%", profile.win_rate());
    println!("Best score:    {}", profile.best_score());
    match profile.best_time_seconds() {
        Some(seconds) => println!("Best time:     {}s", seconds),
        None => println!("Best time:     -"),
    }
    println!(
        "Streak:        {} (best {})",
        profile.current_streak(),
        profile.best_streak()
    );
    println!("Achievements:  {}", profile.unlocked_achievements().len());
    Ok(())
}

/// Print the leaderboard
fn run_leaderboard(service: &ProfileService, limit: usize) -> Result<()> {
    let ranked = service.leaderboard();
    if ranked.is_empty() {
        println!("No players yet");
        return Ok(());
    }
    for (rank, profile) in ranked.iter().take(limit).enumerate() {
        println!(
            "{:>3}. {:<20} {:>8}  {:>5.1}% of {}",
            rank + 1,
            profile.username(),
            profile.best_score(),
            profile.win_rate(),
            profile.total_games_played()
        );
    }
    Ok(())
}

/// Print the achievement catalog
fn run_achievements(service: &ProfileService, username: Option<&str>) -> Result<()> {
    let profile = match username {
        Some(name) => match service.login(name) {
            Some(profile) => Some(profile),
            None => bail!("No player named '{}'", name),
        },
        None => None,
    };

    for achievement in catalog() {
        let mark = match &profile {
            Some(p) if p.has_achievement(achievement.id) => "[x]",
            Some(_) => "[ ]",
            None => "   ",
        };
        println!(
            "{} {} {:<18} {}",
            mark, achievement.icon, achievement.title, achievement.description
        );
    }
    Ok(())
}
