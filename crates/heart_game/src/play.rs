//! Line-oriented play loop.

use anyhow::{Context, Result, bail};
use heart_game::{
    Dealer, GameConfig, GameMode, GameReport, Operation, ProfileService, SessionEngine,
};
use std::io::Write;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    Toggle(usize),
    SetOperation(Operation),
    Clear,
    Check,
    Quit,
    Help,
}

fn parse_command(input: &str) -> PlayCommand {
    if let Ok(operation) = input.parse::<Operation>() {
        return PlayCommand::SetOperation(operation);
    }
    match input.to_ascii_lowercase().as_str() {
        "c" | "check" => PlayCommand::Check,
        "clear" => PlayCommand::Clear,
        "q" | "quit" | "exit" => PlayCommand::Quit,
        other => match other.parse::<usize>() {
            // Cards are numbered from 1 on screen.
            Ok(n) if n > 0 => PlayCommand::Toggle(n - 1),
            _ => PlayCommand::Help,
        },
    }
}

fn print_help() {
    println!("  <n>      toggle card n");
    println!("  + - * /  choose the operator");
    println!("  check    submit the answer (two or more cards)");
    println!("  clear    deselect everything");
    println!("  quit     leave the game");
}

fn print_table(engine: &SessionEngine) {
    let Some(session) = engine.current_session() else {
        return;
    };
    println!();
    println!("Target: {}   Mode: {}", session.target_number(), session.mode());
    let cards: Vec<String> = session
        .hand()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let marker = if card.is_selected() { "*" } else { " " };
            format!("{}{}:{}", marker, i + 1, card.short_label())
        })
        .collect();
    println!("Hand:   {}", cards.join("  "));

    let picked: Vec<String> = engine
        .selected_cards()
        .iter()
        .map(|card| card.value().to_string())
        .collect();
    let expression = picked.join(&format!(" {} ", engine.current_operation()));
    println!(
        "Answer: {} = {}",
        if expression.is_empty() { "-".to_string() } else { expression },
        engine.compute_result()
    );
}

fn print_report(report: &GameReport) {
    if *report.won() {
        println!(
            "Correct! {} in {}s, score {}",
            report.target(),
            report.elapsed_seconds(),
            report.score()
        );
    } else {
        println!(
            "Not quite: {} instead of {}",
            report.result(),
            report.target()
        );
    }
    for achievement in report.unlocked() {
        println!(
            "Achievement unlocked: {} {} - {}",
            achievement.icon, achievement.title, achievement.description
        );
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Runs rounds until the player quits or input ends.
#[instrument(skip(service, config))]
pub async fn run(
    service: &mut ProfileService,
    config: &GameConfig,
    username: &str,
    mode: GameMode,
) -> Result<()> {
    let Some(mut profile) = service.get_or_register(username) else {
        bail!("Username must not be blank");
    };
    info!(username = %profile.username(), %mode, "Starting play");
    println!("Welcome, {}! Type 'help' for commands.", profile.username());

    let mut dealer = Dealer::from_config(config);
    let mut engine = SessionEngine::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let hand_size = *config.hand_size();

    loop {
        // The deal runs on a worker task; the dealer and hand come back together when it finishes.
        let (returned, deal) = tokio::spawn(async move {
            let deal = dealer.deal(hand_size).await;
            (dealer, deal)
        })
        .await
        .context("Deal task failed")?;
        dealer = returned;

        if deal.is_fallback() {
            warn!(origin = ?deal.origin(), "Using locally dealt hand");
            println!("(card service unavailable, dealt locally)");
        }
        let cards = deal.into_cards();
        let target = dealer.generate_target(&cards);
        engine.start(profile.username(), mode, target, cards);
        let started = Instant::now();
        print_table(&engine);

        loop {
            prompt("> ")?;
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            match parse_command(line.trim()) {
                PlayCommand::Toggle(index) => {
                    if let Err(e) = engine.toggle_selection(index) {
                        println!("No card {}", index + 1);
                        warn!(error = %e, "Toggle rejected");
                    }
                }
                PlayCommand::SetOperation(operation) => engine.set_operation(operation),
                PlayCommand::Clear => engine.clear_selection(),
                PlayCommand::Check => {
                    if engine.has_valid_selection() {
                        break;
                    }
                    println!("Select at least two cards first");
                    continue;
                }
                PlayCommand::Quit => return Ok(()),
                PlayCommand::Help => {
                    print_help();
                    continue;
                }
            }
            print_table(&engine);
        }

        let report = service.finish_game(&mut engine, &mut profile, started.elapsed().as_secs())?;
        print_report(&report);

        prompt("Play again? [y/N] ")?;
        match lines.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}
