//! minicasino command line
//!
//! Plays rounds against a fresh session. Pass `--seed` to replay a session.

use clap::{Parser, Subcommand};
use minicasino::{
    config::{generate_sample_config, CasinoConfig, ConfigLoader},
    errors::{CasinoResult, RoundError},
    games::{
        mines::{validate_reveals, Reveal},
        roulette::RouletteColor,
        wheel::WheelColor,
        GameKind, HashChainDraws, RoundReport,
    },
    preferences::PreferenceStore,
    session::{Session, View},
};
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{info, warn};

/// Points-based casino mini-games
#[derive(Parser)]
#[command(name = "minicasino")]
#[command(about = "Mines, Wheel of Fortune, Dice and Roulette on a shared point ledger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 64-character hex seed for replayable draws
    #[arg(short, long, global = true)]
    seed: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll the dice
    Dice {
        #[arg(short, long, default_value = "100")]
        bet: u64,

        /// Win when the roll reaches this value (1-99)
        #[arg(short, long, default_value = "50.5")]
        roll_over: f64,

        #[arg(short = 'n', long, default_value = "1")]
        rounds: u32,
    },

    /// Spin the wheel of fortune
    Wheel {
        #[arg(short, long, default_value = "100")]
        bet: u64,

        /// red, black, blue or gold
        #[arg(short = 'k', long)]
        color: WheelColor,

        #[arg(short = 'n', long, default_value = "1")]
        rounds: u32,
    },

    /// Spin the roulette strip
    Roulette {
        #[arg(short, long, default_value = "100")]
        bet: u64,

        /// red, black or green
        #[arg(short = 'k', long)]
        color: RouletteColor,

        #[arg(short = 'n', long, default_value = "1")]
        rounds: u32,
    },

    /// Play one round of mines, revealing cells in order then cashing out
    Mines {
        #[arg(short, long, default_value = "100")]
        bet: u64,

        #[arg(short = 'm', long, default_value = "3")]
        bombs: u8,

        /// Cell indices 0-24, comma separated
        #[arg(short = 'r', long, value_delimiter = ',')]
        reveal: Vec<usize>,
    },

    /// Play every game repeatedly without presentation delays and print the profile
    Simulate {
        #[arg(short = 'n', long, default_value = "25")]
        rounds: u32,
    },

    /// Show or toggle night mode
    NightMode {
        #[arg(short, long)]
        toggle: bool,
    },

    /// Write a sample configuration file
    SampleConfig {
        #[arg(short, long, default_value = "minicasino.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> CasinoResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "minicasino=debug"
    } else {
        "minicasino=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    match cli.command {
        Commands::SampleConfig { output } => {
            generate_sample_config(&output)?;
            println!("Sample configuration written to {}", output.display());
            Ok(())
        }
        Commands::NightMode { toggle } => run_night_mode(&config, toggle),
        command => {
            let mut session = build_session(config, cli.seed.as_deref())?;
            match command {
                Commands::Dice {
                    bet,
                    roll_over,
                    rounds,
                } => play_dice(&mut session, bet, roll_over, rounds).await?,
                Commands::Wheel { bet, color, rounds } => {
                    play_wheel(&mut session, bet, color, rounds).await?
                }
                Commands::Roulette { bet, color, rounds } => {
                    play_roulette(&mut session, bet, color, rounds).await?
                }
                Commands::Mines { bet, bombs, reveal } => {
                    play_mines(&mut session, bet, bombs, &reveal).await?
                }
                Commands::Simulate { rounds } => simulate(&mut session, rounds)?,
                Commands::SampleConfig { .. } | Commands::NightMode { .. } => {}
            }
            print_profile(&session);
            Ok(())
        }
    }
}

fn build_session(config: CasinoConfig, seed: Option<&str>) -> CasinoResult<Session> {
    let draws = match seed {
        Some(hex_seed) => HashChainDraws::from_hex(hex_seed)?,
        None => HashChainDraws::random(),
    };
    info!(seed = %draws.seed_hex(), "session started");
    Ok(Session::new(config, Box::new(draws)))
}

/// A rejected bet ends a multi-round run; anything else is a real error.
fn stop_on_rejected_bet(err: RoundError) -> CasinoResult<()> {
    if err.is_invalid_bet() {
        warn!(error = %err, "bet rejected");
        println!("Bet rejected: {}", err);
        Ok(())
    } else {
        Err(err.into())
    }
}

fn print_report(report: &RoundReport) {
    match &report.entry {
        Some(entry) => println!(
            "{} {}: {:+} points, {} exp (balance {})",
            entry.game, entry.result, entry.points_delta, entry.exp_delta, report.balance_after
        ),
        None => println!(
            "{} round not recorded (balance {})",
            report.game, report.balance_after
        ),
    }
}

async fn play_dice(
    session: &mut Session,
    bet: u64,
    roll_over: f64,
    rounds: u32,
) -> CasinoResult<()> {
    let delay = session.config().presentation.reveal_delay(GameKind::Dice);
    session.open(View::Game(GameKind::Dice));
    let mut table = session.dice()?;
    table.set_bet_amount(bet)?;
    table.set_roll_over(roll_over)?;
    println!(
        "Roll over {:.2}: win chance {:.2}%, multiplier {:.2}x",
        table.roll_over(),
        table.win_chance(),
        table.multiplier()
    );

    for _ in 0..rounds {
        let roll = match table.roll() {
            Ok(roll) => roll,
            Err(err) => return stop_on_rejected_bet(err),
        };
        sleep(delay).await;
        let report = table.finish()?;
        println!("Rolled {:.2}", roll.roll);
        print_report(&report);
    }
    Ok(())
}

async fn play_wheel(
    session: &mut Session,
    bet: u64,
    color: WheelColor,
    rounds: u32,
) -> CasinoResult<()> {
    let delay = session
        .config()
        .presentation
        .reveal_delay(GameKind::WheelOfFortune);
    session.open(View::Game(GameKind::WheelOfFortune));
    let mut table = session.wheel()?;
    table.set_bet_amount(bet)?;
    table.select_color(color)?;

    for _ in 0..rounds {
        let spin = match table.spin() {
            Ok(spin) => spin,
            Err(err) => return stop_on_rejected_bet(err),
        };
        sleep(delay).await;
        let report = table.finish()?;
        println!("Wheel stopped on {} (segment {})", spin.landed, spin.segment_index);
        print_report(&report);
    }
    Ok(())
}

async fn play_roulette(
    session: &mut Session,
    bet: u64,
    color: RouletteColor,
    rounds: u32,
) -> CasinoResult<()> {
    let delay = session.config().presentation.reveal_delay(GameKind::Roulette);
    session.open(View::Game(GameKind::Roulette));
    let mut table = session.roulette()?;
    table.set_bet_amount(bet)?;
    table.select_color(color)?;

    for _ in 0..rounds {
        let spin = match table.spin() {
            Ok(spin) => spin,
            Err(err) => return stop_on_rejected_bet(err),
        };
        sleep(delay).await;
        let report = table.finish()?;
        println!("Roulette landed on {} (slot {})", spin.landed, spin.landing_slot);
        print_report(&report);
    }
    Ok(())
}

async fn play_mines(
    session: &mut Session,
    bet: u64,
    bombs: u8,
    cells: &[usize],
) -> CasinoResult<()> {
    // Bad indices would otherwise surface after the stake is taken
    validate_reveals(cells)?;
    let delay = session.config().presentation.reveal_delay(GameKind::Mines);
    session.open(View::Game(GameKind::Mines));
    let mut table = session.mines()?;
    table.set_bet_amount(bet)?;
    table.set_bomb_count(bombs)?;
    if let Err(err) = table.start() {
        return stop_on_rejected_bet(err);
    }

    for &index in cells {
        sleep(delay).await;
        match table.reveal(index)? {
            Reveal::Safe {
                multiplier,
                potential_payout,
                ..
            } => println!(
                "Cell {} is safe: {:.2}x, cash out for {}",
                index, multiplier, potential_payout
            ),
            Reveal::Bomb { report, .. } => {
                println!("Cell {} was a bomb", index);
                print_report(&report);
                return Ok(());
            }
        }
    }

    let report = table.cash_out()?;
    print_report(&report);
    Ok(())
}

/// Plays each game in turn with minimum bets. Mines opens two cells per round.
fn simulate(session: &mut Session, rounds: u32) -> CasinoResult<()> {
    for round in 0..rounds {
        session.open(View::Game(GameKind::Dice));
        if let Err(err) = session.dice()?.play() {
            return stop_on_rejected_bet(err);
        }

        session.open(View::Game(GameKind::WheelOfFortune));
        let mut wheel = session.wheel()?;
        wheel.select_color(WheelColor::ALL[round as usize % WheelColor::ALL.len()])?;
        if let Err(err) = wheel.play() {
            return stop_on_rejected_bet(err);
        }

        session.open(View::Game(GameKind::Roulette));
        let mut roulette = session.roulette()?;
        roulette.select_color(RouletteColor::Red)?;
        if let Err(err) = roulette.play() {
            return stop_on_rejected_bet(err);
        }

        session.open(View::Game(GameKind::Mines));
        let mut mines = session.mines()?;
        if let Err(err) = mines.start() {
            return stop_on_rejected_bet(err);
        }
        let mut busted = false;
        for index in [0, 24] {
            if let Reveal::Bomb { .. } = mines.reveal(index)? {
                busted = true;
                break;
            }
        }
        if !busted {
            mines.cash_out()?;
        }
    }
    session.open(View::Profile);
    Ok(())
}

fn print_profile(session: &Session) {
    let stats = session.stats();
    let progression = session.progression();
    println!();
    println!("Balance: {}", session.economy().ledger().balance());
    match progression.next_level_requirement() {
        Some(requirement) => println!(
            "Level {} ({}/{} exp, {:.0}%)",
            progression.level(),
            progression.experience(),
            requirement,
            progression.progress_percent()
        ),
        None => println!("Level {} (max)", progression.level()),
    }
    println!(
        "Games: {} ({} wins, {} losses, {:.1}% win rate), points earned {}",
        stats.total_games, stats.total_wins, stats.total_losses, stats.win_rate, stats.points_earned
    );
    if let Some((game, rate)) = stats.best_game {
        println!("Best game: {} ({:.1}%)", game, rate);
    }
}

fn run_night_mode(config: &CasinoConfig, toggle: bool) -> CasinoResult<()> {
    let mut store = PreferenceStore::open(&config.preferences.path)?;
    if toggle {
        store.toggle_night_mode()?;
    }
    println!(
        "Night mode is {}",
        if store.night_mode() { "on" } else { "off" }
    );
    Ok(())
}
