//! Fruit Slot — terminal slot machine
//!
//! Usage:
//!   fruit-slot                          - Play with the classic machine
//!   fruit-slot --config slot.yaml       - Play with a custom machine
//!   fruit-slot simulate --spins 100000  - Print RTP statistics as JSON

mod app;
mod input;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rf_fruit_slot::{AnimationProfile, RoundController, SlotConfig, SpinAnimation, simulate};

use crate::app::{Game, GameOptions};
use crate::ui::TerminalGuard;

#[derive(Parser)]
#[command(name = "fruit-slot", about = "Three-reel terminal slot machine")]
struct Cli {
    /// Machine configuration (JSON, or YAML by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting credits
    #[arg(long)]
    credits: Option<u64>,

    /// Minimum bet
    #[arg(long)]
    min_bet: Option<u64>,

    /// Maximum bet
    #[arg(long)]
    max_bet: Option<u64>,

    /// Initial bet
    #[arg(long)]
    bet: Option<u64>,

    /// Reel animation speed
    #[arg(short, long, value_enum)]
    profile: Option<Profile>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin many times without a balance and report RTP
    Simulate {
        /// Number of spins
        #[arg(short, long, default_value_t = 100_000)]
        spins: u64,

        /// Bet per spin (defaults to the initial bet)
        #[arg(short, long)]
        bet: Option<u64>,

        /// Seed for a repeatable run
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Normal,
    Turbo,
    Instant,
}

impl From<Profile> for AnimationProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Normal => AnimationProfile::Normal,
            Profile::Turbo => AnimationProfile::Turbo,
            Profile::Instant => AnimationProfile::Instant,
        }
    }
}

impl Cli {
    /// Load the config file (or defaults) and apply command-line overrides
    fn slot_config(&self) -> Result<SlotConfig> {
        let mut config = match &self.config {
            Some(path) => SlotConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SlotConfig::default(),
        };

        if let Some(credits) = self.credits {
            config.betting.starting_balance = credits;
        }
        if let Some(min_bet) = self.min_bet {
            config.betting.min_bet = min_bet;
        }
        if let Some(max_bet) = self.max_bet {
            config.betting.max_bet = max_bet;
        }
        if let Some(bet) = self.bet {
            config.betting.initial_bet = bet;
        }
        if let Some(profile) = self.profile {
            config.animation = SpinAnimation::from_profile(profile.into());
        }

        config.validate().context("Invalid slot configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.slot_config()?;

    match cli.command {
        Some(Commands::Simulate { spins, bet, seed }) => {
            let bet = bet.unwrap_or(config.betting.initial_bet);
            let stats = simulate(&config, spins, bet, seed).context("Simulation failed")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            println!("RTP: {:.2}%  Hit rate: {:.2}%", stats.rtp(), stats.hit_rate());
        }
        None => {
            let round = RoundController::from_config(&config).context("Failed to start game")?;
            let options = GameOptions {
                animation: config.animation.clone(),
                mute: cli.mute,
                ..Default::default()
            };

            log::info!("Starting Fruit Slot with {} credits", round.balance());
            let _terminal = TerminalGuard::enter().context("Failed to set up terminal")?;
            Game::new(round, options).run()?;
        }
    }

    Ok(())
}
