use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dqn_snake::config::AppConfig;
use dqn_snake::modes::{HumanMode, TrainConfig, TrainMode, WatchMode};
use dqn_snake::rl::{default_device, FileModelStore, InferenceBackend, TrainingBackend};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "dqn_snake")]
#[command(version, about = "Snake game with a Deep Q-Learning agent")]
struct Cli {
    /// What to run; without it an interactive menu is shown
    #[arg(long)]
    mode: Option<Mode>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the game and the agent
    #[arg(long)]
    seed: Option<u64>,

    /// Stop training after this many games
    #[arg(long)]
    episodes: Option<usize>,

    /// Directory the model is saved to and loaded from
    #[arg(long)]
    model_dir: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Train the DQN agent
    Train,
    /// Watch the trained agent play
    Watch,
}

#[derive(Debug, PartialEq, Eq)]
enum MenuChoice {
    Run(Mode),
    Exit,
    Invalid,
}

fn parse_choice(input: &str) -> MenuChoice {
    match input.trim() {
        "1" => MenuChoice::Run(Mode::Human),
        "2" => MenuChoice::Run(Mode::Train),
        "3" => MenuChoice::Exit,
        _ => MenuChoice::Invalid,
    }
}

fn prompt_mode() -> Result<Option<Mode>> {
    println!("1. Play Snake");
    println!("2. Train AI");
    println!("3. Exit");
    print!("> ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read menu choice")?;

    match parse_choice(&line) {
        MenuChoice::Run(mode) => Ok(Some(mode)),
        MenuChoice::Exit => Ok(None),
        MenuChoice::Invalid => {
            println!("Invalid");
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(model_dir) = cli.model_dir {
        config.model_dir = model_dir;
    }
    config.validate().context("Invalid configuration")?;

    let mode = match cli.mode {
        Some(mode) => mode,
        None => match prompt_mode()? {
            Some(mode) => mode,
            None => return Ok(()),
        },
    };

    match mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config.game, cli.seed)?;
            human_mode.run().await?;
            println!("Final Score {}", human_mode.score());
        }
        Mode::Train => {
            let mut train_config = TrainConfig::new(config.model_dir);
            train_config.num_episodes = cli.episodes;
            train_config.seed = cli.seed;
            train_config.game_config = config.game;
            train_config.dqn_config = config.dqn;

            let mut train_mode = TrainMode::<TrainingBackend>::new(train_config, default_device())?;
            train_mode.run()?;
        }
        Mode::Watch => {
            let store = FileModelStore::in_dir(&config.model_dir);
            let mut watch_mode =
                WatchMode::<InferenceBackend>::new(&store, config.game, default_device())?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
