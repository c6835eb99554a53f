//! Watch a trained agent play
//!
//! Loads the saved Q-network and lets it play greedily in the terminal. A new
//! game starts automatically one tick after the previous one ends.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Start a new game
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit
//!
//! # Example
//!
//! ```rust,ignore
//! use dqn_snake::game::GameConfig;
//! use dqn_snake::modes::WatchMode;
//! use dqn_snake::rl::{default_device, FileModelStore, InferenceBackend};
//!
//! let store = FileModelStore::in_dir("model");
//! let mut watch_mode =
//!     WatchMode::<InferenceBackend>::new(&store, GameConfig::default(), default_device())?;
//! watch_mode.run().await?;
//! ```

use anyhow::{bail, Context, Result};
use burn::tensor::backend::Backend;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::rl::{FileModelStore, ModelMetadata, ModelStore, QNetwork, SnakeEnvironment};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// 2 Hz (500ms per step)
    Slow,
    /// 8 Hz (125ms per step), same as human mode
    Normal,
    /// 20 Hz (50ms per step)
    Fast,
    /// 60 Hz (16ms per step)
    VeryFast,
}

impl PlaybackSpeed {
    /// Speed for a number key, 1 to 4
    pub fn from_preset(preset: u8) -> Option<Self> {
        match preset {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

/// Terminal viewer for a trained agent
pub struct WatchMode<B: Backend> {
    network: QNetwork<B>,
    env: SnakeEnvironment,
    renderer: Renderer,
    input_handler: InputHandler,
    metrics: GameMetrics,
    metadata: ModelMetadata,
    device: B::Device,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
}

impl<B: Backend> WatchMode<B> {
    /// Load the model from `store` and start the first game.
    ///
    /// The game configuration does not have to match the one used in
    /// training; observations do not depend on the grid size.
    pub fn new(store: &FileModelStore, config: GameConfig, device: B::Device) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        if !store.exists() {
            bail!(
                "No trained model in {:?}, run training first",
                store.dir()
            );
        }

        let (network, metadata) = ModelStore::<B>::load(store, &device)
            .with_context(|| format!("Failed to load model from {:?}", store.dir()))?;

        println!("{}", "=".repeat(60));
        println!("Loaded Model Information");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", store.weights_path());
        println!("Record: {}", metadata.record);
        println!("Games trained: {}", metadata.games_played);
        println!("Hidden size: {}", metadata.network.hidden_size);
        println!("Version: {}", metadata.version);
        println!("{}", "=".repeat(60));
        println!();

        let env = SnakeEnvironment::new(engine).context("Failed to start the game")?;

        Ok(Self {
            network,
            env,
            renderer: Renderer::for_watch(),
            input_handler: InputHandler::new(),
            metrics: GameMetrics::with_high_score(metadata.record),
            metadata,
            device,
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.tick()?;
                    }
                }

                _ = render_timer.tick() => {
                    if !self.paused {
                        self.metrics.update();
                    }
                    let status = self.status_line();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &self.metrics, Some(&status));
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance one frame, or start a new game if the last one ended
    fn tick(&mut self) -> Result<()> {
        if self.env.is_done() {
            return self.new_game();
        }

        let action = self.network.best_action(&self.env.observation(), &self.device);
        let result = self.env.step(action)?;

        if result.terminated {
            self.metrics.on_game_over(result.score);
        }

        Ok(())
    }

    fn new_game(&mut self) -> Result<()> {
        self.env.reset().context("Failed to restart the game")?;
        self.metrics.on_game_start();
        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::Restart => self.new_game()?,
                KeyAction::Speed(preset) => {
                    if let Some(speed) = PlaybackSpeed::from_preset(preset) {
                        self.change_speed(speed, tick_timer);
                    }
                }
                // The agent steers
                KeyAction::Steer(_) | KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn change_speed(&mut self, speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = speed;
        *tick_timer = interval(speed.tick_interval());
    }

    fn status_line(&self) -> String {
        let mut status = format!(
            "AI playing | Game {} | Speed: {}",
            self.metrics.games_played + 1,
            self.speed.as_str()
        );
        if self.paused {
            status.push_str(" | PAUSED");
        }
        status
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
