use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::driver::{Session, Ticker};
use crate::game::{Action, GameConfig, GameEngine, TickOutcome};
use crate::input::{InputAction, InputHandler};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    config: GameConfig,
    session: Session,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Last known terminal area, for mapping clicks onto the board
    screen: Rect,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(&config).context("Invalid game configuration")?;

        Ok(Self {
            config,
            session: Session::new(engine),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            screen: Rect::default(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        self.screen = terminal.get_frame().area();

        info!(
            width = self.config.board_width_px,
            height = self.config.board_height_px,
            tick_ms = self.config.tick_interval_ms,
            wall_gap = self.session.engine().grid().wall_gap(),
            "starting game"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            wins = self.metrics.wins,
            high_score = self.metrics.high_score,
            "session finished"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = Ticker::new(self.config.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = ticker.tick() => {
                    self.update_game(&mut ticker);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.session.snapshot();
                    let paused = self.session.is_paused();
                    terminal.draw(|frame| {
                        self.screen = frame.area();
                        self.renderer.render(
                            frame,
                            self.session.engine().grid(),
                            &snapshot,
                            &self.metrics,
                            paused,
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
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

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.input_handler.handle_mouse_event(mouse),
            Event::Resize(width, height) => {
                self.screen = Rect::new(0, 0, width, height);
                InputAction::None
            }
            _ => InputAction::None,
        };

        self.handle_action(action);
    }

    fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Steer(direction) => {
                self.session.push(Action::Steer(direction));
            }
            InputAction::Tap { column, row } => {
                let grid = self.session.engine().grid();
                match self.renderer.cell_at(self.screen, grid, column, row) {
                    Some(cell) => self.session.push(Action::Tap(cell)),
                    // Any click restarts a lost game, on the board or not
                    None if self.session.engine().state().lost => {
                        self.session.push(Action::Restart)
                    }
                    None => {}
                }
            }
            InputAction::Restart => {
                self.session.push(Action::Restart);
                self.session.resume();
            }
            InputAction::Pause => {
                let paused = self.session.toggle_pause();
                info!(paused, "pause toggled");
            }
            InputAction::Quit => {
                self.should_quit = true;
            }
            InputAction::None => {}
        }
    }

    fn update_game(&mut self, ticker: &mut Ticker) {
        let Some(outcome) = self.session.advance() else {
            return;
        };
        let snapshot = self.session.snapshot();
        self.metrics.record(outcome, &snapshot);

        if let TickOutcome::Lost { collision, .. } = outcome {
            info!(?collision, "game over");
        }

        let foods_eaten = snapshot
            .score
            .checked_div(self.config.food_score)
            .unwrap_or(0);
        ticker.set_period(self.config.tick_interval_after(foods_eaten));
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
