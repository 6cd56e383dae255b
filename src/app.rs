//! App: terminal init, frame loop, key handling and restart.

use crate::GameConfig;
use crate::theme::Theme;
use crate::ui::{self, ClearFx};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use stacktui::game::{GameState, Phase};
use stacktui::input::{Action, InputState, key_to_action};
use std::time::{Duration, Instant};

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    input: InputState,
    /// Session clock origin; game time is seconds since this instant.
    started: Instant,
    clear_fx: ClearFx,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let started = Instant::now();
        let state = Self::new_game(&config, 0.0);
        Self {
            config,
            theme,
            state,
            input: InputState::new(false),
            started,
            clear_fx: ClearFx::default(),
        }
    }

    fn new_game(config: &GameConfig, time: f64) -> GameState {
        match config.seed {
            Some(seed) => GameState::with_seed(config.start_level, seed, time),
            None => GameState::new(config.start_level, time),
        }
    }

    /// Seconds since the session clock started.
    fn game_time(&self, now: Instant) -> f64 {
        now.duration_since(self.started).as_secs_f64()
    }

    fn restart(&mut self, now: Instant) {
        self.state = Self::new_game(&self.config, self.game_time(now));
        self.clear_fx.reset();
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                supports_keyboard_enhancement,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        or_restore(execute!(stdout, EnterAlternateScreen), || {
            let _ = disable_raw_mode();
        })?;

        // Release events give true held-key tracking; without them every press is a tap.
        let enhanced = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        self.input = InputState::new(enhanced);

        let result = ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        // Restore
        if enhanced {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1.0));
        loop {
            let now = Instant::now();
            self.input.begin_frame();

            while event::poll(Duration::ZERO)? {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                let action = key_to_action(key);
                if key.kind == KeyEventKind::Press {
                    match action {
                        Action::Quit => return Ok(()),
                        Action::Restart if self.state.phase() == Phase::GameOver => {
                            self.restart(now);
                            continue;
                        }
                        _ => {}
                    }
                }
                self.input.handle_key(key);
            }

            self.state.update(self.game_time(now), &self.input);
            if self.state.phase() != Phase::Clearing {
                self.clear_fx.reset();
            }

            terminal.draw(|f| {
                ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    &self.config.view,
                    &mut self.clear_fx,
                    now,
                );
            })?;

            // Sleep out the rest of the frame, waking early for input.
            let timeout = frame_duration.saturating_sub(now.elapsed());
            event::poll(timeout)?;
        }
    }
}

/// Runs `restore` when `result` is an error, then passes `result` through.
fn or_restore<T, E>(result: Result<T, E>, restore: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        restore();
    }
    result
}
