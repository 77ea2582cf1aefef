//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::audio::Sfx;
use crate::game::{self, GameState};
use crate::highscores;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    sfx: Sfx,
    screen: Screen,
    /// Suspends gravity and gameplay input; rendering stays live.
    paused: bool,
    best_score: u32,
    /// Whether this game has beaten the stored best.
    new_best: bool,
    /// TachyonFX fade for the clear flash (created when rows start flashing).
    flash_effect: Option<Effect>,
    /// Last time the flash effect was advanced (for the delta).
    flash_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let state = GameState::new(config.width as usize, config.height as usize);
        let sfx = Sfx::new(config.mute);
        let best_score = highscores::load_high_score();
        Self {
            config,
            theme,
            state,
            sfx,
            screen: Screen::Playing,
            paused: false,
            best_score,
            new_best: false,
            flash_effect: None,
            flash_time: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        result
    }

    /// One iteration per frame, strictly input → logic → render.
    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            // Drain pending input, waiting out the rest of the frame budget.
            let timeout = Duration::from_secs_f32(game::FRAME_PERIOD)
                .saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Release {
                            continue;
                        }
                        if !self.handle_key(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }

            if self.screen == Screen::Playing && !self.paused {
                let cleared = self.state.tick(Instant::now());
                self.apply_outcome(cleared);
            }

            // The engine's effect timer is authoritative; drop the fade with it.
            if self.state.clear_effect.is_empty() {
                self.flash_effect = None;
                self.flash_time = None;
            }

            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.paused,
                    self.best_score,
                    self.new_best,
                    self.config.no_animation,
                    &mut self.flash_effect,
                    &mut self.flash_time,
                    now,
                )
            })?;
        }
    }

    /// Returns false when the app should exit. Reset and pause work in every
    /// screen; the gameplay actions only while actively playing.
    fn handle_key(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Reset => self.reset_game(),
            Action::Pause => self.paused = !self.paused,
            _ if self.screen != Screen::Playing || self.paused => {}
            Action::MoveLeft => {
                self.state.move_piece(-1, 0);
            }
            Action::MoveRight => {
                self.state.move_piece(1, 0);
            }
            Action::Rotate => {
                self.state.rotate_piece();
            }
            Action::SoftDrop => {
                self.state.move_piece(0, 1);
            }
            Action::HardDrop => {
                let cleared = self.state.hard_drop();
                self.apply_outcome(cleared);
            }
            Action::None => {}
        }
        true
    }

    /// Shared follow-up after an engine call that may have locked a piece:
    /// audio cue, best-score tracking, game-over transition.
    fn apply_outcome(&mut self, cleared: u32) {
        if cleared > 0 {
            self.sfx.play_line_clear();
            // Restart the flash so it picks up the fresh row set.
            self.flash_effect = None;
            self.flash_time = None;
        }
        if self.state.score > self.best_score {
            self.best_score = self.state.score;
            self.new_best = true;
        }
        if self.state.game_over && self.screen == Screen::Playing {
            self.screen = Screen::GameOver;
            if self.new_best {
                let _ = highscores::save_high_score(self.best_score);
            }
        }
    }

    fn reset_game(&mut self) {
        self.state.reset();
        self.screen = Screen::Playing;
        self.paused = false;
        self.new_best = false;
        self.flash_effect = None;
        self.flash_time = None;
    }
}
