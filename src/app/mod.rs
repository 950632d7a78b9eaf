use std::error::Error;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::game::Phase;
use crate::ui::draw_game;
use crate::{Game, BOARD_H, BOARD_W, COLOR_COUNT, TICK_MS};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Presentation-side state: the core session plus the cursor, the pending
/// selection, and a short score flash after each cascade step.
pub struct Session {
    pub game: Game,
    pub cursor: usize,
    pub selected: Option<usize>,
    pub flash_frames: u8,
    pub last_matches: u32,
}

impl Session {
    fn new(game: Game) -> Self {
        Self {
            game,
            cursor: 0,
            selected: None,
            flash_frames: 0,
            last_matches: 0,
        }
    }

    /// One paced cascade step, with flash bookkeeping for the UI.
    fn advance(&mut self) {
        if self.game.phase() != Phase::Resolving {
            return;
        }
        let report = self.game.tick();
        if report.matches_found > 0 {
            self.last_matches = report.matches_found;
            self.flash_frames = 4;
        }
    }

    fn process_effects(&mut self) {
        if self.flash_frames > 0 {
            self.flash_frames -= 1;
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let x = (self.cursor % BOARD_W) as i32 + dx;
        let y = (self.cursor / BOARD_W) as i32 + dy;
        if (0..BOARD_W as i32).contains(&x) && (0..BOARD_H as i32).contains(&y) {
            self.cursor = y as usize * BOARD_W + x as usize;
        }
    }

    /// Select the cursor cell, or try the swap when a neighbor is already
    /// selected. A rejected swap keeps the selection on the cursor so the
    /// player can try another direction.
    fn select(&mut self) {
        match self.selected.take() {
            None => self.selected = Some(self.cursor),
            Some(sel) if sel == self.cursor => {}
            Some(sel) => {
                let accepted = self.game.request_swap(sel, self.cursor).unwrap_or(false);
                if !accepted {
                    self.selected = Some(self.cursor);
                }
            }
        }
    }

    pub fn game_over(&self) -> bool {
        self.game.phase() == Phase::Idle && !self.game.has_moves()
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let mut tui = TuiGuard::new()?;
    run_loop(tui.terminal_mut())
}

fn run_loop(terminal: &mut Term) -> Result<(), Box<dyn Error>> {
    // CRUNCH_SEED pins the refill sequence for a reproducible session.
    let game = match std::env::var("CRUNCH_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => Game::with_seed(BOARD_W, BOARD_H, COLOR_COUNT, seed),
        None => Game::new(BOARD_W, BOARD_H, COLOR_COUNT),
    };
    let mut session = Session::new(game);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| draw_game(frame, &session))?;

        session.process_effects();

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    break;
                }
                handle_input(key.code, &mut session);
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            session.advance();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

struct TuiGuard {
    terminal: Term,
}

impl TuiGuard {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn handle_input(code: KeyCode, session: &mut Session) {
    match code {
        KeyCode::Left => session.move_cursor(-1, 0),
        KeyCode::Right => session.move_cursor(1, 0),
        KeyCode::Up => session.move_cursor(0, -1),
        KeyCode::Down => session.move_cursor(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => session.select(),
        _ => {}
    }
}
