//! Game state: grid, active piece, phases, gravity, line clears and progression.

use crate::catalog::PieceKind;
use crate::grid::{Grid, HEIGHT, RowFlags};
use crate::input::InputState;
use crate::piece::ActivePiece;
use crate::scoring::{fall_interval, rows_to_next_level, score_for};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// Pause between detecting full rows and removing them, in seconds.
pub const CLEAR_DELAY: f64 = 0.2;

/// Row whose occupation ends the game.
const LOSS_ROW: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Normal play: the active piece moves and falls.
    Falling,
    /// Full rows are shown until the clear deadline, then removed.
    Clearing,
    /// Terminal. Only a new `GameState` leaves it.
    GameOver,
}

/// Result of one drop step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    Locked,
}

/// One game session.
#[derive(Debug)]
pub struct GameState {
    pub grid: Grid,
    pub piece: ActivePiece,
    pub phase: Phase,
    pub level: u32,
    pub start_level: u32,
    /// Cumulative cleared rows.
    pub rows_cleared: u32,
    pub points: u32,
    /// Full rows waiting for the clear deadline.
    pending_rows: RowFlags,
    pending_count: usize,
    /// Seconds since the session started, as of the last update.
    pub time: f64,
    /// Next automatic drop is due at this time.
    pub drop_time: f64,
    /// Pending rows are removed at this time.
    pub clear_time: f64,
    rng: StdRng,
}

impl GameState {
    /// New session seeded from the OS random source.
    pub fn new(start_level: u32, time: f64) -> Self {
        Self::with_rng(start_level, time, StdRng::from_os_rng())
    }

    /// New session with a reproducible spawn sequence.
    pub fn with_seed(start_level: u32, seed: u64, time: f64) -> Self {
        Self::with_rng(start_level, time, StdRng::seed_from_u64(seed))
    }

    fn with_rng(start_level: u32, time: f64, mut rng: StdRng) -> Self {
        let piece = ActivePiece::spawn(random_kind(&mut rng));
        Self {
            grid: Grid::new(),
            piece,
            phase: Phase::Falling,
            level: start_level,
            start_level,
            rows_cleared: 0,
            points: 0,
            pending_rows: [false; HEIGHT],
            pending_count: 0,
            time,
            drop_time: time + fall_interval(start_level),
            clear_time: time,
            rng,
        }
    }

    /// Advances the session to `time` (seconds, monotonic) with this frame's input.
    pub fn update(&mut self, time: f64, input: &InputState) {
        self.time = time;
        match self.phase {
            Phase::Falling => self.update_falling(input),
            Phase::Clearing => self.update_clearing(),
            Phase::GameOver => {}
        }
    }

    fn update_falling(&mut self, input: &InputState) {
        let edges = input.edges();

        // Movement intents are validated together: all or nothing.
        let mut candidate = self.piece;
        if edges.left {
            candidate = candidate.shifted(-1);
        }
        if edges.right {
            candidate = candidate.shifted(1);
        }
        if edges.rotate {
            candidate = candidate.rotated_cw();
        }
        if candidate.is_valid(&self.grid) {
            self.piece = candidate;
        }

        if edges.soft_drop {
            self.drop_step();
        }
        if edges.hard_drop {
            self.hard_drop();
        }

        // Catch up on missed gravity steps. A lock reschedules the deadline.
        while self.time >= self.drop_time {
            if self.drop_step() == Step::Locked {
                break;
            }
        }

        let (count, flags) = self.grid.find_full_rows();
        if count > 0 {
            self.pending_rows = flags;
            self.pending_count = count;
            self.phase = Phase::Clearing;
            self.clear_time = self.time + CLEAR_DELAY;
        }
        if !self.grid.row_is_empty(LOSS_ROW) {
            self.phase = Phase::GameOver;
        }
    }

    fn update_clearing(&mut self) {
        if self.time < self.clear_time {
            return;
        }
        self.grid.clear_rows(&self.pending_rows);
        self.rows_cleared += self.pending_count as u32;
        self.points += score_for(self.level, self.pending_count);
        if self.rows_cleared >= rows_to_next_level(self.start_level, self.level) {
            self.level += 1;
        }
        self.pending_rows = [false; HEIGHT];
        self.pending_count = 0;
        self.spawn();
        self.drop_time = self.time + fall_interval(self.level);
        self.phase = Phase::Falling;
    }

    /// Moves the piece down one row, or locks it and spawns the next one.
    pub fn drop_step(&mut self) -> Step {
        self.piece.row += 1;
        if !self.piece.is_valid(&self.grid) {
            self.piece.row -= 1;
            self.piece.commit(&mut self.grid);
            self.spawn();
            self.drop_time = self.time + fall_interval(self.level);
            return Step::Locked;
        }
        // Catch-up steps from the missed deadline; an early manual drop restarts the timer.
        self.drop_time = self.drop_time.min(self.time) + fall_interval(self.level);
        Step::Moved
    }

    /// Drops until the piece locks.
    pub fn hard_drop(&mut self) {
        while self.drop_step() == Step::Moved {}
    }

    /// Replaces the active piece with a random kind at the spawn position.
    ///
    /// The new position is not validated; an overlapping spawn locks on its
    /// first drop step and the loss check catches it.
    fn spawn(&mut self) {
        self.piece = ActivePiece::spawn(random_kind(&mut self.rng));
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> &ActivePiece {
        &self.piece
    }

    /// Drop preview for the active piece.
    pub fn ghost(&self) -> ActivePiece {
        self.piece.ghost(&self.grid)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    /// Flags of the rows about to be removed; all false outside `Clearing`.
    pub fn clearing_rows(&self) -> &RowFlags {
        &self.pending_rows
    }

    /// Rows still to clear before the next level.
    pub fn rows_until_next_level(&self) -> u32 {
        rows_to_next_level(self.start_level, self.level).saturating_sub(self.rows_cleared)
    }
}

fn random_kind(rng: &mut StdRng) -> PieceKind {
    PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
}
