//! Game state: board, falling piece, collision, rotation, line clear, scoring.

use std::collections::VecDeque;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Default playfield width in cells (see --width).
pub const GRID_WIDTH: u16 = 12;
/// Default playfield height in cells (see --height).
pub const GRID_HEIGHT: u16 = 20;

/// Seconds between automatic one-row descents at level 1.
pub const BASE_FALL_INTERVAL: f64 = 0.5;
/// The fall interval never shrinks below this.
pub const MIN_FALL_INTERVAL: f64 = 0.05;
/// Fall-interval multiplier applied per level above 1.
pub const LEVEL_DECAY: f64 = 0.85;
/// Points for clearing 1..=4 rows at once, multiplied by the current level.
pub const LINE_BONUS: [u32; 4] = [100, 300, 500, 800];
/// Cleared lines per level step.
pub const LINES_PER_LEVEL: u32 = 10;
/// How long cleared rows flash, in seconds.
pub const CLEAR_EFFECT_SECS: f32 = 0.4;
/// Fixed logic frame period (60 Hz); the clear flash winds down by this per tick.
pub const FRAME_PERIOD: f32 = 1.0 / 60.0;

/// Tetromino kinds in palette order (cyan, yellow, purple, orange, blue, green, red).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [
        Self::I,
        Self::O,
        Self::T,
        Self::L,
        Self::J,
        Self::S,
        Self::Z,
    ];

    /// Canonical cell matrix, top-left origin.
    pub fn shape(&self) -> ShapeGrid {
        let rows: &[&[u8]] = match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::T => &[&[1, 1, 1], &[0, 1, 0]],
            Self::L => &[&[1, 1, 1], &[1, 0, 0]],
            Self::J => &[&[1, 1, 1], &[0, 0, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
        };
        ShapeGrid::from_rows(rows)
    }

    /// Colour index 0..=6 for `Theme::piece_color`.
    pub fn color_index(&self) -> u8 {
        match self {
            Self::I => 0,
            Self::O => 1,
            Self::T => 2,
            Self::L => 3,
            Self::J => 4,
            Self::S => 5,
            Self::Z => 6,
        }
    }

    fn from_index(index: u32) -> Self {
        Self::ALL[(index % 7) as usize]
    }
}

/// Rectangular boolean matrix in the piece's local frame, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeGrid {
    cols: usize,
    cells: Vec<bool>,
}

impl ShapeGrid {
    fn from_rows(rows: &[&[u8]]) -> Self {
        let cols = rows[0].len();
        debug_assert!(rows.iter().all(|r| r.len() == cols));
        let cells = rows
            .iter()
            .flat_map(|row| row.iter().map(|&c| c != 0))
            .collect();
        Self { cols, cells }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.cells.len() / self.cols
    }

    /// True if the local cell (x, y) is occupied.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.cols + x]
    }

    /// 90° clockwise rotation (transpose, then reverse rows). Returns a new
    /// matrix with swapped dimensions; the receiver is untouched.
    pub fn rotated(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols);
        let mut cells = Vec::with_capacity(self.cells.len());
        for x in 0..cols {
            for y in (0..rows).rev() {
                cells.push(self.at(x, y));
            }
        }
        Self { cols: rows, cells }
    }

    /// Occupied cells as local (x, y) pairs.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &on)| on)
            .map(move |(i, _)| (i % cols, i / cols))
    }
}

/// Piece selection: independent uniform draws, no bag.
#[derive(Debug, Clone)]
pub struct PieceRng {
    state: u32,
}

impl PieceRng {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0x1234_5678);
        Self::seeded(nanos | 1)
    }

    pub fn seeded(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.state >> 16
    }

    pub fn next_kind(&mut self) -> TetrominoKind {
        TetrominoKind::from_index(self.next() % 7)
    }
}

impl Default for PieceRng {
    fn default() -> Self {
        Self::new()
    }
}

/// The falling tetromino: kind, cell matrix, and the board position of the
/// matrix's top-left corner.
#[derive(Debug, Clone)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub cells: ShapeGrid,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// New piece of the given kind, horizontally centred, top row 0.
    pub fn spawn(kind: TetrominoKind, board_width: usize) -> Self {
        let cells = kind.shape();
        let x = board_width as i32 / 2 - cells.cols() as i32 / 2;
        Self { kind, cells, x, y: 0 }
    }

    /// Candidate matrix for a clockwise rotation. Does not mutate the piece;
    /// the engine commits it only after a collision check.
    pub fn rotated(&self) -> ShapeGrid {
        self.cells.rotated()
    }
}

/// One board cell: empty, or locked with the kind that landed there.
/// The kind tag only feeds colour lookup when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Locked(TetrominoKind),
}

/// The fixed-size grid of locked cells. Row 0 is the top.
#[derive(Debug, Clone)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    rows: VecDeque<Vec<CellState>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![CellState::Empty; width]).collect();
        Self { width, height, rows }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> CellState {
        debug_assert!(x < self.width && y < self.height);
        self.rows[y][x]
    }

    /// True if placing `shape` with its top-left at (x, y) is illegal: an
    /// occupied cell past a side wall, below the floor, or overlapping a
    /// locked cell. Rows above the top (board row < 0) are exempt from the
    /// overlap check so pieces may hang partially off-screen at spawn, but
    /// not from the side bounds. Every mutation is gated on this.
    pub fn collides(&self, shape: &ShapeGrid, x: i32, y: i32) -> bool {
        for (cx, cy) in shape.occupied() {
            let bx = x + cx as i32;
            let by = y + cy as i32;
            if bx < 0 || bx >= self.width as i32 || by >= self.height as i32 {
                return true;
            }
            if by >= 0 && self.rows[by as usize][bx as usize] != CellState::Empty {
                return true;
            }
        }
        false
    }

    /// Write the piece's occupied cells into the grid. No collision check:
    /// the caller has already established legality. Cells above row 0 are
    /// dropped.
    fn merge(&mut self, piece: &Piece) {
        for (cx, cy) in piece.cells.occupied() {
            let by = piece.y + cy as i32;
            if by >= 0 {
                let bx = (piece.x + cx as i32) as usize;
                self.rows[by as usize][bx] = CellState::Locked(piece.kind);
            }
        }
    }

    /// Remove every full row and insert an equal number of empty rows at the
    /// top, preserving the relative order of the rest. Returns the removed
    /// rows' indices as they were at scan time.
    ///
    /// Processing in ascending order keeps each recorded index valid: rows
    /// below a removed row keep their index (one shift up from the removal,
    /// one shift down from the insert).
    fn take_full_rows(&mut self) -> Vec<usize> {
        let full: Vec<usize> = (0..self.height)
            .filter(|&y| self.rows[y].iter().all(|&c| c != CellState::Empty))
            .collect();
        for &y in &full {
            self.rows.remove(y);
            self.rows.push_front(vec![CellState::Empty; self.width]);
        }
        full
    }
}

/// Game state: board, current and next piece, score, level, fall timing.
#[derive(Debug)]
pub struct GameState {
    pub board: Board,
    pub current: Piece,
    pub next: Piece,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    /// Seconds between automatic descents; shrinks as the level rises.
    pub fall_interval: f64,
    last_fall: Instant,
    pub game_over: bool,
    /// Row indices flashing after a clear (scan-time indices).
    pub clear_effect: Vec<usize>,
    /// Seconds of flash remaining; rows un-flash when it reaches zero.
    pub clear_effect_time: f32,
    rng: PieceRng,
}

impl GameState {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_rng(width, height, PieceRng::new())
    }

    /// Deterministic construction for tests.
    pub fn with_rng(width: usize, height: usize, mut rng: PieceRng) -> Self {
        let current = Piece::spawn(rng.next_kind(), width);
        let next = Piece::spawn(rng.next_kind(), width);
        Self {
            board: Board::new(width, height),
            current,
            next,
            score: 0,
            level: 1,
            lines_cleared: 0,
            fall_interval: BASE_FALL_INTERVAL,
            last_fall: Instant::now(),
            game_over: false,
            clear_effect: Vec::new(),
            clear_effect_time: 0.0,
            rng,
        }
    }

    /// Reinitialize every field to start-of-game values, keeping dimensions.
    pub fn reset(&mut self) {
        *self = Self::with_rng(self.board.width, self.board.height, self.rng.clone());
    }

    /// Shift the falling piece by (dx, dy) if the result is legal. All or
    /// nothing: on failure the piece is untouched.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.game_over {
            return false;
        }
        if self
            .board
            .collides(&self.current.cells, self.current.x + dx, self.current.y + dy)
        {
            return false;
        }
        self.current.x += dx;
        self.current.y += dy;
        true
    }

    /// Rotate the falling piece clockwise, kicking off walls when the
    /// in-place rotation is blocked. Offsets are tried in order
    /// 0, -1, +1, -2, +2 on the same row; the first legal placement wins.
    pub fn rotate_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let rotated = self.current.rotated();
        for dx in [0, -1, 1, -2, 2] {
            if !self.board.collides(&rotated, self.current.x + dx, self.current.y) {
                self.current.x += dx;
                self.current.cells = rotated;
                return true;
            }
        }
        false
    }

    /// Drop the piece to the lowest legal row and lock it in immediately.
    /// Returns the number of lines cleared so the driver can fire the cue.
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over {
            return 0;
        }
        while self.move_piece(0, 1) {}
        self.lock_in()
    }

    /// merge → clear → respawn. The caller guarantees the piece rests.
    fn lock_in(&mut self) -> u32 {
        self.board.merge(&self.current);
        let cleared = self.clear_lines();
        self.spawn_next();
        cleared
    }

    fn clear_lines(&mut self) -> u32 {
        let full = self.board.take_full_rows();
        let k = full.len() as u32;
        if k == 0 {
            return 0;
        }
        self.clear_effect = full;
        self.clear_effect_time = CLEAR_EFFECT_SECS;
        self.lines_cleared += k;
        // Score at the level the rows were cleared on, then re-derive level
        // and speed from the new line total.
        self.score += LINE_BONUS[(k.min(4) - 1) as usize] * self.level;
        self.level = self.lines_cleared / LINES_PER_LEVEL + 1;
        self.fall_interval =
            (BASE_FALL_INTERVAL * LEVEL_DECAY.powi(self.level as i32 - 1)).max(MIN_FALL_INTERVAL);
        k
    }

    /// Promote the preview piece and draw a fresh one. If the promoted piece
    /// already collides at its spawn position the game is over.
    fn spawn_next(&mut self) {
        let fresh = Piece::spawn(self.rng.next_kind(), self.board.width);
        self.current = std::mem::replace(&mut self.next, fresh);
        if self
            .board
            .collides(&self.current.cells, self.current.x, self.current.y)
        {
            self.game_over = true;
        }
    }

    /// Per-frame update, called once per frame by the driver. The clear flash
    /// winds down by a fixed 1/60 s per call; gravity fires when wall-clock
    /// time since the last descent exceeds `fall_interval`, locking the piece
    /// in when it can no longer fall. Returns the number of lines cleared.
    ///
    /// A soft drop through `move_piece(0, 1)` does not touch the fall timer.
    pub fn tick(&mut self, now: Instant) -> u32 {
        if self.game_over {
            return 0;
        }
        if self.clear_effect_time > 0.0 {
            self.clear_effect_time -= FRAME_PERIOD;
            if self.clear_effect_time <= 0.0 {
                self.clear_effect_time = 0.0;
                self.clear_effect.clear();
            }
        }
        let mut cleared = 0;
        if now.duration_since(self.last_fall).as_secs_f64() > self.fall_interval {
            if !self.move_piece(0, 1) {
                cleared = self.lock_in();
            }
            self.last_fall = now;
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn game(width: usize, height: usize) -> GameState {
        GameState::with_rng(width, height, PieceRng::seeded(7))
    }

    fn place(state: &mut GameState, kind: TetrominoKind, x: i32, y: i32) {
        state.current = Piece {
            kind,
            cells: kind.shape(),
            x,
            y,
        };
    }

    fn lock_cell(state: &mut GameState, x: usize, y: usize) {
        state.board.rows[y][x] = CellState::Locked(TetrominoKind::T);
    }

    fn fill_row(state: &mut GameState, y: usize) {
        for x in 0..state.board.width {
            lock_cell(state, x, y);
        }
    }

    fn row_is_empty(state: &GameState, y: usize) -> bool {
        (0..state.board.width).all(|x| state.board.get(x, y) == CellState::Empty)
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let i = TetrominoKind::I.shape();
        assert_eq!((i.rows(), i.cols()), (1, 4));
        let vertical = i.rotated();
        assert_eq!((vertical.rows(), vertical.cols()), (4, 1));
        assert!((0..4).all(|y| vertical.at(0, y)));
    }

    #[test]
    fn four_rotations_restore_the_shape() {
        for kind in TetrominoKind::ALL {
            let shape = kind.shape();
            let back = shape.rotated().rotated().rotated().rotated();
            assert_eq!(shape, back, "{kind:?}");
        }
    }

    #[test]
    fn collides_at_side_walls_and_floor() {
        let g = game(12, 20);
        let o = TetrominoKind::O.shape();
        assert!(g.board.collides(&o, -1, 5));
        assert!(!g.board.collides(&o, 0, 5));
        assert!(!g.board.collides(&o, 10, 5));
        assert!(g.board.collides(&o, 11, 5));
        assert!(g.board.collides(&o, 5, 19));
        assert!(!g.board.collides(&o, 5, 18));
    }

    #[test]
    fn rows_above_the_board_skip_the_overlap_check() {
        let mut g = game(12, 20);
        lock_cell(&mut g, 5, 0);
        let o = TetrominoKind::O.shape();
        // Fully above the board: side bounds still apply, no overlap possible.
        assert!(!g.board.collides(&o, 5, -2));
        assert!(g.board.collides(&o, -1, -2));
        // One row on the board: the visible row must be free.
        assert!(g.board.collides(&o, 5, -1));
        assert!(!g.board.collides(&o, 7, -1));
    }

    #[test]
    fn move_commits_fully_or_not_at_all() {
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::O, 5, 5);
        assert!(g.move_piece(-1, 0));
        assert_eq!((g.current.x, g.current.y), (4, 5));
        assert!(g.move_piece(0, 1));
        assert_eq!((g.current.x, g.current.y), (4, 6));

        place(&mut g, TetrominoKind::O, 0, 5);
        assert!(!g.move_piece(-1, 0));
        assert_eq!((g.current.x, g.current.y), (0, 5));
    }

    #[test]
    fn clearing_nothing_changes_nothing() {
        let mut g = game(12, 20);
        lock_cell(&mut g, 3, 19);
        let before_rows = g.board.rows.clone();
        let before_interval = g.fall_interval;

        assert_eq!(g.clear_lines(), 0);
        assert_eq!(g.board.rows, before_rows);
        assert_eq!(g.score, 0);
        assert_eq!(g.level, 1);
        assert_eq!(g.lines_cleared, 0);
        assert!((g.fall_interval - before_interval).abs() < f64::EPSILON);
        assert!(g.clear_effect.is_empty());
    }

    #[test]
    fn compaction_preserves_relative_order() {
        let mut g = game(12, 20);
        fill_row(&mut g, 2);
        fill_row(&mut g, 5);
        // Markers in the rows between and below the cleared ones.
        lock_cell(&mut g, 0, 3);
        lock_cell(&mut g, 1, 4);
        lock_cell(&mut g, 2, 6);

        assert_eq!(g.clear_lines(), 2);
        assert_eq!(g.clear_effect, vec![2, 5]);

        assert!(row_is_empty(&g, 0));
        assert!(row_is_empty(&g, 1));
        // Former rows 3 and 4 slid down past both removals.
        assert_ne!(g.board.get(0, 4), CellState::Empty);
        assert_ne!(g.board.get(1, 5), CellState::Empty);
        // Rows below the lowest cleared row stay put.
        assert_ne!(g.board.get(2, 6), CellState::Empty);
    }

    #[test]
    fn line_bonus_scales_with_count_and_level() {
        for (k, bonus) in [(1, 100), (2, 300), (3, 500), (4, 800)] {
            let mut g = game(12, 20);
            for y in 0..k {
                fill_row(&mut g, 19 - y);
            }
            assert_eq!(g.clear_lines(), k as u32);
            assert_eq!(g.score, bonus);
        }

        let mut g = game(12, 20);
        g.lines_cleared = 20;
        g.level = 3;
        fill_row(&mut g, 19);
        fill_row(&mut g, 18);
        g.clear_lines();
        assert_eq!(g.score, 300 * 3);
        assert_eq!(g.lines_cleared, 22);
        assert_eq!(g.level, 3);
    }

    #[test]
    fn level_tracks_lines_and_speeds_up() {
        let mut g = game(12, 20);
        g.lines_cleared = 9;
        fill_row(&mut g, 19);
        g.clear_lines();
        assert_eq!(g.lines_cleared, 10);
        assert_eq!(g.level, 2);
        assert!((g.fall_interval - 0.5 * 0.85).abs() < 1e-9);

        // Far past every threshold the interval pins to the floor.
        g.lines_cleared = 999;
        fill_row(&mut g, 19);
        g.clear_lines();
        assert_eq!(g.level, 101);
        assert!((g.fall_interval - MIN_FALL_INTERVAL).abs() < f64::EPSILON);
    }

    #[test]
    fn wall_kick_commits_the_first_legal_offset() {
        // Vertical T at (4, 5); the rotated matrix occupies, relative to the
        // tried origin, (1,0), (0,1), (1,1), (1,2). Blockers make offsets
        // 0, -1, +1 and -2 illegal so only +2 fits.
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::T, 4, 5);
        let expected = g.current.rotated();
        lock_cell(&mut g, 4, 6); // blocks 0 and -1
        lock_cell(&mut g, 6, 7); // blocks +1
        lock_cell(&mut g, 2, 6); // blocks -2

        assert!(g.rotate_piece());
        assert_eq!(g.current.x, 6);
        assert_eq!(g.current.y, 5);
        assert_eq!(g.current.cells, expected);
    }

    #[test]
    fn wall_kick_prefers_minus_one_over_plus_one() {
        // Only the in-place rotation is blocked; both -1 and +1 are legal and
        // the earlier offset in the order must win.
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::T, 4, 5);
        lock_cell(&mut g, 5, 7); // blocks offset 0 only

        assert!(g.rotate_piece());
        assert_eq!(g.current.x, 3);
    }

    #[test]
    fn rotation_fails_cleanly_when_no_offset_fits() {
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::T, 4, 5);
        let before = g.current.clone();
        for x in 0..12 {
            lock_cell(&mut g, x, 6);
        }

        assert!(!g.rotate_piece());
        assert_eq!(g.current.x, before.x);
        assert_eq!(g.current.cells, before.cells);
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut g = game(12, 20);
        // Occupy the two top rows so any spawn position collides.
        fill_row(&mut g, 0);
        fill_row(&mut g, 1);
        g.spawn_next();
        assert!(g.game_over);

        // Gameplay operations are no-ops until reset.
        let (x, y) = (g.current.x, g.current.y);
        assert!(!g.move_piece(-1, 0));
        assert!(!g.rotate_piece());
        assert_eq!(g.hard_drop(), 0);
        assert_eq!((g.current.x, g.current.y), (x, y));

        g.reset();
        assert!(!g.game_over);
        assert_eq!(g.score, 0);
        assert!((0..20).all(|y| row_is_empty(&g, y)));
    }

    #[test]
    fn hard_drop_locks_merges_and_respawns() {
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::O, 5, 0);
        assert_eq!(g.hard_drop(), 0);
        assert_eq!(g.board.get(5, 19), CellState::Locked(TetrominoKind::O));
        assert_eq!(g.board.get(6, 18), CellState::Locked(TetrominoKind::O));
        // The preview was promoted and the piece is back at the top.
        assert_eq!(g.current.y, 0);
    }

    #[test]
    fn single_line_clear_end_to_end() {
        let mut g = game(12, 20);
        // Bottom row complete except the two columns the O piece will fill,
        // with a marker on the row above.
        for x in 0..12 {
            if x != 5 && x != 6 {
                lock_cell(&mut g, x, 19);
            }
        }
        lock_cell(&mut g, 0, 18);
        place(&mut g, TetrominoKind::O, 5, 0);

        assert_eq!(g.hard_drop(), 1);
        assert_eq!(g.lines_cleared, 1);
        assert_eq!(g.score, 100);
        assert_eq!(g.level, 1);
        assert_eq!(g.clear_effect, vec![19]);
        assert!((g.clear_effect_time - CLEAR_EFFECT_SECS).abs() < f32::EPSILON);
        assert!(row_is_empty(&g, 0));
        // The marker row dropped to the bottom; the O's upper half is with it.
        assert_ne!(g.board.get(0, 19), CellState::Empty);
        assert_eq!(g.board.get(5, 19), CellState::Locked(TetrominoKind::O));
        assert_eq!(g.board.get(1, 19), CellState::Empty);
    }

    #[test]
    fn gravity_waits_for_the_fall_interval() {
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::O, 5, 0);
        let now = Instant::now();
        g.last_fall = now;
        assert_eq!(g.tick(now), 0);
        assert_eq!(g.current.y, 0);

        let later = now + Duration::from_secs_f64(g.fall_interval + 0.01);
        g.tick(later);
        assert_eq!(g.current.y, 1);

        // The timer reset: an immediate second tick does not fall again.
        g.tick(later);
        assert_eq!(g.current.y, 1);
    }

    #[test]
    fn soft_drop_leaves_the_fall_timer_alone() {
        let mut g = game(12, 20);
        place(&mut g, TetrominoKind::O, 5, 0);
        let now = Instant::now();
        g.last_fall = now - Duration::from_secs(1);
        assert!(g.move_piece(0, 1));
        // Gravity is still due: the manual descent did not reset the clock.
        g.tick(now);
        assert_eq!(g.current.y, 2);
    }

    #[test]
    fn clear_flash_expires_after_its_duration() {
        let mut g = game(12, 20);
        g.clear_effect = vec![19];
        g.clear_effect_time = CLEAR_EFFECT_SECS;
        let now = Instant::now();
        g.last_fall = now;

        // 0.4 s at 1/60 s per tick is 24 frames; stay clear of the boundary.
        for _ in 0..20 {
            g.tick(now);
        }
        assert!(!g.clear_effect.is_empty());
        for _ in 0..6 {
            g.tick(now);
        }
        assert!(g.clear_effect.is_empty());
        assert_eq!(g.clear_effect_time, 0.0);
    }

    #[test]
    fn spawn_centres_each_shape() {
        for kind in TetrominoKind::ALL {
            let piece = Piece::spawn(kind, 12);
            assert_eq!(piece.x, 6 - piece.cells.cols() as i32 / 2);
            assert_eq!(piece.y, 0);
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = PieceRng::seeded(42);
        let mut b = PieceRng::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }
}
