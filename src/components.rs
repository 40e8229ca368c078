#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;

use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X, SPAWN_Y, STARTING_LEVEL};
use crate::shapes::{ShapeKind, ShapeMatrix};

/// A shape matrix anchored on the board by its top-left cell.
///
/// `y` may be negative while a piece is partially above the visible board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: ShapeMatrix,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// A piece of `kind` in its initial orientation at the spawn anchor.
    #[must_use]
    pub fn spawn(kind: ShapeKind) -> Self {
        Self {
            kind,
            shape: kind.matrix(),
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::spawn(ShapeKind::random(rng))
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Same anchor, shape rotated clockwise.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..self.clone()
        }
    }

    /// Same shape, re-anchored at the spawn position.
    #[must_use]
    pub fn at_spawn(&self) -> Self {
        Self {
            x: SPAWN_X,
            y: SPAWN_Y,
            ..self.clone()
        }
    }

    /// Absolute `(x, y)` board coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }
}

/// Fixed-size occupancy grid. Rows are indexed top to bottom.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<bool>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            rows: vec![vec![false; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range coordinates read as empty.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|cell| !cell))
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| **cell).count()
    }

    /// Marks a single cell; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, occupied: bool) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = occupied;
        }
    }

    /// True when any filled cell of `piece` is outside the side walls, below
    /// the floor, or on top of an occupied cell. Cells above the top edge only
    /// collide with the walls.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        let width = self.width as i32;
        let height = self.height as i32;
        piece.cells().any(|(x, y)| {
            x < 0 || x >= width || y >= height || (y >= 0 && self.rows[y as usize][x as usize])
        })
    }

    /// A copy of this board with every on-board cell of `piece` marked occupied.
    #[must_use]
    pub fn merged(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        for (x, y) in piece.cells() {
            if y >= 0 {
                board.set(x as usize, y as usize, true);
            }
        }
        board
    }

    /// Drops every full row and refills from the top with empty rows.
    /// Returns the new board and how many rows were removed.
    #[must_use]
    pub fn cleared(&self) -> (Self, usize) {
        let remaining: Vec<Vec<bool>> = self
            .rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell))
            .cloned()
            .collect();
        let cleared = self.height - remaining.len();

        let mut rows = vec![vec![false; self.width]; cleared];
        rows.extend(remaining);

        (
            Self {
                width: self.width,
                height: self.height,
                rows,
            },
            cleared,
        )
    }
}

#[must_use]
pub fn collide(piece: &Piece, board: &Board) -> bool {
    board.collides(piece)
}

#[must_use]
pub fn merge(piece: &Piece, board: &Board) -> Board {
    board.merged(piece)
}

#[must_use]
pub fn clear_lines(board: &Board) -> (Board, usize) {
    board.cleared()
}

/// Where `piece` would land if dropped straight down. Never stored.
#[must_use]
pub fn ghost_piece(piece: &Piece, board: &Board) -> Piece {
    // An empty piece never collides and a blocked one has nowhere to go
    if piece.cells().next().is_none() || board.collides(piece) {
        return piece.clone();
    }

    let mut ghost = piece.clone();
    loop {
        let lowered = ghost.moved(0, 1);
        if board.collides(&lowered) {
            return ghost;
        }
        ghost = lowered;
    }
}

#[derive(Debug, Resource, Clone, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub fast_drop: bool,
    pub game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            level: STARTING_LEVEL,
            lines_cleared: 0,
            fast_drop: false,
            game_over: false,
        }
    }
}

impl GameState {
    /// Applies the reward for a clear at the current level, then recomputes
    /// the level from the new line total. Returns the points awarded.
    pub fn award_lines(&mut self, cleared: usize) -> u32 {
        if cleared == 0 {
            return 0;
        }

        let points = crate::game::line_clear_reward(cleared).saturating_mul(self.level);
        self.score = self.score.saturating_add(points);
        self.lines_cleared = self
            .lines_cleared
            .saturating_add(u32::try_from(cleared).unwrap_or(u32::MAX));
        self.level = crate::game::level_for_lines(self.lines_cleared);
        points
    }
}

/// The piece currently under player control.
#[derive(Resource, Debug, Clone)]
pub struct ActivePiece(pub Piece);

/// The piece shown in the preview, promoted on the next lock.
#[derive(Resource, Debug, Clone)]
pub struct NextPiece(pub Piece);

/// Source of piece randomness. Seeded for reproducible sequences in tests.
#[derive(Resource, Debug, Clone)]
pub struct PieceRng(pub fastrand::Rng);

impl PieceRng {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    pub fn next_piece(&mut self) -> Piece {
        Piece::random(&mut self.0)
    }
}
