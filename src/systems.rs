use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{ActivePiece, Board, GameState, NextPiece, Piece, PieceRng, ghost_piece};

/// What a single call to [`tick_system`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is over; nothing happened.
    Idle,
    /// The active piece moved down one row.
    Fell,
    /// The active piece locked and the next one spawned cleanly.
    Locked { cleared: usize },
    /// The active piece locked but the next one could not be placed.
    GameOver { cleared: usize },
}

/// Resets every session resource and draws the first two pieces.
pub fn start_session(world: &mut World) {
    let (current, next) = {
        let mut rng = world.resource_mut::<PieceRng>();
        (rng.next_piece(), rng.next_piece())
    };

    debug!(
        "Starting session with {} (next {})",
        current.kind.name(),
        next.kind.name()
    );

    world.insert_resource(Board::new());
    world.insert_resource(GameState::default());
    world.insert_resource(ActivePiece(current));
    world.insert_resource(NextPiece(next));
}

fn is_game_over(world: &World) -> bool {
    world.resource::<GameState>().game_over
}

/// Replaces the active piece with `candidate` unless it collides.
fn try_replace_active(world: &mut World, candidate: Piece) -> bool {
    if world.resource::<Board>().collides(&candidate) {
        return false;
    }
    world.resource_mut::<ActivePiece>().0 = candidate;
    true
}

/// Shifts the active piece horizontally. Returns whether it moved.
pub fn move_system(world: &mut World, dx: i32) -> bool {
    if is_game_over(world) {
        return false;
    }

    let candidate = world.resource::<ActivePiece>().0.moved(dx, 0);
    let moved = try_replace_active(world, candidate);
    if !moved {
        debug!("Rejected horizontal move by {dx}");
    }
    moved
}

/// Rotates the active piece in place. No kicks: a colliding rotation is refused.
pub fn rotate_system(world: &mut World) -> bool {
    if is_game_over(world) {
        return false;
    }

    let candidate = world.resource::<ActivePiece>().0.rotated();
    let rotated = try_replace_active(world, candidate);
    if !rotated {
        debug!("Rejected rotation");
    }
    rotated
}

pub fn fast_drop_system(world: &mut World, enabled: bool) {
    if is_game_over(world) {
        return;
    }

    let mut game_state = world.resource_mut::<GameState>();
    if game_state.fast_drop != enabled {
        debug!("Fast drop {}", if enabled { "on" } else { "off" });
        game_state.fast_drop = enabled;
    }
}

/// One step of automatic descent. Locks the piece when it cannot fall further.
pub fn tick_system(world: &mut World) -> TickOutcome {
    if is_game_over(world) {
        return TickOutcome::Idle;
    }

    let piece = world.resource::<ActivePiece>().0.clone();
    let lowered = piece.moved(0, 1);

    if try_replace_active(world, lowered) {
        trace!("Piece fell to ({}, {})", piece.x, piece.y + 1);
        return TickOutcome::Fell;
    }

    lock_piece(world, &piece)
}

// Merge, clear, score, then spawn. The spawn check sees the post-clear board.
fn lock_piece(world: &mut World, piece: &Piece) -> TickOutcome {
    info!(
        "Locking {} piece at ({}, {})",
        piece.kind.name(),
        piece.x,
        piece.y
    );

    let (board, cleared) = world.resource::<Board>().merged(piece).cleared();
    world.insert_resource(board);

    if cleared > 0 {
        let mut game_state = world.resource_mut::<GameState>();
        let previous_level = game_state.level;
        let points = game_state.award_lines(cleared);
        info!(
            "Cleared {cleared} lines for {points} points (score {}, lines {})",
            game_state.score, game_state.lines_cleared
        );
        if game_state.level > previous_level {
            info!("Level up: {}", game_state.level);
        }
    }

    let spawned = world.resource::<NextPiece>().0.at_spawn();
    let upcoming = world.resource_mut::<PieceRng>().next_piece();
    world.resource_mut::<NextPiece>().0 = upcoming;

    let blocked = world.resource::<Board>().collides(&spawned);
    world.resource_mut::<ActivePiece>().0 = spawned;

    if blocked {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.game_over = true;
        info!("Game over with score {}", game_state.score);
        return TickOutcome::GameOver { cleared };
    }

    TickOutcome::Locked { cleared }
}

/// Landing projection of the active piece.
#[must_use]
pub fn ghost_system(world: &World) -> Piece {
    ghost_piece(
        &world.resource::<ActivePiece>().0,
        world.resource::<Board>(),
    )
}
