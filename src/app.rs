#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info};
use std::time::Instant;

use crate::components::{ActivePiece, Board, GameState, NextPiece, Piece, PieceRng};
use crate::config::Config;
use crate::input::Command;
use crate::systems::{
    TickOutcome, fast_drop_system, ghost_system, move_system, rotate_system, start_session,
    tick_system,
};
use crate::{DropSchedule, DropTimer};

pub type AppResult<T> = anyhow::Result<T>;

/// The game engine: one session held in a `World`, plus the drop timer that drives it.
///
/// Every command takes `&mut self`, so commands and ticks never interleave.
pub struct App {
    pub world: World,
    pub config: Config,
    pub should_quit: bool,
    timer: DropTimer,
    key_release_supported: bool,
    fast_drop_deadline: Option<Instant>,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut config = Config::default();
        config.game.seed = Some(seed);
        Self::with_config(config)
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let rng = match config.game.seed {
            Some(seed) => PieceRng::with_seed(seed),
            None => PieceRng(fastrand::Rng::new()),
        };

        let mut world = World::new();
        world.insert_resource(rng);
        start_session(&mut world);

        Self {
            world,
            config,
            should_quit: false,
            timer: DropTimer::new(),
            key_release_supported: true,
            fast_drop_deadline: None,
        }
    }

    pub fn move_left(&mut self) -> bool {
        move_system(&mut self.world, -1)
    }

    pub fn move_right(&mut self) -> bool {
        move_system(&mut self.world, 1)
    }

    pub fn rotate_piece(&mut self) -> bool {
        rotate_system(&mut self.world)
    }

    pub fn set_fast_drop(&mut self, enabled: bool) {
        fast_drop_system(&mut self.world, enabled);
    }

    pub fn tick(&mut self) -> TickOutcome {
        tick_system(&mut self.world)
    }

    /// Throws away the session and starts a fresh one. The piece RNG carries on.
    pub fn restart(&mut self) {
        info!("Restarting game");
        start_session(&mut self.world);
        self.timer.cancel();
        self.fast_drop_deadline = None;
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.world.resource::<Board>()
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.world.resource::<ActivePiece>().0
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.world.resource::<NextPiece>().0
    }

    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        ghost_system(&self.world)
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.game_state().score
    }

    #[must_use]
    pub fn lines(&self) -> u32 {
        self.game_state().lines_cleared
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.game_state().level
    }

    #[must_use]
    pub fn is_fast_drop(&self) -> bool {
        self.game_state().fast_drop
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_state().game_over
    }

    #[must_use]
    pub fn drop_schedule(&self) -> DropSchedule {
        let game_state = self.game_state();
        DropSchedule {
            level: game_state.level,
            fast_drop: game_state.fast_drop,
            game_over: game_state.game_over,
        }
    }

    #[must_use]
    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    /// Terminals without key release reporting never send Down-released, so
    /// fast drop then expires on its own.
    pub fn set_key_release_supported(&mut self, supported: bool) {
        self.key_release_supported = supported;
    }

    pub fn handle_command(&mut self, command: Command, now: Instant) {
        match command {
            Command::MoveLeft => {
                self.move_left();
            }
            Command::MoveRight => {
                self.move_right();
            }
            Command::Rotate => {
                self.rotate_piece();
            }
            Command::FastDrop(enabled) => {
                self.set_fast_drop(enabled);
                self.fast_drop_deadline = if enabled && !self.key_release_supported {
                    Some(now + self.config.controls.fast_drop_release())
                } else {
                    None
                };
            }
            Command::Restart => {
                if self.is_game_over() {
                    self.restart();
                } else {
                    debug!("Ignoring restart while the game is running");
                }
            }
            Command::Quit => self.should_quit = true,
        }

        self.timer.sync(self.drop_schedule(), now);
    }

    /// Advances time to `now`: expires a held fast drop and runs the drop
    /// timer. Returns the tick outcome when the timer fired.
    pub fn update(&mut self, now: Instant) -> Option<TickOutcome> {
        if let Some(deadline) = self.fast_drop_deadline {
            if now >= deadline {
                self.fast_drop_deadline = None;
                self.set_fast_drop(false);
            }
        }

        self.timer.sync(self.drop_schedule(), now);
        if !self.timer.poll(now) {
            return None;
        }

        let outcome = self.tick();
        self.timer.sync(self.drop_schedule(), now);
        Some(outcome)
    }

    /// The earliest instant at which `update` has work to do.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.timer.next_deadline(), self.fast_drop_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
