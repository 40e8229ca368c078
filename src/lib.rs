pub mod app;
pub mod components;
pub mod config;
pub mod game;
pub mod input;
pub mod shapes;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

/// The inputs that decide how fast pieces fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSchedule {
    pub level: u32,
    pub fast_drop: bool,
    pub game_over: bool,
}

impl DropSchedule {
    /// `None` once the game is over: the timer stops.
    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        if self.game_over {
            None
        } else {
            Some(game::drop_period(self.level, self.fast_drop))
        }
    }
}

/// The single periodic auto-drop timer.
///
/// Rescheduling cancels the pending fire. Deadlines are absolute instants,
/// so a late poll never replays missed ticks.
#[derive(Debug, Clone, Default)]
pub struct DropTimer {
    schedule: Option<DropSchedule>,
    next_fire: Option<Instant>,
}

impl DropTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reschedules from `now` if `schedule` differs from the active one.
    /// Returns true when a reschedule happened.
    pub fn sync(&mut self, schedule: DropSchedule, now: Instant) -> bool {
        if self.schedule == Some(schedule) {
            return false;
        }

        self.schedule = Some(schedule);
        self.next_fire = schedule.period().map(|period| now + period);
        log::debug!(
            "Drop timer rescheduled: {:?} (level {}, fast {}, over {})",
            schedule.period(),
            schedule.level,
            schedule.fast_drop,
            schedule.game_over
        );
        true
    }

    /// Forgets the schedule so the next `sync` always restarts the timer.
    pub fn cancel(&mut self) {
        self.schedule = None;
        self.next_fire = None;
    }

    /// Fires at most once per call.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(next_fire), Some(period)) =
            (self.next_fire, self.schedule.and_then(|s| s.period()))
        else {
            return false;
        };

        if now < next_fire {
            return false;
        }

        let mut following = next_fire + period;
        if following <= now {
            following = now + period;
        }
        self.next_fire = Some(following);
        true
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_fire
    }

    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.schedule.and_then(|s| s.period())
    }
}
