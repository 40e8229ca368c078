#![warn(clippy::all, clippy::pedantic)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Everything the keyboard can ask the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    FastDrop(bool),
    Restart,
    Quit,
}

/// Maps a raw key event to a game command. Unbound keys yield `None`.
#[must_use]
pub fn map_key_event(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return match key.code {
            KeyCode::Down => Some(Command::FastDrop(false)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Up => Some(Command::Rotate),
        KeyCode::Down => Some(Command::FastDrop(true)),
        KeyCode::Enter => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        _ => None,
    }
}
