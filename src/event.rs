use std::io;
use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Keys the arcade reacts to. Everything else is dropped at the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Char(char),
    /// Ctrl+C, always leaves the program
    Interrupt,
}

impl Key {
    pub fn from_event(key: KeyEvent) -> Option<Key> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Key::Interrupt);
        }
        match key.code {
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(c) => Some(Key::Char(c)),
            _ => None,
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Key::Char('q') | Key::Char('Q'))
    }
}

/// Non-blocking keyboard input.
pub trait KeySource {
    /// Waits at most `timeout` for a key press. `Ok(None)` means nothing was pending.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            event::Event::Key(key) => Ok(Key::from_event(key)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// Replays a fixed key script, one key per poll. Once exhausted it keeps
    /// answering `q` so loops under test always terminate.
    pub struct ScriptedKeys {
        keys: VecDeque<Option<Key>>,
        /// Sleep for the whole timeout on an empty poll, like a real terminal
        wait: bool,
        pub polls: usize,
    }

    impl ScriptedKeys {
        pub fn new(keys: impl IntoIterator<Item = Option<Key>>) -> Self {
            Self { keys: keys.into_iter().collect(), wait: false, polls: 0 }
        }

        pub fn waiting(mut self) -> Self {
            self.wait = true;
            self
        }

        pub fn keys(keys: &[Key]) -> Self {
            Self::new(keys.iter().copied().map(Some))
        }
    }

    impl KeySource for ScriptedKeys {
        fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
            self.polls += 1;
            let key = self.keys.pop_front().unwrap_or(Some(Key::Char('q')));
            if key.is_none() && self.wait {
                std::thread::sleep(timeout);
            }
            Ok(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_arrows_and_space() {
        assert_eq!(Key::from_event(press(KeyCode::Up, KeyModifiers::NONE)), Some(Key::Up));
        assert_eq!(Key::from_event(press(KeyCode::Char(' '), KeyModifiers::NONE)), Some(Key::Space));
        assert_eq!(Key::from_event(press(KeyCode::Char('j'), KeyModifiers::NONE)), Some(Key::Char('j')));
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        assert_eq!(
            Key::from_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Key::Interrupt)
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut ev = press(KeyCode::Left, KeyModifiers::NONE);
        ev.kind = KeyEventKind::Release;
        assert_eq!(Key::from_event(ev), None);
    }

    #[test]
    fn quit_key() {
        assert!(Key::Char('q').is_quit());
        assert!(Key::Char('Q').is_quit());
        assert!(!Key::Esc.is_quit());
    }
}
