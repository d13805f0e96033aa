pub mod ice_climber;
pub mod snake;
pub mod space_invaders;
pub mod tetris;

use std::time::Duration;

use ratatui::style::Color;

use crate::event::Key;
use crate::ui::Surface;

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Won,
}

/// One mini-game. The session driver owns timing and input polling; a
/// simulation only reacts to keys and to ticks.
pub trait Simulation {
    fn title(&self) -> &'static str;
    fn accent(&self) -> Color;
    /// Short key legend for the help bar
    fn controls(&self) -> &'static str;

    fn handle_input(&mut self, key: Key);
    /// Advances the game by one step, ignoring wall-clock time.
    fn tick(&mut self);
    /// Time that must elapse between two ticks. May change as the game evolves.
    fn tick_interval(&self) -> Duration;

    fn outcome(&self) -> Option<Outcome>;
    fn score(&self) -> u32;
    fn draw(&self, surface: &mut dyn Surface);

    fn is_over(&self) -> bool {
        self.outcome().is_some()
    }
}
