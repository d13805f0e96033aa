use std::io;
use std::time::{Duration, Instant};

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::config::ArcadeConfig;
use crate::event::{Key, KeySource};
use crate::games::ice_climber::IceClimber;
use crate::games::snake::Snake;
use crate::games::space_invaders::SpaceInvaders;
use crate::games::tetris::Tetris;
use crate::games::{Outcome, Simulation};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Tetris,
    Snake,
    SpaceInvaders,
    IceClimber,
    Quit,
}

impl MenuChoice {
    pub fn all() -> &'static [MenuChoice] {
        &[
            MenuChoice::Tetris,
            MenuChoice::Snake,
            MenuChoice::SpaceInvaders,
            MenuChoice::IceClimber,
            MenuChoice::Quit,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Tetris => "Play Tetris",
            MenuChoice::Snake => "Play Snake",
            MenuChoice::SpaceInvaders => "Play Space Invaders",
            MenuChoice::IceClimber => "Play Ice Climber",
            MenuChoice::Quit => "Quit",
        }
    }
}

#[derive(Debug, Default)]
pub struct Menu {
    pub selected: usize,
}

impl Menu {
    /// Moves the highlight or returns the confirmed choice.
    pub fn handle_key(&mut self, key: Key) -> Option<MenuChoice> {
        let options = MenuChoice::all();
        match key {
            Key::Up | Key::Char('k') => {
                self.selected = (self.selected + options.len() - 1) % options.len();
                None
            }
            Key::Down | Key::Char('j') => {
                self.selected = (self.selected + 1) % options.len();
                None
            }
            Key::Enter => Some(options[self.selected]),
            Key::Interrupt => Some(MenuChoice::Quit),
            k if k.is_quit() => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Player pressed the quit key mid-game
    Quit,
    /// Game reached a terminal state and the player acknowledged it
    Finished(Outcome),
    /// Ctrl+C; leave the arcade altogether
    Interrupted,
}

/// Runs one simulation until it ends or the player leaves.
///
/// Each frame waits at most `frame` for input, drains every pending key,
/// ticks the simulation when its interval has elapsed and redraws.
pub fn play<B, K, S>(
    terminal: &mut Terminal<B>,
    keys: &mut K,
    sim: &mut S,
    frame: Duration,
) -> io::Result<SessionEnd>
where
    B: Backend,
    K: KeySource,
    S: Simulation,
{
    let mut last_tick = Instant::now();
    let mut paused = false;

    loop {
        terminal.draw(|f| ui::render_session(f, sim, paused))?;

        if let Some(outcome) = sim.outcome() {
            return wait_for_ack(keys, frame, outcome);
        }

        let mut next = keys.poll_key(frame)?;
        while let Some(key) = next {
            match key {
                Key::Interrupt => return Ok(SessionEnd::Interrupted),
                Key::Esc => return Ok(SessionEnd::Quit),
                k if k.is_quit() => return Ok(SessionEnd::Quit),
                Key::Char('p') | Key::Char('P') => {
                    paused = !paused;
                    // Resume with a full interval ahead
                    if !paused {
                        last_tick = Instant::now();
                    }
                }
                k if !paused => sim.handle_input(k),
                _ => {}
            }
            next = keys.poll_key(Duration::ZERO)?;
        }

        if !paused && last_tick.elapsed() >= sim.tick_interval() {
            sim.tick();
            last_tick = Instant::now();
        }
    }
}

fn wait_for_ack<K: KeySource>(keys: &mut K, frame: Duration, outcome: Outcome) -> io::Result<SessionEnd> {
    loop {
        match keys.poll_key(frame)? {
            Some(Key::Interrupt) => return Ok(SessionEnd::Interrupted),
            Some(_) => return Ok(SessionEnd::Finished(outcome)),
            None => {}
        }
    }
}

pub struct App {
    config: ArcadeConfig,
    menu: Menu,
}

impl App {
    pub fn new(config: ArcadeConfig) -> Self {
        Self { config, menu: Menu::default() }
    }

    /// Menu, game, menu, ... until the player picks Quit.
    pub fn run<B: Backend, K: KeySource>(&mut self, terminal: &mut Terminal<B>, keys: &mut K) -> io::Result<()> {
        loop {
            let choice = self.choose(terminal, keys)?;
            info!("[Menu] Selected {:?}", choice);
            let frame = self.config.frame();
            let end = match choice {
                MenuChoice::Quit => break,
                MenuChoice::Tetris => {
                    let mut game = Tetris::new(self.config.tetris.clone(), StdRng::from_entropy());
                    Self::session(terminal, keys, &mut game, frame)?
                }
                MenuChoice::Snake => {
                    let mut game = Snake::new(self.config.snake.clone(), StdRng::from_entropy());
                    Self::session(terminal, keys, &mut game, frame)?
                }
                MenuChoice::SpaceInvaders => {
                    let mut game = SpaceInvaders::new(self.config.invaders.clone());
                    Self::session(terminal, keys, &mut game, frame)?
                }
                MenuChoice::IceClimber => {
                    let mut game = IceClimber::new(self.config.climber.clone(), StdRng::from_entropy());
                    Self::session(terminal, keys, &mut game, frame)?
                }
            };
            if end == SessionEnd::Interrupted {
                break;
            }
            terminal.clear()?;
        }
        info!("[Menu] Leaving the arcade");
        Ok(())
    }

    fn session<B: Backend, K: KeySource, S: Simulation>(
        terminal: &mut Terminal<B>,
        keys: &mut K,
        game: &mut S,
        frame: Duration,
    ) -> io::Result<SessionEnd> {
        terminal.clear()?;
        info!("[{}] Session started", game.title());
        let end = play(terminal, keys, game, frame)?;
        info!("[{}] Session ended: {:?}, score {}", game.title(), end, game.score());
        Ok(end)
    }

    fn choose<B: Backend, K: KeySource>(&mut self, terminal: &mut Terminal<B>, keys: &mut K) -> io::Result<MenuChoice> {
        loop {
            terminal.draw(|f| ui::menu::render_menu(f, &self.menu))?;
            if let Some(key) = keys.poll_key(self.config.frame())? {
                if let Some(choice) = self.menu.handle_key(key) {
                    return Ok(choice);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::testing::ScriptedKeys;
    use crate::ui::Surface;
    use ratatui::backend::TestBackend;
    use ratatui::style::{Color, Style};

    /// Counts ticks and inputs; ends itself after `limit` ticks.
    struct Counter {
        ticks: u32,
        inputs: Vec<Key>,
        limit: Option<u32>,
        interval: Duration,
    }

    impl Counter {
        fn new(limit: Option<u32>) -> Self {
            Self { ticks: 0, inputs: Vec::new(), limit, interval: Duration::ZERO }
        }
    }

    impl Simulation for Counter {
        fn title(&self) -> &'static str {
            "Counter"
        }
        fn accent(&self) -> Color {
            Color::White
        }
        fn controls(&self) -> &'static str {
            ""
        }
        fn handle_input(&mut self, key: Key) {
            self.inputs.push(key);
        }
        fn tick(&mut self) {
            self.ticks += 1;
        }
        fn tick_interval(&self) -> Duration {
            self.interval
        }
        fn outcome(&self) -> Option<Outcome> {
            match self.limit {
                Some(limit) if self.ticks >= limit => Some(Outcome::Won),
                _ => None,
            }
        }
        fn score(&self) -> u32 {
            self.ticks
        }
        fn draw(&self, surface: &mut dyn Surface) {
            surface.put(0, 0, &format!("ticks={}", self.ticks), Style::default());
        }
    }

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(80, 40)).unwrap()
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn menu_wraps_both_ways() {
        let mut menu = Menu::default();
        assert_eq!(menu.handle_key(Key::Up), None);
        assert_eq!(menu.selected, 4);
        assert_eq!(menu.handle_key(Key::Char('j')), None);
        assert_eq!(menu.selected, 0);
        menu.handle_key(Key::Down);
        menu.handle_key(Key::Char('j'));
        assert_eq!(menu.handle_key(Key::Enter), Some(MenuChoice::SpaceInvaders));
        menu.handle_key(Key::Char('k'));
        assert_eq!(menu.handle_key(Key::Enter), Some(MenuChoice::Snake));
    }

    #[test]
    fn q_in_menu_means_quit() {
        let mut menu = Menu { selected: 2 };
        assert_eq!(menu.handle_key(Key::Char('q')), Some(MenuChoice::Quit));
        assert_eq!(menu.handle_key(Key::Space), None);
    }

    #[test]
    fn play_ticks_and_forwards_input() {
        let mut term = terminal();
        let mut keys = ScriptedKeys::new([Some(Key::Left), None, None]);
        let mut sim = Counter::new(None);
        let end = play(&mut term, &mut keys, &mut sim, Duration::ZERO).unwrap();
        assert_eq!(end, SessionEnd::Quit);
        assert_eq!(sim.inputs, vec![Key::Left]);
        assert_eq!(sim.ticks, 2);
        assert!(screen(&term).contains("ticks=2"));
    }

    #[test]
    fn pause_stops_ticks_and_input() {
        let mut term = terminal();
        let mut keys = ScriptedKeys::new([Some(Key::Char('p')), None, Some(Key::Right), None]);
        let mut sim = Counter::new(None);
        let end = play(&mut term, &mut keys, &mut sim, Duration::ZERO).unwrap();
        assert_eq!(end, SessionEnd::Quit);
        assert_eq!(sim.ticks, 0);
        assert!(sim.inputs.is_empty());
        assert!(screen(&term).contains("PAUSED"));
    }

    #[test]
    fn resuming_waits_a_full_interval_before_ticking() {
        let mut term = terminal();
        let p = Some(Key::Char('p'));
        // Pause, sit paused for three empty frames, resume, then quit
        let mut keys = ScriptedKeys::new([p, None, None, None, None, p, None]).waiting();
        let mut sim = Counter::new(None);
        sim.interval = Duration::from_millis(40);
        let end = play(&mut term, &mut keys, &mut sim, Duration::from_millis(20)).unwrap();
        assert_eq!(end, SessionEnd::Quit);
        assert_eq!(sim.ticks, 0);
    }

    #[test]
    fn finished_game_waits_for_a_key() {
        let mut term = terminal();
        let mut keys = ScriptedKeys::new([None, None, None, None, Some(Key::Space)]);
        let mut sim = Counter::new(Some(1));
        let end = play(&mut term, &mut keys, &mut sim, Duration::ZERO).unwrap();
        assert_eq!(end, SessionEnd::Finished(Outcome::Won));
        assert_eq!(sim.ticks, 1);
        assert_eq!(keys.polls, 5);
        assert!(screen(&term).contains("YOU WIN"));
    }

    #[test]
    fn interrupt_leaves_the_session() {
        let mut term = terminal();
        let mut keys = ScriptedKeys::keys(&[Key::Interrupt]);
        let mut sim = Counter::new(None);
        let end = play(&mut term, &mut keys, &mut sim, Duration::ZERO).unwrap();
        assert_eq!(end, SessionEnd::Interrupted);
    }

    #[test]
    fn app_runs_a_game_and_returns_to_menu() {
        let mut term = terminal();
        // Pick Snake, leave it with q, then q again quits the menu
        let mut keys = ScriptedKeys::keys(&[Key::Down, Key::Enter, Key::Char('q')]);
        let mut app = App::new(ArcadeConfig::default());
        app.run(&mut term, &mut keys).unwrap();
        assert_eq!(app.menu.selected, 1);
        assert!(screen(&term).contains("Play Tetris"));
    }

    #[test]
    fn interrupt_in_game_exits_the_app() {
        let mut term = terminal();
        let mut keys = ScriptedKeys::keys(&[Key::Enter, Key::Interrupt]);
        let mut app = App::new(ArcadeConfig::default());
        app.run(&mut term, &mut keys).unwrap();
        assert!(screen(&term).contains("Tetris"));
    }
}
