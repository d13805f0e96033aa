use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;

use crate::config::ClimberConfig;
use crate::event::Key;
use crate::games::{Outcome, Simulation};
use crate::ui::Surface;

const GAP_WIDTH: usize = 3;
/// Rows generated beyond the first screen when a session starts
const INITIAL_MARGIN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Platform,
    Empty,
}

impl Tile {
    fn glyph(&self) -> char {
        match self {
            Tile::Wall => '|',
            Tile::Platform => '=',
            Tile::Empty => ' ',
        }
    }
}

/// Vertical climber over an endless, lazily generated tower. Row 0 is the
/// floor and y grows upwards.
#[derive(Debug, Clone)]
pub struct IceClimber {
    config: ClimberConfig,
    world: Vec<Vec<Tile>>,
    player_x: usize,
    player_y: i32,
    best_y: i32,
    scroll: i32,
    jump_remaining: u32,
    /// Empty rows still owed before the next platform row
    next_platform: u32,
    game_over: bool,
    rng: StdRng,
}

impl IceClimber {
    pub fn new(config: ClimberConfig, mut rng: StdRng) -> Self {
        let next_platform = rng.gen_range(1..=2);
        let mut s = Self {
            player_x: config.width / 2,
            player_y: 1,
            best_y: 1,
            scroll: 0,
            jump_remaining: 0,
            next_platform,
            world: Vec::new(),
            game_over: false,
            rng,
            config,
        };
        s.ensure_rows(s.config.visible + INITIAL_MARGIN);
        s
    }

    fn generate_row(&mut self) {
        let width = self.config.width;
        let mut row = vec![Tile::Empty; width + 2];
        row[0] = Tile::Wall;
        row[width + 1] = Tile::Wall;

        if self.world.is_empty() {
            row[1..=width].fill(Tile::Platform);
        } else if self.next_platform > 0 {
            self.next_platform -= 1;
        } else {
            row[1..=width].fill(Tile::Platform);
            // Keep one platform tile against each wall
            let gap = 2 + self.rng.gen_range(0..=width - GAP_WIDTH - 2);
            row[gap..gap + GAP_WIDTH].fill(Tile::Empty);
            self.next_platform = self.rng.gen_range(1..=2);
        }
        self.world.push(row);
    }

    fn ensure_rows(&mut self, count: usize) {
        while self.world.len() < count {
            self.generate_row();
        }
    }

    /// Tile at (x, y), growing the tower as needed.
    pub fn tile(&mut self, x: usize, y: usize) -> Tile {
        self.ensure_rows(y + 1);
        self.world[y][x]
    }

    fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        self.ensure_rows(y + 1);
        self.world[y][x] = tile;
    }

    pub fn on_ground(&mut self) -> bool {
        if self.player_y <= 0 {
            return true;
        }
        self.tile(self.player_x, self.player_y as usize - 1) == Tile::Platform
    }

    pub fn move_horiz(&mut self, dx: i32) {
        let nx = self.player_x as i32 + dx;
        if nx <= 0 || nx > self.config.width as i32 || self.player_y < 0 {
            return;
        }
        if self.tile(nx as usize, self.player_y as usize) == Tile::Empty {
            self.player_x = nx as usize;
        }
    }

    pub fn jump(&mut self) {
        if self.on_ground() {
            self.jump_remaining = self.config.jump_height;
        }
    }

    /// One tick of vertical motion: rise while a jump lasts, smashing through
    /// platform tiles, otherwise fall unless standing on something.
    fn apply_gravity(&mut self) {
        if self.jump_remaining > 0 {
            let ny = (self.player_y + 1) as usize;
            match self.tile(self.player_x, ny) {
                Tile::Empty => self.player_y += 1,
                Tile::Platform => {
                    self.set_tile(self.player_x, ny, Tile::Empty);
                    self.player_y += 1;
                }
                Tile::Wall => self.jump_remaining = 0,
            }
            self.jump_remaining = self.jump_remaining.saturating_sub(1);
        } else if !self.on_ground() {
            self.player_y -= 1;
        }
    }

    fn update_scroll(&mut self) {
        let target = self.player_y - (self.config.visible / 2) as i32;
        if target > self.scroll {
            self.scroll = target;
            self.ensure_rows(self.scroll as usize + self.config.visible);
        }
    }
}

impl Simulation for IceClimber {
    fn title(&self) -> &'static str {
        "Ice Climber"
    }

    fn accent(&self) -> Color {
        Color::Rgb(100, 200, 255)
    }

    fn controls(&self) -> &'static str {
        "←→ Move | ↑ Jump"
    }

    fn handle_input(&mut self, key: Key) {
        if self.game_over {
            return;
        }
        match key {
            Key::Left => self.move_horiz(-1),
            Key::Right => self.move_horiz(1),
            Key::Up | Key::Space => self.jump(),
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.game_over {
            return;
        }
        self.apply_gravity();
        self.best_y = self.best_y.max(self.player_y);
        self.update_scroll();
        if self.player_y < self.scroll {
            debug!("[IceClimber] Fell out of view at row {}", self.player_y);
            self.game_over = true;
        }
    }

    fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    fn outcome(&self) -> Option<Outcome> {
        self.game_over.then_some(Outcome::GameOver)
    }

    fn score(&self) -> u32 {
        (self.best_y - 1).max(0) as u32
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let visible = self.config.visible as i32;
        let frame_style = Style::default().fg(Color::Rgb(60, 100, 140));
        let horizontal = format!("+{}+", "-".repeat(self.config.width));
        surface.put(0, 0, &horizontal, frame_style);
        surface.put(visible as u16 + 1, 0, &horizontal, frame_style);

        let ice = Style::default().fg(Color::Rgb(180, 230, 255));
        for i in 0..visible {
            let idx = self.scroll + visible - 1 - i;
            let Some(row) = self.world.get(idx as usize) else { continue };
            let text: String = row.iter().map(Tile::glyph).collect();
            surface.put(i as u16 + 1, 0, &text, ice);
        }

        let sy = self.scroll + visible - self.player_y;
        if (1..=visible).contains(&sy) {
            surface.put(
                sy as u16,
                self.player_x as u16,
                "@",
                Style::default().fg(Color::Rgb(255, 120, 200)).add_modifier(Modifier::BOLD),
            );
        }
    }
}
