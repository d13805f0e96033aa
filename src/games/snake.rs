use std::collections::VecDeque;
use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::prelude::*;

use crate::config::SnakeConfig;
use crate::event::Key;
use crate::games::{Outcome, Simulation};
use crate::ui::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    fn is_vertical(&self) -> bool {
        matches!(self, Dir::Up | Dir::Down)
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    config: SnakeConfig,
    body: VecDeque<Pos>,
    dir: Dir,
    food: Option<Pos>,
    score: u32,
    outcome: Option<Outcome>,
    rng: StdRng,
}

impl Snake {
    pub fn new(config: SnakeConfig, rng: StdRng) -> Self {
        let start = Pos { x: config.width / 2, y: config.height / 2 };
        let mut snake = Self {
            config,
            body: VecDeque::from([start]),
            dir: Dir::Right,
            food: None,
            score: 0,
            outcome: None,
            rng,
        };
        snake.food = snake.place_food();
        snake
    }

    pub fn head(&self) -> Pos {
        self.body[0]
    }

    fn in_interior(&self, p: Pos) -> bool {
        p.x >= 1 && p.x <= self.config.width - 2 && p.y >= 1 && p.y <= self.config.height - 2
    }

    fn interior_cells(&self) -> usize {
        ((self.config.width - 2) * (self.config.height - 2)) as usize
    }

    /// Picks a free interior cell uniformly. Rejection sampling first, bounded
    /// by the interior size; a crowded board falls back to listing free cells.
    fn place_food(&mut self) -> Option<Pos> {
        for _ in 0..self.interior_cells() {
            let p = Pos {
                x: self.rng.gen_range(1..=self.config.width - 2),
                y: self.rng.gen_range(1..=self.config.height - 2),
            };
            if !self.body.contains(&p) {
                return Some(p);
            }
        }
        let free: Vec<Pos> = (1..=self.config.height - 2)
            .flat_map(|y| (1..=self.config.width - 2).map(move |x| Pos { x, y }))
            .filter(|p| !self.body.contains(p))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    /// Requests a new heading. Reversing straight into the neck is ignored.
    pub fn change_dir(&mut self, dir: Dir) {
        if dir != self.dir.opposite() {
            self.dir = dir;
        }
    }

    fn step(&mut self) {
        let head = self.head();
        let (dx, dy) = self.dir.delta();
        let next = Pos { x: head.x + dx, y: head.y + dy };
        if self.body.contains(&next) || !self.in_interior(next) {
            debug!("[Snake] Crashed at ({}, {}) with length {}", next.x, next.y, self.body.len());
            self.outcome = Some(Outcome::GameOver);
            return;
        }
        self.body.push_front(next);
        if Some(next) == self.food {
            self.score += 1;
            self.food = self.place_food();
            debug!("[Snake] Ate food, length {}, next food {:?}", self.body.len(), self.food);
            if self.food.is_none() {
                self.outcome = Some(Outcome::Won);
            }
        } else {
            self.body.pop_back();
        }
    }
}

impl Simulation for Snake {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn accent(&self) -> Color {
        Color::Rgb(80, 220, 80)
    }

    fn controls(&self) -> &'static str {
        "↑↓←→ Steer"
    }

    fn handle_input(&mut self, key: Key) {
        if self.outcome.is_some() {
            return;
        }
        match key {
            Key::Up => self.change_dir(Dir::Up),
            Key::Down => self.change_dir(Dir::Down),
            Key::Left => self.change_dir(Dir::Left),
            Key::Right => self.change_dir(Dir::Right),
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.outcome.is_none() {
            self.step();
        }
    }

    fn tick_interval(&self) -> Duration {
        if self.dir.is_vertical() {
            self.config.vertical_interval()
        } else {
            self.config.horizontal_interval()
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let border = Style::default().fg(Color::Rgb(60, 60, 80));
        let w = self.config.width as u16;
        let h = self.config.height as u16;
        let horizontal = "-".repeat(self.config.width as usize);
        surface.put(0, 0, &horizontal, border);
        surface.put(h - 1, 0, &horizontal, border);
        for y in 1..h - 1 {
            surface.put(y, 0, "|", border);
            surface.put(y, w - 1, "|", border);
        }

        if let Some(food) = self.food {
            surface.put(food.y as u16, food.x as u16, "*", Style::default().fg(Color::Rgb(255, 80, 80)));
        }
        for (i, seg) in self.body.iter().enumerate() {
            let (ch, style) = if i == 0 {
                ("@", Style::default().fg(Color::Rgb(120, 255, 120)).add_modifier(Modifier::BOLD))
            } else {
                ("o", Style::default().fg(Color::Rgb(80, 200, 80)))
            };
            if seg.x >= 0 && seg.y >= 0 {
                surface.put(seg.y as u16, seg.x as u16, ch, style);
            }
        }
    }
}
