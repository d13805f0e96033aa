use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;

use crate::config::TetrisConfig;
use crate::event::Key;
use crate::games::{Outcome, Simulation};
use crate::ui::Surface;

const POINTS_PER_LINE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Rgb(80, 220, 255),
            PieceKind::O => Color::Rgb(255, 220, 80),
            PieceKind::T => Color::Rgb(200, 120, 255),
            PieceKind::S => Color::Rgb(80, 220, 80),
            PieceKind::Z => Color::Rgb(220, 80, 80),
            PieceKind::J => Color::Rgb(80, 120, 255),
            PieceKind::L => Color::Rgb(255, 160, 60),
        }
    }

    pub fn offsets(&self, rotation: usize) -> &'static [(i32, i32); 4] {
        &SHAPES[*self as usize][rotation % 4]
    }
}

/// Cell offsets per kind (in `PieceKind::ALL` order) and rotation.
static SHAPES: [[[(i32, i32); 4]; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Filled(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    fn spawn(kind: PieceKind, board_width: usize) -> Self {
        Self { kind, rotation: 0, x: board_width as i32 / 2 - 2, y: 0 }
    }

    /// Board cells covered by this piece after rotating to `rotation` and shifting by (dx, dy).
    pub fn cells_at(&self, rotation: usize, dx: i32, dy: i32) -> [(i32, i32); 4] {
        self.kind
            .offsets(rotation)
            .map(|(ox, oy)| (self.x + ox + dx, self.y + oy + dy))
    }

    pub fn cells(&self) -> [(i32, i32); 4] {
        self.cells_at(self.rotation, 0, 0)
    }
}

/// `Locking` only exists inside `lock_piece`; outside callers never observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    Locking,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Tetris {
    config: TetrisConfig,
    board: Vec<Vec<Cell>>,
    current: Piece,
    score: u32,
    lines: u32,
    phase: Phase,
    rng: StdRng,
}

impl Tetris {
    pub fn new(config: TetrisConfig, mut rng: StdRng) -> Self {
        let board = vec![vec![Cell::Empty; config.width]; config.height];
        let kind = PieceKind::ALL[rng.gen_range(0..PieceKind::ALL.len())];
        let current = Piece::spawn(kind, config.width);
        Self {
            config,
            board,
            current,
            score: 0,
            lines: 0,
            phase: Phase::Falling,
            rng,
        }
    }

    fn width(&self) -> i32 {
        self.config.width as i32
    }

    fn height(&self) -> i32 {
        self.config.height as i32
    }

    /// True when any cell is outside the walls, below the floor or on a filled
    /// cell. Cells above the board never collide.
    pub fn collides(&self, cells: &[(i32, i32)]) -> bool {
        cells.iter().any(|&(x, y)| {
            if x < 0 || x >= self.width() || y >= self.height() {
                return true;
            }
            y >= 0 && self.board[y as usize][x as usize] != Cell::Empty
        })
    }

    /// Moves the active piece if the destination is free.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let cells = self.current.cells_at(self.current.rotation, dx, dy);
        if self.collides(&cells) {
            return false;
        }
        self.current.x += dx;
        self.current.y += dy;
        true
    }

    /// Rotates clockwise in place. No wall kicks: a blocked rotation is dropped.
    pub fn rotate(&mut self) -> bool {
        let next = (self.current.rotation + 1) % 4;
        if self.collides(&self.current.cells_at(next, 0, 0)) {
            return false;
        }
        self.current.rotation = next;
        true
    }

    fn drop_or_lock(&mut self) {
        if !self.try_move(0, 1) {
            self.lock_piece();
        }
    }

    fn lock_piece(&mut self) {
        self.phase = Phase::Locking;
        let kind = self.current.kind;
        for (x, y) in self.current.cells() {
            if (0..self.height()).contains(&y) && (0..self.width()).contains(&x) {
                self.board[y as usize][x as usize] = Cell::Filled(kind);
            }
        }
        self.clear_lines();
        self.spawn_piece();
    }

    fn spawn_piece(&mut self) {
        let kind = PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())];
        self.current = Piece::spawn(kind, self.config.width);
        self.phase = if self.collides(&self.current.cells()) {
            debug!("[Tetris] Spawn blocked, game over at score {}", self.score);
            Phase::GameOver
        } else {
            Phase::Falling
        };
    }

    /// Removes every full row, refills from the top and scores 100 per row.
    /// Returns how many rows went away.
    pub fn clear_lines(&mut self) -> usize {
        let width = self.config.width;
        self.board.retain(|row| row.iter().any(|c| *c == Cell::Empty));
        let cleared = self.config.height - self.board.len();
        for _ in 0..cleared {
            self.board.insert(0, vec![Cell::Empty; width]);
        }
        if cleared > 0 {
            self.score += POINTS_PER_LINE * cleared as u32;
            self.lines += cleared as u32;
            debug!("[Tetris] Cleared {} line(s), score {}", cleared, self.score);
        }
        cleared
    }

    fn put_cell(surface: &mut dyn Surface, x: i32, y: i32, style: Style) {
        if y < 0 || x < 0 {
            return;
        }
        surface.put(y as u16 + 1, x as u16 * 2 + 1, "[]", style);
    }
}

impl Simulation for Tetris {
    fn title(&self) -> &'static str {
        "Tetris"
    }

    fn accent(&self) -> Color {
        Color::Rgb(200, 120, 255)
    }

    fn controls(&self) -> &'static str {
        "←→ Move | ↓ Drop | ↑ Rotate"
    }

    fn handle_input(&mut self, key: Key) {
        if self.phase == Phase::GameOver {
            return;
        }
        match key {
            Key::Left => {
                self.try_move(-1, 0);
            }
            Key::Right => {
                self.try_move(1, 0);
            }
            Key::Down => self.drop_or_lock(),
            Key::Up => {
                self.rotate();
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.drop_or_lock();
    }

    fn tick_interval(&self) -> Duration {
        self.config.drop_interval()
    }

    fn outcome(&self) -> Option<Outcome> {
        (self.phase == Phase::GameOver).then_some(Outcome::GameOver)
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let border = Style::default().fg(Color::Rgb(60, 60, 80));
        let w = self.config.width as u16;
        let h = self.config.height as u16;
        let horizontal = "-".repeat(self.config.width * 2);
        surface.put(0, 1, &horizontal, border);
        surface.put(h + 1, 1, &horizontal, border);
        for y in 1..=h {
            surface.put(y, 0, "|", border);
            surface.put(y, w * 2 + 1, "|", border);
        }

        for (y, row) in self.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Cell::Filled(kind) = cell {
                    Self::put_cell(surface, x as i32, y as i32, Style::default().fg(kind.color()));
                }
            }
        }

        let style = Style::default()
            .fg(self.current.kind.color())
            .add_modifier(Modifier::BOLD);
        for (x, y) in self.current.cells() {
            Self::put_cell(surface, x, y, style);
        }

        let side = w * 2 + 4;
        surface.put(1, side, &format!("Lines: {}", self.lines), Style::default().fg(Color::Cyan));
    }
}
