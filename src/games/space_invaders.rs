use std::time::Duration;

use log::debug;
use ratatui::prelude::*;

use crate::config::InvadersConfig;
use crate::event::Key;
use crate::games::{Outcome, Simulation};
use crate::ui::Surface;

/// Column of the leftmost alien at the start of a wave
pub const FORMATION_LEFT: i32 = 6;
/// Row of the top alien row at the start of a wave
pub const FORMATION_TOP: i32 = 2;
pub const COL_SPACING: i32 = 8;
pub const ROW_SPACING: i32 = 2;

/// Leftmost cell of an alien; it spans `alien_width` cells to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alien {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct SpaceInvaders {
    config: InvadersConfig,
    player_x: i32,
    aliens: Vec<Alien>,
    bullets: Vec<Bullet>,
    alien_dir: i32, // 1 = right, -1 = left
    move_interval: Duration,
    score: u32,
    game_over: bool,
}

impl SpaceInvaders {
    pub fn new(config: InvadersConfig) -> Self {
        let mut s = Self {
            player_x: config.width / 2,
            aliens: Vec::new(),
            bullets: Vec::new(),
            alien_dir: 1,
            move_interval: config.move_interval(),
            score: 0,
            game_over: false,
            config,
        };
        s.init_aliens();
        s
    }

    fn init_aliens(&mut self) {
        self.aliens.clear();
        for row in 0..self.config.alien_rows as i32 {
            for col in 0..self.config.alien_cols as i32 {
                self.aliens.push(Alien {
                    x: FORMATION_LEFT + col * COL_SPACING,
                    y: FORMATION_TOP + row * ROW_SPACING,
                });
            }
        }
    }

    fn player_row(&self) -> i32 {
        self.config.height - 1
    }

    /// Shifts the whole formation one column. Touching a side margin turns it
    /// around, drops it one row and speeds it up.
    pub fn move_aliens(&mut self) {
        let width = self.config.width;
        let alien_w = self.config.alien_width;
        let mut need_down = false;
        for alien in &mut self.aliens {
            alien.x += self.alien_dir;
            if alien.x <= 1 || alien.x + alien_w - 1 >= width - 2 {
                need_down = true;
            }
        }
        if !need_down {
            return;
        }

        self.alien_dir = -self.alien_dir;
        for alien in &mut self.aliens {
            alien.y += 1;
            if alien.y >= self.config.height - 1 {
                self.game_over = true;
            }
        }
        let nanos = self.move_interval.as_nanos() as f64 * self.config.speedup;
        let faster = Duration::from_nanos(nanos.round() as u64);
        self.move_interval = faster.max(self.config.min_move_interval());
        debug!("[Invaders] Formation descended, interval now {:?}", self.move_interval);
    }

    /// Advances every bullet one row. A bullet leaving the top disappears; one
    /// that reaches an alien destroys the first alien it overlaps and is spent.
    pub fn step_bullets(&mut self) {
        let alien_w = self.config.alien_width;
        let mut survivors = Vec::with_capacity(self.bullets.len());
        for mut bullet in std::mem::take(&mut self.bullets) {
            bullet.y -= 1;
            if bullet.y <= 0 {
                continue;
            }
            let hit = self
                .aliens
                .iter()
                .position(|a| a.y == bullet.y && a.x <= bullet.x && bullet.x < a.x + alien_w);
            match hit {
                Some(idx) => {
                    self.aliens.remove(idx);
                    self.score += self.config.points_per_alien;
                }
                None => survivors.push(bullet),
            }
        }
        self.bullets = survivors;
    }

    pub fn fire(&mut self) -> bool {
        if self.bullets.len() >= self.config.max_bullets {
            return false;
        }
        self.bullets.push(Bullet { x: self.player_x, y: self.config.height - 2 });
        true
    }

    fn move_player(&mut self, dx: i32) {
        self.player_x = (self.player_x + dx).clamp(1, self.config.width - 2);
    }
}

impl Simulation for SpaceInvaders {
    fn title(&self) -> &'static str {
        "Space Invaders"
    }

    fn accent(&self) -> Color {
        Color::Rgb(80, 255, 80)
    }

    fn controls(&self) -> &'static str {
        "←→ Move | Space Shoot"
    }

    fn handle_input(&mut self, key: Key) {
        if self.is_over() {
            return;
        }
        match key {
            Key::Left => self.move_player(-1),
            Key::Right => self.move_player(1),
            Key::Space | Key::Up => {
                self.fire();
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.is_over() {
            return;
        }
        self.move_aliens();
        self.step_bullets();
    }

    fn tick_interval(&self) -> Duration {
        self.move_interval
    }

    fn outcome(&self) -> Option<Outcome> {
        if self.game_over {
            Some(Outcome::GameOver)
        } else if self.aliens.is_empty() {
            Some(Outcome::Won)
        } else {
            None
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let border = Style::default().fg(Color::Rgb(40, 80, 40));
        let w = self.config.width as u16;
        let h = self.config.height as u16;
        let horizontal = "-".repeat(self.config.width as usize);
        surface.put(0, 1, &horizontal, border);
        surface.put(h, 1, &horizontal, border);
        for y in 1..h {
            surface.put(y, 0, "|", border);
            surface.put(y, w + 1, "|", border);
        }

        let alien_style = Style::default().fg(Color::Rgb(200, 180, 255));
        let sprite = "M".repeat(self.config.alien_width as usize);
        for alien in &self.aliens {
            if alien.x >= 0 && alien.y >= 0 {
                surface.put(alien.y as u16, alien.x as u16 + 1, &sprite, alien_style);
            }
        }

        let bullet_style = Style::default().fg(Color::Rgb(255, 255, 200)).add_modifier(Modifier::BOLD);
        for bullet in &self.bullets {
            surface.put(bullet.y as u16, bullet.x as u16 + 1, "|", bullet_style);
        }

        if !self.game_over {
            surface.put(
                self.player_row() as u16,
                self.player_x as u16 + 1,
                "A",
                Style::default().fg(Color::Rgb(80, 255, 80)).add_modifier(Modifier::BOLD),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::TextSurface;

    fn game() -> SpaceInvaders {
        SpaceInvaders::new(InvadersConfig::default())
    }

    #[test]
    fn formation_starts_in_rows() {
        let g = game();
        assert_eq!(g.aliens.len(), 15);
        assert_eq!(g.aliens[0], Alien { x: 6, y: 2 });
        assert_eq!(g.aliens[4], Alien { x: 38, y: 2 });
        assert_eq!(g.aliens[14], Alien { x: 38, y: 6 });
        assert_eq!(g.player_x, 30);
    }

    #[test]
    fn formation_marches_sideways() {
        let mut g = game();
        g.move_aliens();
        assert_eq!(g.aliens[0], Alien { x: 7, y: 2 });
        assert_eq!(g.move_interval, Duration::from_millis(200));
    }

    #[test]
    fn touching_the_margin_descends_and_reverses() {
        let mut g = game();
        g.aliens = vec![Alien { x: 54, y: 5 }];
        g.move_aliens();
        // 55 + 3 - 1 = 57 >= 58 is false, keep going
        assert_eq!(g.aliens[0], Alien { x: 55, y: 5 });
        g.move_aliens();
        assert_eq!(g.aliens[0], Alien { x: 56, y: 6 });
        assert_eq!(g.alien_dir, -1);
        assert_eq!(g.move_interval, Duration::from_millis(180));
        g.move_aliens();
        assert_eq!(g.aliens[0], Alien { x: 55, y: 6 });
    }

    #[test]
    fn move_interval_never_increases_and_respects_floor() {
        // Narrow field so the formation bounces between the margins every few steps
        let config = InvadersConfig { width: 8, height: 40, ..InvadersConfig::default() };
        let mut g = SpaceInvaders::new(config);
        g.aliens = vec![Alien { x: 2, y: 2 }];
        g.alien_dir = -1;
        let mut last = g.move_interval;
        for _ in 0..200 {
            g.move_aliens();
            let now = g.move_interval;
            assert!(now <= last);
            assert!(now >= Duration::from_millis(50));
            last = now;
            if g.is_over() {
                break;
            }
        }
        assert_eq!(last, Duration::from_millis(50));
    }

    #[test]
    fn reaching_the_bottom_is_game_over() {
        let mut g = game();
        g.aliens = vec![Alien { x: 2, y: 18 }];
        g.alien_dir = -1;
        g.move_aliens();
        assert_eq!(g.aliens[0].y, 19);
        assert_eq!(g.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn bullet_cap_is_enforced() {
        let mut g = game();
        assert!(g.fire());
        assert!(g.fire());
        assert!(!g.fire());
        assert_eq!(g.bullets.len(), 2);
        assert_eq!(g.bullets[0], Bullet { x: 30, y: 18 });
    }

    #[test]
    fn bullet_kills_at_most_one_alien() {
        let mut g = game();
        // Two overlapping aliens on the bullet's next row; list order decides
        g.aliens = vec![Alien { x: 9, y: 4 }, Alien { x: 10, y: 4 }, Alien { x: 30, y: 2 }];
        g.bullets = vec![Bullet { x: 10, y: 5 }];
        g.step_bullets();
        assert_eq!(g.aliens, [Alien { x: 10, y: 4 }, Alien { x: 30, y: 2 }]);
        assert!(g.bullets.is_empty());
        assert_eq!(g.score(), 10);
    }

    #[test]
    fn bullet_uses_alien_span() {
        let mut g = game();
        g.aliens = vec![Alien { x: 10, y: 4 }];
        g.bullets = vec![Bullet { x: 13, y: 5 }, Bullet { x: 12, y: 5 }];
        g.step_bullets();
        // x = 13 is just past the three-cell sprite
        assert_eq!(g.bullets, [Bullet { x: 13, y: 4 }]);
        assert!(g.aliens.is_empty());
        assert_eq!(g.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn bullet_leaves_through_the_top() {
        let mut g = game();
        g.bullets = vec![Bullet { x: 3, y: 1 }, Bullet { x: 3, y: 10 }];
        g.step_bullets();
        assert_eq!(g.bullets, [Bullet { x: 3, y: 9 }]);
    }

    #[test]
    fn player_stays_inside_walls() {
        let mut g = game();
        for _ in 0..100 {
            g.handle_input(Key::Left);
        }
        assert_eq!(g.player_x, 1);
        for _ in 0..100 {
            g.handle_input(Key::Right);
        }
        assert_eq!(g.player_x, 58);
    }

    #[test]
    fn draws_aliens_bullets_and_cannon() {
        let mut g = game();
        g.aliens = vec![Alien { x: 6, y: 2 }];
        g.bullets = vec![Bullet { x: 20, y: 10 }];
        let mut surface = TextSurface::new(62, 21);
        g.draw(&mut surface);
        assert_eq!(&surface.row(2)[7..10], "MMM");
        assert_eq!(surface.at(10, 21), '|');
        assert_eq!(surface.at(19, 31), 'A');
        assert_eq!(surface.at(5, 61), '|');
    }
}
