//! Game parameters.
//!
//! Every simulation gets its own immutable config struct at construction time.
//! Defaults reproduce the classic tuning; an optional JSON file can override
//! any subset of fields.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::games::space_invaders::{COL_SPACING, FORMATION_LEFT, FORMATION_TOP, ROW_SPACING};

const CONFIG_ENV: &str = "ASCIICADE_CONFIG";
const CONFIG_FILE: &str = "asciicade.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    pub width: usize,
    pub height: usize,
    /// Gravity step interval
    pub drop_ms: u64,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self { width: 12, height: 22, drop_ms: 500 }
    }
}

impl TetrisConfig {
    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Outer size including the border ring
    pub width: i32,
    pub height: i32,
    pub horizontal_ms: u64,
    /// Vertical moves tick slower so the snake feels equally fast on both axes
    pub vertical_ms: u64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self { width: 40, height: 25, horizontal_ms: 100, vertical_ms: 200 }
    }
}

impl SnakeConfig {
    pub fn horizontal_interval(&self) -> Duration {
        Duration::from_millis(self.horizontal_ms)
    }

    pub fn vertical_interval(&self) -> Duration {
        Duration::from_millis(self.vertical_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvadersConfig {
    pub width: i32,
    pub height: i32,
    pub alien_rows: usize,
    pub alien_cols: usize,
    pub alien_width: i32,
    pub max_bullets: usize,
    pub points_per_alien: u32,
    pub move_ms: u64,
    pub min_move_ms: u64,
    /// Multiplier applied to the move interval after every descent
    pub speedup: f64,
}

impl Default for InvadersConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 20,
            alien_rows: 3,
            alien_cols: 5,
            alien_width: 3,
            max_bullets: 2,
            points_per_alien: 10,
            move_ms: 200,
            min_move_ms: 50,
            speedup: 0.9,
        }
    }
}

impl InvadersConfig {
    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_ms)
    }

    pub fn min_move_interval(&self) -> Duration {
        Duration::from_millis(self.min_move_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClimberConfig {
    /// Playable columns between the two walls
    pub width: usize,
    /// Rows shown at once
    pub visible: usize,
    pub jump_height: u32,
    pub tick_ms: u64,
}

impl Default for ClimberConfig {
    fn default() -> Self {
        Self { width: 30, visible: 20, jump_height: 3, tick_ms: 50 }
    }
}

impl ClimberConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Upper bound on how long one frame waits for input
    pub frame_ms: u64,
    pub tetris: TetrisConfig,
    pub snake: SnakeConfig,
    pub invaders: InvadersConfig,
    pub climber: ClimberConfig,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16, // ~60 FPS
            tetris: TetrisConfig::default(),
            snake: SnakeConfig::default(),
            invaders: InvadersConfig::default(),
            climber: ClimberConfig::default(),
        }
    }
}

impl ArcadeConfig {
    /// Loads the config file if there is one. Problems are logged and the
    /// defaults are used instead; a bad config never stops the arcade.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => {
                info!("[Config] Loaded {}", path.display());
                config
            }
            Err(e) => {
                warn!("[Config] {}, using defaults", e);
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        // Next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(CONFIG_FILE);
            }
        }
        PathBuf::from(CONFIG_FILE)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ArcadeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, msg: &str) -> Result<(), ConfigError> {
            if ok { Ok(()) } else { Err(ConfigError::Invalid(msg.to_string())) }
        }

        check(self.frame_ms > 0, "frame_ms must be positive")?;

        let t = &self.tetris;
        check(t.width >= 4 && t.height >= 4, "tetris board must be at least 4x4")?;
        check(t.drop_ms > 0, "tetris.drop_ms must be positive")?;

        let s = &self.snake;
        check(s.width >= 5 && s.height >= 5, "snake field must be at least 5x5")?;
        check(s.horizontal_ms > 0 && s.vertical_ms > 0, "snake intervals must be positive")?;

        let i = &self.invaders;
        check(i.alien_rows > 0 && i.alien_cols > 0, "invaders formation must not be empty")?;
        check(i.alien_width > 0, "invaders.alien_width must be positive")?;
        check(i.max_bullets > 0, "invaders.max_bullets must be positive")?;
        let right = FORMATION_LEFT + (i.alien_cols as i32 - 1) * COL_SPACING + i.alien_width;
        check(right + 2 < i.width, "invaders formation does not fit the field width")?;
        let bottom = FORMATION_TOP + (i.alien_rows as i32 - 1) * ROW_SPACING;
        check(bottom < i.height - 2, "invaders formation does not fit the field height")?;
        check(i.min_move_ms > 0, "invaders.min_move_ms must be positive")?;
        check(i.move_ms >= i.min_move_ms, "invaders.move_ms must not be below min_move_ms")?;
        check(i.speedup > 0.0 && i.speedup <= 1.0, "invaders.speedup must be in (0, 1]")?;

        let c = &self.climber;
        check(c.width >= 5, "climber.width must be at least 5")?;
        check(c.visible >= 2, "climber.visible must be at least 2")?;
        check(c.jump_height > 0, "climber.jump_height must be positive")?;
        check(c.tick_ms > 0, "climber.tick_ms must be positive")?;
        Ok(())
    }
}
