use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::error::ConfigError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in pixels; always split into 20 columns
    pub board_width_px: u32,
    /// Board height in pixels
    pub board_height_px: u32,
    /// Density-like scale applied to the wall inset
    pub unit: f32,

    /// Time between ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Shave this much off the tick interval per food eaten (0 disables)
    pub speedup_per_food_ms: u64,
    /// Floor for the sped-up tick interval
    pub min_tick_interval_ms: u64,

    /// The exit opens once the snake is longer than this
    pub win_threshold: usize,
    /// Points awarded per food
    pub food_score: u32,

    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width_px: 400,
            board_height_px: 400,
            unit: 1.0,
            tick_interval_ms: 150,
            speedup_per_food_ms: 0,
            min_tick_interval_ms: 50,
            win_threshold: 3,
            food_score: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(board_width_px: u32, board_height_px: u32) -> Self {
        Self {
            board_width_px,
            board_height_px,
            ..Default::default()
        }
    }

    /// Read settings from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Check that the board and timing values can host a game
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?;

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.min_tick_interval_ms > self.tick_interval_ms {
            return Err(ConfigError::TickFloorAboveInterval {
                min_ms: self.min_tick_interval_ms,
                tick_ms: self.tick_interval_ms,
            });
        }

        Ok(())
    }

    /// Derive the grid for this board
    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::new(self.board_width_px, self.board_height_px, self.unit)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Tick interval after `foods_eaten` foods, never below the floor
    pub fn tick_interval_after(&self, foods_eaten: u32) -> Duration {
        let saved = self.speedup_per_food_ms.saturating_mul(u64::from(foods_eaten));
        let ms = self
            .tick_interval_ms
            .saturating_sub(saved)
            .max(self.min_tick_interval_ms.min(self.tick_interval_ms));
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEngine;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.board_width_px, 400);
        assert_eq!(config.board_height_px, 400);
        assert_eq!(config.tick_interval(), Duration::from_millis(150));
        assert_eq!(config.win_threshold, 3);
        assert_eq!(config.food_score, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(600, 900);
        assert_eq!(config.board_width_px, 600);
        assert_eq!(config.board_height_px, 900);
        assert_eq!(config.grid().unwrap().cell_size(), 30);
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        let config = GameConfig {
            tick_interval_ms: 0,
            min_tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));

        let config = GameConfig {
            tick_interval_ms: 100,
            min_tick_interval_ms: 200,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TickFloorAboveInterval { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_small_board() {
        let config = GameConfig::new(400, 120);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooShort { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_huge_board() {
        let config = GameConfig::new(20, u32::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));
        assert!(GameEngine::new(&config).is_err());
    }

    #[test]
    fn test_speedup() {
        let config = GameConfig {
            speedup_per_food_ms: 20,
            min_tick_interval_ms: 60,
            ..Default::default()
        };

        assert_eq!(config.tick_interval_after(0), Duration::from_millis(150));
        assert_eq!(config.tick_interval_after(2), Duration::from_millis(110));
        assert_eq!(config.tick_interval_after(10), Duration::from_millis(60));

        // Disabled by default
        let config = GameConfig::default();
        assert_eq!(config.tick_interval_after(50), Duration::from_millis(150));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "tick_interval_ms": 90, "win_threshold": 5 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.tick_interval_ms, 90);
        assert_eq!(config.win_threshold, 5);
        assert_eq!(config.board_width_px, 400);

        std::fs::write(&path, "not json").unwrap();
        assert!(GameConfig::load(&path).is_err());
        assert!(GameConfig::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "board_width_px": 600, "seed": 7 }"#).unwrap();
        assert_eq!(config.board_width_px, 600);
        assert_eq!(config.board_height_px, 400);
        assert_eq!(config.seed, Some(7));
    }
}
