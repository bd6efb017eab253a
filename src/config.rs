//! Game configuration
//!
//! Configuration is an explicit value passed into the simulation constructor;
//! there is no process-wide config object. Binaries may build one from
//! environment variables.

use crate::types::{BASE_DROP_MS, BOOST_DROP_MS, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroWidth,
    ZeroHeight,
}

impl ConfigError {
    pub fn code(self) -> &'static str {
        "invalid_config"
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfigError::ZeroWidth => "board width must be at least 1",
            ConfigError::ZeroHeight => "board height must be at least 1",
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Gravity interval at level 1, divided by the level thereafter.
    pub base_drop_ms: u64,
    /// Interval forced while soft-dropping or while a plan steers the piece.
    pub boost_drop_ms: u64,
    pub start_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            base_drop_ms: BASE_DROP_MS,
            boost_drop_ms: BOOST_DROP_MS,
            start_level: 1,
        }
    }
}

impl GameConfig {
    /// Validate the configuration. Zero dimensions are a fatal configuration
    /// error, rejected here rather than surfacing later as indexing bugs.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        Ok(self)
    }

    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let width = env::var("GRIDFALL_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("GRIDFALL_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.height);
        let base_drop_ms = env::var("GRIDFALL_BASE_DROP_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.base_drop_ms);
        let start_level = env::var("GRIDFALL_START_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.start_level);

        Self {
            width,
            height,
            base_drop_ms,
            boost_drop_ms: defaults.boost_drop_ms,
            start_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validated().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = GameConfig {
            width: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validated(), Err(ConfigError::ZeroWidth));
    }

    #[test]
    fn test_zero_height_rejected() {
        let config = GameConfig {
            height: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validated(), Err(ConfigError::ZeroHeight));
    }

    #[test]
    fn test_one_by_one_board_is_valid() {
        let config = GameConfig {
            width: 1,
            height: 1,
            ..GameConfig::default()
        };
        assert!(config.validated().is_ok());
    }
}
