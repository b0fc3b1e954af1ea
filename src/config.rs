use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::timing::LevelBudget;

/// Everything tunable about the board, persisted as JSON.
///
/// The defaults reproduce the classic three-lamp board: ten levels,
/// three lives, a one second polling pass and a fifteen second reaction
/// window before the per-level cuts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Lamp/key pairs on the board. Keys are `1..=channels`, so at most 9.
    pub channels: usize,
    /// Levels to clear for a victory.
    pub levels: u32,
    /// Misses allowed before the run ends.
    pub lives: u32,
    /// Base polling pass length; level `n` plays at `max - n * step`.
    pub max_period_ms: u64,
    pub period_step_ms: u64,
    /// Base reaction window; level `n` plays at `max - n * step`.
    pub max_timeout_ms: u64,
    pub timeout_step_ms: u64,
    /// Key samples per polling pass.
    pub polling_reads: u32,
    /// How far the seed counter advances per idle pass.
    pub seed_increment: u32,
    /// How long hit, miss and end-of-run flashes stay on screen.
    pub transition_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            channels: 3,
            levels: 10,
            lives: 3,
            max_period_ms: 1000,
            period_step_ms: 90,
            max_timeout_ms: 15000,
            timeout_step_ms: 1400,
            polling_reads: 10,
            seed_increment: 2,
            transition_ms: 1000,
        }
    }
}

/// A configuration the board would stall or misbehave under.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("channels must be between 1 and 9, got {0}")]
    ChannelCount(usize),
    #[error("levels must be at least 1")]
    NoLevels,
    #[error("lives must be at least 1")]
    NoLives,
    #[error("polling_reads must be at least 1")]
    NoPollingReads,
    #[error("seed_increment must be at least 1")]
    NoSeedIncrement,
    #[error(
        "level {level} leaves a {period_ms}ms polling pass, too short for {polling_reads} reads"
    )]
    PeriodTooShort {
        level: u32,
        period_ms: u64,
        polling_reads: u32,
    },
    #[error("level {level} leaves no reaction window")]
    TimeoutExhausted { level: u32 },
}

impl GameConfig {
    /// Checks every level the board will play. A polling slice of zero
    /// would spin the wait state without passing time, and a zero
    /// reaction window can never be beaten, so both are refused up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels == 0 || self.channels > 9 {
            return Err(ConfigError::ChannelCount(self.channels));
        }
        if self.levels == 0 {
            return Err(ConfigError::NoLevels);
        }
        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.polling_reads == 0 {
            return Err(ConfigError::NoPollingReads);
        }
        if self.seed_increment == 0 {
            return Err(ConfigError::NoSeedIncrement);
        }

        for level in 1..=self.levels {
            let budget = LevelBudget::for_level(self, level);
            if budget.slice_ms(self.polling_reads) == 0 {
                return Err(ConfigError::PeriodTooShort {
                    level,
                    period_ms: budget.period_ms,
                    polling_reads: self.polling_reads,
                });
            }
            if budget.timeout_ms == 0 {
                return Err(ConfigError::TimeoutExhausted { level });
            }
        }

        Ok(())
    }

    /// Delay between key samples while idling: one slice of the uncut
    /// period.
    pub fn idle_poll_ms(&self) -> u64 {
        self.max_period_ms / u64::from(self.polling_reads)
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "blikk") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("blikk_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<GameConfig>(&bytes) {
                return cfg;
            }
        }
        GameConfig::default()
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
