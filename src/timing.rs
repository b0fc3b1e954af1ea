use crate::config::GameConfig;

/// Pacing for one level: the polling pass and the reaction window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBudget {
    /// Length of one full polling pass in milliseconds. A target that
    /// survives a whole quiet pass gets re-rolled.
    pub period_ms: u64,
    /// Reaction window in milliseconds before the level times out.
    pub timeout_ms: u64,
}

impl LevelBudget {
    /// Budgets shrink linearly with the level. Level `n` plays at
    /// `max - n * step` for both the period and the timeout; exhausted
    /// budgets saturate at zero and are refused by config validation
    /// before play starts.
    pub fn for_level(config: &GameConfig, level: u32) -> Self {
        let level = u64::from(level);
        Self {
            period_ms: level
                .checked_mul(config.period_step_ms)
                .map_or(0, |cut| config.max_period_ms.saturating_sub(cut)),
            timeout_ms: level
                .checked_mul(config.timeout_step_ms)
                .map_or(0, |cut| config.max_timeout_ms.saturating_sub(cut)),
        }
    }

    /// One polling slice: the period split into `polling_reads` equal waits.
    pub fn slice_ms(&self, polling_reads: u32) -> u64 {
        self.period_ms / u64::from(polling_reads)
    }
}
