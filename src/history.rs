use itertools::Itertools;

use crate::util::mean_ms;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    Correct,
    Wrong,
    TimedOut,
}

/// One judged round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub level: u32,
    pub target: usize,
    pub outcome: Outcome,
    /// Time spent in the reaction window, in whole polling slices.
    pub reaction_ms: u64,
    pub points_earned: u64,
    /// Running total right after the round was scored.
    pub points_total: u64,
    pub lives_left: u32,
}

/// End-of-run aggregates for the idle screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub won: bool,
    pub rounds: usize,
    pub hits: usize,
    pub points_earned: u64,
    /// Mean reaction over the hits; misses and timeouts say nothing
    /// about how fast the player was.
    pub mean_reaction_ms: Option<u64>,
    pub top_level: u32,
}

impl SessionSummary {
    pub fn from_rounds(won: bool, rounds: &[RoundRecord]) -> Self {
        let reactions: Vec<u64> = rounds
            .iter()
            .filter(|round| round.outcome == Outcome::Correct)
            .map(|round| round.reaction_ms)
            .collect();

        Self {
            won,
            rounds: rounds.len(),
            hits: reactions.len(),
            points_earned: rounds.iter().map(|round| round.points_earned).sum(),
            mean_reaction_ms: mean_ms(&reactions),
            top_level: rounds.iter().map(|round| round.level).max().unwrap_or(1),
        }
    }

    /// Hits and rounds per level, in the order the levels were played.
    /// Consecutive replays of a failed level land in the same group.
    pub fn level_breakdown(rounds: &[RoundRecord]) -> Vec<(u32, usize, usize)> {
        let grouped = rounds.iter().chunk_by(|round| round.level);
        let mut breakdown = Vec::new();
        for (level, group) in &grouped {
            let mut played = 0;
            let mut hits = 0;
            for round in group {
                played += 1;
                if round.outcome == Outcome::Correct {
                    hits += 1;
                }
            }
            breakdown.push((level, hits, played));
        }
        breakdown
    }
}
