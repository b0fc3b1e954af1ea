use std::time::Duration;

use crate::config::{ConfigError, GameConfig};
use crate::history::{Outcome, RoundRecord, SessionSummary};
use crate::panel::{Keys, Lamps};
use crate::rng::Lcg;
use crate::timing::LevelBudget;

/// The board's states, one visit per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    LevelSetup,
    ChooseTarget,
    AwaitInput,
    Correct,
    Wrong,
    TimedOut,
    Victory,
    Defeat,
}

/// Points for a correct strike: ten per level plus one per full second
/// left in the reaction window.
pub fn round_points(level: u32, timeout_ms: u64, elapsed_ms: u64) -> u64 {
    u64::from(level) * 10 + timeout_ms.saturating_sub(elapsed_ms) / 1000
}

/// The whole game outside the terminal: a tick-driven state machine.
///
/// Each `tick` visits the current state exactly once, drives the lamps,
/// samples the keys, and returns how long the caller should wait before
/// the next tick. Time is accounted in whole polling slices, so a
/// session fed by scripted keys and an instant sleeper plays out
/// identically to one on a live terminal.
#[derive(Debug)]
pub struct GameSession {
    pub state: State,
    pub level: u32,
    pub lives: u32,
    /// Running total; it survives returns to idle on purpose.
    pub points: u64,
    /// Idle counter; every idle pass advances it by `seed_increment`.
    pub seed: u32,
    pub period_ms: u64,
    pub timeout_ms: u64,
    /// Time spent in the current reaction window so far.
    pub elapsed_ms: u64,
    /// Channel under the lit lamp.
    pub target: usize,
    pub history: Vec<RoundRecord>,
    pub last_summary: Option<SessionSummary>,
    pub config: GameConfig,
    rng: Lcg,
    /// Quiet time in the current polling pass; a full pass re-rolls.
    wait_cursor_ms: u64,
    /// Index into `history` where the current run started.
    session_start: usize,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let opening = LevelBudget::for_level(&config, 1);
        Ok(Self {
            state: State::Idle,
            level: 1,
            lives: config.lives,
            points: 0,
            seed: 0,
            period_ms: opening.period_ms,
            timeout_ms: opening.timeout_ms,
            elapsed_ms: 0,
            target: 0,
            history: Vec::new(),
            last_summary: None,
            config,
            rng: Lcg::new(0),
            wait_cursor_ms: 0,
            session_start: 0,
        })
    }

    /// Opens the idle counter elsewhere, for a different attract sweep
    /// and a different draw sequence once armed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Rounds judged since the current run was armed.
    pub fn session_rounds(&self) -> &[RoundRecord] {
        &self.history[self.session_start..]
    }

    fn slice_ms(&self) -> u64 {
        self.period_ms / u64::from(self.config.polling_reads)
    }

    /// Visits the current state once and returns how long to wait
    /// before the next tick.
    pub fn tick<L: Lamps, K: Keys>(&mut self, lamps: &mut L, keys: &mut K) -> Duration {
        let wait_ms = match self.state {
            State::Idle => self.tick_idle(lamps, keys),
            State::LevelSetup => self.tick_level_setup(),
            State::ChooseTarget => self.tick_choose_target(lamps),
            State::AwaitInput => self.tick_await_input(keys),
            State::Correct => self.tick_correct(lamps),
            State::Wrong => self.tick_rejected(lamps, Outcome::Wrong),
            State::TimedOut => self.tick_rejected(lamps, Outcome::TimedOut),
            State::Victory => self.tick_session_end(lamps, true),
            State::Defeat => self.tick_session_end(lamps, false),
        };
        Duration::from_millis(wait_ms)
    }

    /// Attract mode. Every pass resets the run, advances the seed and
    /// sweeps one lamp along the row; any key arms the board.
    fn tick_idle<L: Lamps, K: Keys>(&mut self, lamps: &mut L, keys: &mut K) -> u64 {
        self.level = 1;
        self.lives = self.config.lives;
        self.seed = self.seed.wrapping_add(self.config.seed_increment);

        let sweep = (self.seed / self.config.seed_increment) as usize % self.config.channels;
        lamps.activate(sweep);

        if keys.poll_active().is_some() {
            self.session_start = self.history.len();
            self.state = State::LevelSetup;
        }
        // the pass is paced the same whether or not the key armed the board
        self.config.idle_poll_ms()
    }

    fn tick_level_setup(&mut self) -> u64 {
        let budget = LevelBudget::for_level(&self.config, self.level);
        self.period_ms = budget.period_ms;
        self.timeout_ms = budget.timeout_ms;
        self.elapsed_ms = 0;
        self.wait_cursor_ms = 0;
        // reseeding per level replays the level's draw sequence
        self.rng.reseed(self.seed);
        self.state = State::ChooseTarget;
        0
    }

    fn tick_choose_target<L: Lamps>(&mut self, lamps: &mut L) -> u64 {
        self.target = self.rng.next_below(self.config.channels as u32) as usize;
        lamps.activate(self.target);
        self.state = State::AwaitInput;
        0
    }

    /// One key sample. A match outranks the lapsed window, the lapsed
    /// window outranks a wrong key, and a quiet sample spends one slice.
    /// A full pass of quiet samples re-rolls the target.
    fn tick_await_input<K: Keys>(&mut self, keys: &mut K) -> u64 {
        let pressed = keys.poll_active();

        if pressed == Some(self.target) {
            self.state = State::Correct;
            return 0;
        }
        if self.elapsed_ms >= self.timeout_ms {
            self.state = State::TimedOut;
            return 0;
        }
        if pressed.is_some() {
            self.state = State::Wrong;
            return 0;
        }

        let slice = self.slice_ms();
        self.elapsed_ms += slice;
        self.wait_cursor_ms += slice;
        if self.wait_cursor_ms >= self.period_ms {
            self.wait_cursor_ms = 0;
            self.state = State::ChooseTarget;
        }
        slice
    }

    fn tick_correct<L: Lamps>(&mut self, lamps: &mut L) -> u64 {
        lamps.set_all(true);
        let earned = round_points(self.level, self.timeout_ms, self.elapsed_ms);
        self.points += earned;
        self.record_round(Outcome::Correct, earned);

        self.level += 1;
        self.state = if self.level > self.config.levels {
            State::Victory
        } else {
            State::LevelSetup
        };
        self.config.transition_ms
    }

    fn tick_rejected<L: Lamps>(&mut self, lamps: &mut L, outcome: Outcome) -> u64 {
        lamps.set_all(false);
        self.lives -= 1;
        self.record_round(outcome, 0);

        self.state = if self.lives == 0 {
            State::Defeat
        } else {
            State::LevelSetup
        };
        self.config.transition_ms
    }

    fn tick_session_end<L: Lamps>(&mut self, lamps: &mut L, won: bool) -> u64 {
        lamps.set_all(won);
        let summary = SessionSummary::from_rounds(won, &self.history[self.session_start..]);
        self.last_summary = Some(summary);
        self.state = State::Idle;
        self.config.transition_ms
    }

    fn record_round(&mut self, outcome: Outcome, points_earned: u64) {
        self.history.push(RoundRecord {
            level: self.level,
            target: self.target,
            outcome,
            reaction_ms: self.elapsed_ms,
            points_earned,
            points_total: self.points,
            lives_left: self.lives,
        });
    }
}
