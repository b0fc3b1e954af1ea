use std::time::Duration;

use crate::panel::{Keys, Lamps};
use crate::session::{GameSession, State};

/// How the runner spends a tick's wait
pub trait Sleeper {
    fn sleep(&mut self, wait: Duration);
}

/// Production sleeper backed by the OS clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemSleeper;

impl Sleeper for SystemSleeper {
    fn sleep(&mut self, wait: Duration) {
        std::thread::sleep(wait);
    }
}

/// Test sleeper that records the waits instead of spending them
#[derive(Clone, Debug, Default)]
pub struct InstantSleeper {
    pub total: Duration,
    pub waits: Vec<Duration>,
}

impl Sleeper for InstantSleeper {
    fn sleep(&mut self, wait: Duration) {
        self.total += wait;
        self.waits.push(wait);
    }
}

/// Runner that advances a session one state visit at a time
pub struct Runner<L: Lamps, K: Keys, S: Sleeper> {
    pub session: GameSession,
    pub lamps: L,
    pub keys: K,
    pub sleeper: S,
}

impl<L: Lamps, K: Keys, S: Sleeper> Runner<L, K, S> {
    pub fn new(session: GameSession, lamps: L, keys: K, sleeper: S) -> Self {
        Self {
            session,
            lamps,
            keys,
            sleeper,
        }
    }

    /// Ticks once, spends the returned wait, and reports the state the
    /// session landed in.
    pub fn step(&mut self) -> State {
        let wait = self.session.tick(&mut self.lamps, &mut self.keys);
        if !wait.is_zero() {
            self.sleeper.sleep(wait);
        }
        self.session.state
    }

    /// Steps until the session reaches `stop`, or gives up after
    /// `max_steps`.
    pub fn run_until(&mut self, stop: State, max_steps: u32) -> bool {
        for _ in 0..max_steps {
            if self.step() == stop {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::panel::{LampRow, ScriptedKeys};

    fn test_config() -> GameConfig {
        GameConfig {
            channels: 3,
            levels: 2,
            lives: 1,
            max_period_ms: 100,
            period_step_ms: 10,
            max_timeout_ms: 1000,
            timeout_step_ms: 100,
            polling_reads: 10,
            seed_increment: 2,
            transition_ms: 20,
        }
    }

    fn test_runner() -> Runner<LampRow, ScriptedKeys, InstantSleeper> {
        let session = GameSession::new(test_config()).unwrap();
        Runner::new(
            session,
            LampRow::new(3),
            ScriptedKeys::new(),
            InstantSleeper::default(),
        )
    }

    #[test]
    fn instant_sleeper_records_waits() {
        let mut sleeper = InstantSleeper::default();
        sleeper.sleep(Duration::from_millis(5));
        sleeper.sleep(Duration::from_millis(7));
        assert_eq!(sleeper.total, Duration::from_millis(12));
        assert_eq!(sleeper.waits.len(), 2);
    }

    #[test]
    fn step_visits_one_state_and_spends_the_wait() {
        let mut runner = test_runner();
        runner.keys.press(0);

        assert_eq!(runner.step(), State::LevelSetup);
        assert_eq!(runner.sleeper.total, Duration::from_millis(10));

        // the instant setup and draw cost nothing
        assert_eq!(runner.step(), State::ChooseTarget);
        assert_eq!(runner.step(), State::AwaitInput);
        assert_eq!(runner.sleeper.total, Duration::from_millis(10));
    }

    #[test]
    fn run_until_reaches_the_goal_state() {
        let mut runner = test_runner();
        runner.keys.press(0);
        runner.keys.press(2); // first draw for seed 2

        assert!(runner.run_until(State::Correct, 10));
        assert!(!runner.run_until(State::Defeat, 3));
    }
}
