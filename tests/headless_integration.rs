use std::time::Duration;

use blikk::config::GameConfig;
use blikk::panel::{LampRow, ScriptedKeys};
use blikk::runtime::{InstantSleeper, Runner, SystemSleeper};
use blikk::session::{GameSession, State};

// Headless integration using the internal runtime without a TTY.
// Verifies that whole runs complete via Runner + scripted doubles.

fn quick_config() -> GameConfig {
    GameConfig {
        channels: 3,
        levels: 2,
        lives: 3,
        max_period_ms: 100,
        period_step_ms: 10,
        max_timeout_ms: 1000,
        timeout_step_ms: 100,
        polling_reads: 10,
        seed_increment: 2,
        transition_ms: 20,
    }
}

fn quick_runner() -> Runner<LampRow, ScriptedKeys, InstantSleeper> {
    let session = GameSession::new(quick_config()).unwrap();
    Runner::new(
        session,
        LampRow::new(3),
        ScriptedKeys::new(),
        InstantSleeper::default(),
    )
}

#[test]
fn headless_perfect_run_reaches_victory() {
    let mut runner = quick_runner();
    runner.keys.press(0); // arm the idle board

    // Press the lit key the moment each fresh target lands
    let mut prev = State::Idle;
    let mut reached_victory = false;
    for _ in 0..100u32 {
        let state = runner.step();
        if state == State::AwaitInput && prev != State::AwaitInput {
            runner.keys.press(runner.session.target);
        }
        prev = state;
        if state == State::Victory {
            reached_victory = true;
            break;
        }
    }

    assert!(reached_victory, "a perfect run should clear the board");
    assert_eq!(runner.session.level, 3);
    assert_eq!(runner.session.lives, 3);

    // Virtual time: one idle poll, then a transition flash per hit;
    // instant presses never spend a polling slice.
    assert_eq!(runner.sleeper.total, Duration::from_millis(10 + 2 * 20));

    // The victory flash hands the board back to the idle screen
    assert_eq!(runner.step(), State::Idle);
    assert!(runner.session.last_summary.as_ref().unwrap().won);
}

#[test]
fn headless_quiet_board_bleeds_out_to_defeat() {
    let mut runner = quick_runner();
    runner.keys.press(0);

    // No further input: every level times out until the lives are gone
    assert!(runner.run_until(State::Defeat, 5000));
    assert_eq!(runner.session.lives, 0);
    assert_eq!(runner.session.points, 0);

    // Three timeouts, each a full reaction window of quiet slices
    let rounds = runner.session.session_rounds();
    assert_eq!(rounds.len(), 3);
    assert!(rounds.iter().all(|r| r.reaction_ms == 900));

    assert_eq!(runner.step(), State::Idle);
    assert!(!runner.session.last_summary.as_ref().unwrap().won);
}

#[test]
fn headless_virtual_time_matches_the_recorded_reactions() {
    let mut runner = quick_runner();
    runner.keys.press(0);

    // Let level one sit quiet for one full polling pass, then strike the
    // re-rolled target. The first ChooseTarget visit is the opening draw;
    // the second only happens once a whole period went by unanswered.
    let mut draws = 0;
    for _ in 0..100u32 {
        let state = runner.step();
        if state == State::ChooseTarget {
            draws += 1;
        }
        if state == State::AwaitInput && draws == 2 {
            runner.keys.press(runner.session.target);
        }
        if state == State::Correct {
            break;
        }
    }
    assert_eq!(runner.session.state, State::Correct);

    // The scoring flash lands on the next visit
    assert_eq!(runner.step(), State::LevelSetup);
    let round = &runner.session.session_rounds()[0];
    assert_eq!(round.reaction_ms, 90);

    // Idle poll, ten quiet 9ms slices, one transition flash
    assert_eq!(runner.sleeper.total, Duration::from_millis(10 + 90 + 20));
}

#[test]
fn headless_runner_works_with_the_system_sleeper() {
    // Same flow against the real clock; instant presses keep the only
    // real sleeps down to one idle poll and two 1ms flashes
    let config = GameConfig {
        max_timeout_ms: 100,
        timeout_step_ms: 10,
        transition_ms: 1,
        ..quick_config()
    };
    let session = GameSession::new(config).unwrap();
    let mut runner = Runner::new(
        session,
        LampRow::new(3),
        ScriptedKeys::new(),
        SystemSleeper,
    );

    runner.keys.press(0);
    let mut prev = State::Idle;
    for _ in 0..100u32 {
        let state = runner.step();
        if state == State::AwaitInput && prev != State::AwaitInput {
            runner.keys.press(runner.session.target);
        }
        prev = state;
        if state == State::Victory {
            break;
        }
    }

    assert_eq!(runner.session.state, State::Victory);
}
