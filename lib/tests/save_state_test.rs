use common::{capture_logs, crossroads, ScriptedRunner};
use dialogue_runner::EngineError;

mod common;

#[test]
fn save_and_load_round_trip_test() {
    let mut runner = ScriptedRunner::new();
    runner.start(crossroads(), true);
    runner.advance();
    runner.advance();
    runner.choose(0, true);

    let before = runner.story().unwrap().script_state().clone();
    let saved = runner.save_state().unwrap();

    runner.load_save_state(&saved).unwrap();

    assert_eq!(&before, runner.story().unwrap().script_state());
}

#[test]
fn load_restores_an_earlier_point_test() {
    let mut runner = ScriptedRunner::new();
    runner.start(crossroads(), true);
    runner.advance();
    let saved = runner.save_state().unwrap();

    runner.advance();
    runner.choose(0, true);
    assert_eq!(5, runner.variable::<i32>("gold"));

    runner.load_save_state(&saved).unwrap();
    runner.advance();

    assert_eq!(0, runner.variable::<i32>("gold"));
    assert_eq!(2, runner.current_choices().len());
}

#[test]
fn save_without_story_test() {
    let mut runner = ScriptedRunner::new();

    let (saved, logs) = capture_logs(|| runner.save_state());
    assert_eq!(None, saved);
    assert!(logs.has_warning("before trying to get dialogue save state"));

    let (loaded, logs) = capture_logs(|| runner.load_save_state("{}"));
    assert!(loaded.is_ok());
    assert!(logs.has_warning("before trying to load dialogue save state"));
}

#[test]
fn load_malformed_state_test() {
    let mut runner = ScriptedRunner::new();
    runner.start(crossroads(), true);
    let before = runner.story().unwrap().script_state().clone();

    let result = runner.load_save_state("not a save");

    assert!(matches!(result, Err(EngineError::Runtime(_))));
    assert_eq!(&before, runner.story().unwrap().script_state());
}
