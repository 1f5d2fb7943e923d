// Browser-only host checks. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use whoopee_chaos::round::{RoundClock, ScoreStore};
use whoopee_chaos::web::{IntervalClock, LocalStorageScoreStore};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trips_high_score() {
    let mut store = LocalStorageScoreStore::new("whoopee_chaos_test_score");
    store.save(17).unwrap();
    assert_eq!(store.load().unwrap(), 17);
}

#[wasm_bindgen_test]
fn interval_clock_starts_and_stops() {
    let mut clock = IntervalClock::new(1_000, || {});
    assert!(!clock.is_running());
    clock.start();
    assert!(clock.is_running());
    clock.stop();
    assert!(!clock.is_running());
}

#[wasm_bindgen_test]
fn session_lifecycle_through_exports() {
    whoopee_chaos::web::init_game(None, None).unwrap();
    assert!(whoopee_chaos::web::start_game().unwrap());
    assert!(!whoopee_chaos::web::start_game().unwrap());
    assert!(!whoopee_chaos::web::dispatch_command("explode", None, None).unwrap());
    assert!(whoopee_chaos::web::click_target(0).unwrap());
    assert!(!whoopee_chaos::web::click_target(0).unwrap());
    whoopee_chaos::web::dispose_game().unwrap();
    assert!(whoopee_chaos::web::dispose_game().is_ok());
    assert!(whoopee_chaos::web::start_game().is_err());
}

#[wasm_bindgen_test]
fn reinit_from_listener_is_refused() {
    whoopee_chaos::web::init_game(None, None).unwrap();
    let outcomes: Rc<RefCell<Vec<(bool, bool)>>> = Rc::default();
    let seen = outcomes.clone();
    let listener = Closure::wrap(Box::new(move |_state: JsValue| {
        let init = whoopee_chaos::web::init_game(None, None).is_err();
        let dispose = whoopee_chaos::web::dispose_game().is_err();
        seen.borrow_mut().push((init, dispose));
    }) as Box<dyn FnMut(JsValue)>);
    let callback: js_sys::Function = listener.as_ref().unchecked_ref::<js_sys::Function>().clone();
    whoopee_chaos::web::subscribe_state(callback).unwrap();

    assert!(whoopee_chaos::web::start_game().unwrap());
    assert_eq!(outcomes.borrow().first(), Some(&(true, true)));
    // The original session is still installed and playing.
    assert!(!whoopee_chaos::web::start_game().unwrap());
    assert!(whoopee_chaos::web::click_target(0).unwrap());
    whoopee_chaos::web::dispose_game().unwrap();
    drop(listener);
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen_test]
fn dispatched_commands_match_dedicated_exports() {
    whoopee_chaos::web::init_game(None, None).unwrap();
    assert!(whoopee_chaos::web::dispatch_command("start", None, None).unwrap());
    assert!(whoopee_chaos::web::dispatch_command("activate", Some(0), None).unwrap());
    let state = whoopee_chaos::web::game_state_json().unwrap();
    let state: serde_json::Value = serde_json::from_str(&state).unwrap();
    let message = state["current_message"].as_str().unwrap_or_default();
    assert!(message.contains(": \""), "activation should post a quote, got {message:?}");
    assert!(!whoopee_chaos::web::dispatch_command("activate", Some(0), None).unwrap());
    whoopee_chaos::web::dispose_game().unwrap();
}
