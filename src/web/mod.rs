//! Browser host: wasm-bindgen exports around a single [`Session`].
//!
//! The session lives in a `thread_local!` slot. The round clock is a 1 s
//! `setInterval` that ticks the session; time-boxed messages are expired with
//! `setTimeout`. JS listeners registered through [`subscribe_state`] receive a
//! snapshot and must not call back into these exports synchronously (the slot
//! is busy and such calls return an error).

use std::cell::{Cell, RefCell};

use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::{FxConfig, GameConfig};
use crate::error::ConfigError;
use crate::fx::FxPlayer;
use crate::rng;
use crate::round::{Command, GameHandle, GameState, InertGame, ListenerId, RoundClock, RoundMachine};
use crate::session::{Session, TimedMessage};

mod audio;
mod storage;

pub use audio::HtmlAudioBackend;
pub use storage::{HIGH_SCORE_KEY, LocalStorageScoreStore};

const TICK_INTERVAL_MS: i32 = 1_000;
const VIBRATE_MS: u32 = 50;
const MOBILE_MAX_WIDTH: f64 = 768.0;
const MOBILE_AGENTS: [&str; 8] = [
    "Android", "webOS", "iPhone", "iPad", "iPod", "BlackBerry", "IEMobile", "Opera Mini",
];

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    static MOBILE: Cell<bool> = const { Cell::new(false) };
}

// --- Round clock -------------------------------------------------------------

/// `setInterval`-driven round clock. The callback closure lives as long as the
/// clock; only the interval registration comes and goes.
pub struct IntervalClock {
    handle: Option<i32>,
    period_ms: i32,
    callback: Closure<dyn FnMut()>,
}

impl IntervalClock {
    pub fn new(period_ms: i32, on_tick: impl FnMut() + 'static) -> Self {
        Self {
            handle: None,
            period_ms,
            callback: Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>),
        }
    }
}

impl RoundClock for IntervalClock {
    fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(win) = window() else {
            warn!("no window; round clock not started");
            return;
        };
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            self.callback.as_ref().unchecked_ref(),
            self.period_ms,
        ) {
            Ok(id) => self.handle = Some(id),
            Err(e) => warn!("failed to start round clock: {e:?}"),
        }
    }

    fn stop(&mut self) {
        if let (Some(id), Some(win)) = (self.handle.take(), window()) {
            win.clear_interval_with_handle(id);
        }
    }

    fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        self.stop();
    }
}

// --- Platform helpers --------------------------------------------------------

fn detect_mobile() -> bool {
    let Some(win) = window() else {
        return false;
    };
    let agent = win.navigator().user_agent().unwrap_or_default();
    let narrow = win
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .map(|w| w <= MOBILE_MAX_WIDTH)
        .unwrap_or(false);
    MOBILE_AGENTS.iter().any(|a| agent.contains(a)) || narrow
}

fn vibrate() {
    if MOBILE.with(|m| m.get()) {
        if let Some(win) = window() {
            win.navigator().vibrate_with_duration(VIBRATE_MS);
        }
    }
}

fn resolve_config(config_json: Option<String>, mobile: bool) -> Result<GameConfig, ConfigError> {
    match config_json {
        #[cfg(feature = "serde_json")]
        Some(json) => GameConfig::from_json(&json),
        #[cfg(not(feature = "serde_json"))]
        Some(_) => {
            warn!("config JSON ignored: built without serde_json");
            Ok(if mobile { GameConfig::mobile() } else { GameConfig::default() })
        }
        None => Ok(if mobile { GameConfig::mobile() } else { GameConfig::default() }),
    }
}

fn schedule_expiry(message: TimedMessage) {
    let Some(win) = window() else {
        return;
    };
    let TimedMessage { text, ttl_ms } = message;
    let expire = Closure::once_into_js(move || {
        SESSION.with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => {
                if let Some(session) = slot.as_mut() {
                    session.expire_message(&text);
                }
            }
            Err(_) => debug!("session busy; message expiry skipped"),
        });
    });
    if let Err(e) = win.set_timeout_with_callback_and_timeout_and_arguments_0(expire.unchecked_ref(), ttl_ms as i32) {
        warn!("failed to schedule message expiry: {e:?}");
    }
}

fn on_clock_tick() {
    let banner = SESSION.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().and_then(Session::tick),
        Err(_) => {
            debug!("session busy; tick skipped");
            None
        }
    });
    if let Some(message) = banner {
        schedule_expiry(message);
    }
}

fn busy() -> JsValue {
    JsValue::from_str("game is busy; do not call back into it from a listener")
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Result<R, JsValue> {
    SESSION.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| busy())?;
        slot.as_mut()
            .map(f)
            .ok_or_else(|| JsValue::from_str("game not initialised; call init_game first"))
    })
}

/// Empties the slot. The old session is disposed after the borrow is released,
/// since its listeners may still run during teardown.
fn take_session() -> Result<Option<Session>, JsValue> {
    SESSION.with(|cell| cell.try_borrow_mut().map(|mut slot| slot.take()).map_err(|_| busy()))
}

fn state_payload(state: &GameState) -> JsValue {
    #[cfg(feature = "serde_json")]
    {
        match serde_json::to_string(state) {
            Ok(json) => JsValue::from_str(&json),
            Err(e) => {
                warn!("failed to serialise state: {e}");
                JsValue::NULL
            }
        }
    }
    #[cfg(not(feature = "serde_json"))]
    {
        JsValue::from(state.score)
    }
}

// --- Exports -----------------------------------------------------------------

/// Builds the session. Falls back to an inert game (still answering phase and
/// score) when the configuration is invalid. Replaces any existing session;
/// fails while a session call is in progress.
#[wasm_bindgen]
pub fn init_game(config_json: Option<String>, asset_base: Option<String>) -> Result<(), JsValue> {
    dispose_game()?;

    let mobile = detect_mobile();
    MOBILE.with(|m| m.set(mobile));

    let machine = resolve_config(config_json, mobile).and_then(|config| {
        let clock = IntervalClock::new(TICK_INTERVAL_MS, on_clock_tick);
        let store = LocalStorageScoreStore::default();
        RoundMachine::new(config, rng::entropy(), Box::new(clock), Box::new(store))
    });
    let (game, config): (Box<dyn GameHandle>, GameConfig) = match machine {
        Ok(m) => {
            let config = m.config().clone();
            (Box::new(m), config)
        }
        Err(e) => {
            error!("game unavailable, using inert stand-in: {e}");
            (Box::new(InertGame::new()), GameConfig::default())
        }
    };

    let fx_config = FxConfig {
        base_url: asset_base.unwrap_or_default(),
        ..FxConfig::default()
    };
    fx_config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut fx = FxPlayer::new(Box::new(HtmlAudioBackend::new()), fx_config, rng::entropy());
    let loaded = fx.preload();
    info!(
        "whoopee chaos ready (mobile: {mobile}, capacity: {}, sounds: {loaded})",
        config.capacity
    );

    let session = Session::new(game, fx, rng::entropy(), config);
    SESSION.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| busy())?;
        *slot = Some(session);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn start_game() -> Result<bool, JsValue> {
    with_session(Session::start)
}

#[wasm_bindgen]
pub fn restart_game() -> Result<bool, JsValue> {
    with_session(Session::restart)
}

/// Returns whether the click scored.
#[wasm_bindgen]
pub fn click_target(index: u32) -> Result<bool, JsValue> {
    let message = with_session(|s| s.click_target(index as usize))?;
    match message {
        Some(m) => {
            vibrate();
            schedule_expiry(m);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[wasm_bindgen]
pub fn post_message(text: String) -> Result<bool, JsValue> {
    with_session(|s| s.post_message(text))
}

/// Generic entry point: `start`, `restart`, `activate` (index), `tick`,
/// `message` (text), `clear_message`. Behaves like the dedicated exports.
/// Unknown commands are logged and ignored.
#[wasm_bindgen]
pub fn dispatch_command(kind: &str, index: Option<u32>, text: Option<String>) -> Result<bool, JsValue> {
    let command = match Command::parse(kind, index, text) {
        Ok(command) => command,
        Err(e) => {
            warn!("ignoring command: {e}");
            return Ok(false);
        }
    };
    let activation = matches!(command, Command::ActivateTarget(_));
    let out = with_session(|s| s.dispatch(command))?;
    if activation && out.changed {
        vibrate();
    }
    if let Some(message) = out.expire {
        schedule_expiry(message);
    }
    Ok(out.changed)
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn game_state_json() -> Result<String, JsValue> {
    with_session(|s| serde_json::to_string(s.state()))?.map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Registers `callback(snapshot)`, called after every state change. The
/// snapshot is a JSON string (or the score when built without `serde_json`).
#[wasm_bindgen]
pub fn subscribe_state(callback: js_sys::Function) -> Result<u32, JsValue> {
    with_session(|s| {
        s.subscribe(Box::new(move |state| {
            if let Err(e) = callback.call1(&JsValue::NULL, &state_payload(state)) {
                warn!("state listener threw: {e:?}");
            }
        }))
        .raw()
    })
}

#[wasm_bindgen]
pub fn unsubscribe_state(id: u32) -> Result<bool, JsValue> {
    with_session(|s| s.unsubscribe(ListenerId::from_raw(id)))
}

#[wasm_bindgen]
pub fn set_sound_enabled(enabled: bool) -> Result<(), JsValue> {
    with_session(|s| s.fx().borrow_mut().set_muted(!enabled))
}

/// Returns the new muted flag.
#[wasm_bindgen]
pub fn toggle_mute() -> Result<bool, JsValue> {
    with_session(|s| s.fx().borrow_mut().toggle_muted())
}

/// Stops the clock, drops listeners and releases audio. Safe to call twice;
/// fails while a session call is in progress.
#[wasm_bindgen]
pub fn dispose_game() -> Result<(), JsValue> {
    if let Some(mut session) = take_session()? {
        session.dispose();
        debug!("session disposed");
    }
    Ok(())
}
