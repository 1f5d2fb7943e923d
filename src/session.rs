//! Host-agnostic pairing of a game and the effects player.
//!
//! The session subscribes a forwarder that turns transitions into sounds,
//! attaches a themed deity quote to every successful click, and tells the host
//! which messages to expire and when. The browser host wraps one of these in a
//! `thread_local!`; native tests drive it directly.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::config::GameConfig;
use crate::data;
use crate::fx::{FxPlayer, PlayOptions, SoundId};
use crate::rng::RandomSource;
use crate::round::{Command, GameHandle, GameState, LastAction, Listener, ListenerId};

/// A message the host should clear after `ttl_ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedMessage {
    pub text: String,
    pub ttl_ms: u32,
}

/// Result of [`Session::dispatch`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatched {
    pub changed: bool,
    /// Message to clear later, if the command put one up.
    pub expire: Option<TimedMessage>,
}

impl Dispatched {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            expire: None,
        }
    }
}

pub struct Session {
    game: Box<dyn GameHandle>,
    fx: Rc<RefCell<FxPlayer>>,
    quote_rng: Box<dyn RandomSource>,
    config: GameConfig,
}

impl Session {
    pub fn new(
        mut game: Box<dyn GameHandle>,
        fx: FxPlayer,
        quote_rng: Box<dyn RandomSource>,
        config: GameConfig,
    ) -> Self {
        let fx = Rc::new(RefCell::new(fx));
        let forward = fx.clone();
        game.subscribe(Box::new(move |state| play_for_transition(&mut forward.borrow_mut(), state)));
        Self {
            game,
            fx,
            quote_rng,
            config,
        }
    }

    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    pub fn fx(&self) -> &Rc<RefCell<FxPlayer>> {
        &self.fx
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        self.game.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.game.unsubscribe(id)
    }

    pub fn start(&mut self) -> bool {
        self.fx.borrow_mut().on_user_interaction();
        self.game.dispatch(Command::Start)
    }

    pub fn restart(&mut self) -> bool {
        self.fx.borrow_mut().on_user_interaction();
        self.game.dispatch(Command::Restart)
    }

    /// Activates a target and, if that changed anything, posts a quote matching
    /// the target's theme.
    pub fn click_target(&mut self, index: usize) -> Option<TimedMessage> {
        self.fx.borrow_mut().on_user_interaction();
        if !self.game.dispatch(Command::ActivateTarget(index)) {
            return None;
        }
        let theme = self.game.state().active_targets[index].variant.theme;
        let text = data::quote_for_theme(theme, self.quote_rng.as_mut()).to_string();
        self.game.dispatch(Command::PostMessage(text.clone()));
        Some(TimedMessage {
            text,
            ttl_ms: self.config.quote_message_ms,
        })
    }

    /// One clock tick. Returns the round banner when a round just ended.
    pub fn tick(&mut self) -> Option<TimedMessage> {
        self.advance().expire
    }

    fn advance(&mut self) -> Dispatched {
        if !self.game.dispatch(Command::Tick) {
            return Dispatched::default();
        }
        let state = self.game.state();
        let expire = match (state.last_action, &state.current_message) {
            (Some(LastAction::RoundEnded), Some(text)) => Some(TimedMessage {
                text: text.clone(),
                ttl_ms: self.config.round_message_ms,
            }),
            _ => None,
        };
        Dispatched { changed: true, expire }
    }

    pub fn post_message(&mut self, text: impl Into<String>) -> bool {
        self.game.dispatch(Command::PostMessage(text.into()))
    }

    /// Clears the message only if it is still `text`; a newer one stays up.
    pub fn expire_message(&mut self, text: &str) -> bool {
        if self.game.state().current_message.as_deref() != Some(text) {
            return false;
        }
        self.game.dispatch(Command::ClearMessage)
    }

    /// Routes a decoded host command through the same paths as the dedicated
    /// entry points, so gestures unlock audio and clicks get their quote.
    pub fn dispatch(&mut self, command: Command) -> Dispatched {
        match command {
            Command::Start => Dispatched::changed(self.start()),
            Command::Restart => Dispatched::changed(self.restart()),
            Command::ActivateTarget(index) => {
                let expire = self.click_target(index);
                Dispatched {
                    changed: expire.is_some(),
                    expire,
                }
            }
            Command::Tick => self.advance(),
            Command::PostMessage(text) => Dispatched::changed(self.post_message(text)),
            Command::ClearMessage => Dispatched::changed(self.game.dispatch(Command::ClearMessage)),
        }
    }

    pub fn dispose(&mut self) {
        self.game.dispose();
        self.fx.borrow_mut().dispose();
    }
}

fn play_for_transition(fx: &mut FxPlayer, state: &GameState) {
    match state.last_action {
        Some(LastAction::TargetActivated) => {
            if let Some(target) = state.last_target() {
                fx.play_activation(target.variant.id);
            }
        }
        Some(LastAction::GameStarted) => fx.play(SoundId::RoundStart, PlayOptions::default()),
        Some(LastAction::RoundEnded) => fx.play(SoundId::RoundEnd, PlayOptions::default()),
        Some(LastAction::GameOver) => fx.play(SoundId::GameOver, PlayOptions::default()),
        other => debug!("no sound for {other:?}"),
    }
}
