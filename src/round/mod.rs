//! Round state machine.
//!
//! Phases run `Intro -> Playing -> ... -> GameOver -> Playing`. A round lasts
//! `max_round_time` ticks; when it expires the machine either starts the next
//! (larger) round or ends the game if nothing was clicked.
//!
//! Every successful command builds the next [`GameState`] from a copy of the
//! current one, swaps it in, and then notifies listeners in registration
//! order before returning. Rejected commands change nothing and notify no one.

use log::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::{CommandError, ConfigError};
use crate::rng::RandomSource;

mod clock;
mod inert;
mod targets;

pub use clock::{ManualClock, MemoryScoreStore, RoundClock, ScoreStore};
pub use inert::InertGame;
pub use targets::{Target, generate_targets, target_count};

pub const ROUND_COMPLETE_MESSAGE: &str = "Round complete! Divine chaos increases...";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Phase {
    #[default]
    Intro,
    Playing,
    GameOver,
}

/// Kind of the most recent transition, for subscribers choosing side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LastAction {
    GameStarted,
    RoundTick,
    RoundEnded,
    TargetActivated,
    MessagePosted,
    MessageCleared,
    GameOver,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameState {
    pub phase: Phase,
    pub score: u32,
    pub rounds_survived: u32,
    pub round_time: u32,
    pub max_round_time: u32,
    pub active_targets: Vec<Target>,
    pub current_message: Option<String>,
    pub last_action: Option<LastAction>,
    pub last_target_index: Option<usize>,
    pub high_score: u32,
}

impl GameState {
    pub fn activated_count(&self) -> usize {
        self.active_targets.iter().filter(|t| t.activated).count()
    }

    /// Target touched by the latest transition, if it was an activation.
    pub fn last_target(&self) -> Option<&Target> {
        match self.last_action {
            Some(LastAction::TargetActivated) => self.active_targets.get(self.last_target_index?),
            _ => None,
        }
    }

    fn record(&mut self, action: LastAction) {
        self.last_action = Some(action);
        self.last_target_index = None;
    }
}

/// Host-issued commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    ActivateTarget(usize),
    Tick,
    PostMessage(String),
    ClearMessage,
}

impl Command {
    /// Decodes a command coming from JS: a name plus optional index / text payload.
    pub fn parse(kind: &str, index: Option<u32>, text: Option<String>) -> Result<Self, CommandError> {
        match kind {
            "start" => Ok(Command::Start),
            "restart" => Ok(Command::Restart),
            "activate" => index
                .map(|i| Command::ActivateTarget(i as usize))
                .ok_or(CommandError::MissingPayload("activate")),
            "tick" => Ok(Command::Tick),
            "message" => text.map(Command::PostMessage).ok_or(CommandError::MissingPayload("message")),
            "clear_message" => Ok(Command::ClearMessage),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

impl ListenerId {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

pub type Listener = Box<dyn FnMut(&GameState)>;

/// What the host talks to. Implemented by the real [`RoundMachine`] and by the
/// [`InertGame`] stand-in used when the machine cannot be built.
pub trait GameHandle {
    /// Applies a command; returns whether the state changed.
    fn dispatch(&mut self, command: Command) -> bool;
    fn state(&self) -> &GameState;
    fn subscribe(&mut self, listener: Listener) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
    fn dispose(&mut self);

    fn phase(&self) -> Phase {
        self.state().phase
    }

    fn score(&self) -> u32 {
        self.state().score
    }
}

pub struct RoundMachine {
    state: GameState,
    config: GameConfig,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn RoundClock>,
    store: Box<dyn ScoreStore>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u32,
    disposed: bool,
}

impl RoundMachine {
    /// Builds a machine in `Intro`, reading the stored high score once.
    pub fn new(
        config: GameConfig,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn RoundClock>,
        store: Box<dyn ScoreStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let high_score = store.load().unwrap_or_else(|e| {
            warn!("high score unavailable, starting from 0: {e}");
            0
        });
        let state = GameState {
            max_round_time: config.max_round_time,
            high_score,
            ..GameState::default()
        };
        Ok(Self {
            state,
            config,
            rng,
            clock,
            store,
            listeners: Vec::new(),
            next_listener: 0,
            disposed: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn start(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        if self.state.phase == Phase::Playing {
            debug!("start ignored: round already in progress");
            return false;
        }
        self.begin_game();
        true
    }

    pub fn restart(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.clock.stop();
        self.begin_game();
        true
    }

    /// First click wins: an out-of-range or already-activated index is ignored.
    pub fn activate_target(&mut self, index: usize) -> bool {
        if self.disposed || self.state.phase != Phase::Playing {
            return false;
        }
        let Some(target) = self.state.active_targets.get(index) else {
            return false;
        };
        if target.activated {
            return false;
        }
        let mut next = self.state.clone();
        next.active_targets[index].activated = true;
        next.score += next.active_targets[index].variant.score_value;
        next.record(LastAction::TargetActivated);
        next.last_target_index = Some(index);
        self.commit(next);
        true
    }

    pub fn tick(&mut self) -> bool {
        if self.disposed || self.state.phase != Phase::Playing {
            return false;
        }
        let elapsed = self.state.round_time + 1;
        if elapsed >= self.state.max_round_time {
            self.end_round();
        } else {
            let mut next = self.state.clone();
            next.round_time = elapsed;
            next.record(LastAction::RoundTick);
            self.commit(next);
        }
        true
    }

    pub fn post_message(&mut self, text: impl Into<String>) -> bool {
        if self.disposed {
            return false;
        }
        let mut next = self.state.clone();
        next.current_message = Some(text.into());
        next.record(LastAction::MessagePosted);
        self.commit(next);
        true
    }

    pub fn clear_message(&mut self) -> bool {
        if self.disposed || self.state.current_message.is_none() {
            return false;
        }
        let mut next = self.state.clone();
        next.current_message = None;
        next.record(LastAction::MessageCleared);
        self.commit(next);
        true
    }

    fn begin_game(&mut self) {
        let targets = generate_targets(
            self.config.initial_targets,
            self.config.layout_radius,
            self.config.sampling,
            self.rng.as_mut(),
        );
        let mut next = self.state.clone();
        next.phase = Phase::Playing;
        next.score = 0;
        next.rounds_survived = 0;
        next.round_time = 0;
        next.active_targets = targets;
        next.record(LastAction::GameStarted);
        info!("game started with {} targets", next.active_targets.len());
        self.clock.start();
        self.commit(next);
    }

    fn end_round(&mut self) {
        let mut next = self.state.clone();
        if next.activated_count() == 0 {
            self.clock.stop();
            next.phase = Phase::GameOver;
            next.round_time = next.max_round_time;
            next.current_message = None;
            next.record(LastAction::GameOver);
            if next.score > next.high_score {
                next.high_score = next.score;
                if let Err(e) = self.store.save(next.score) {
                    warn!("failed to persist high score {}: {e}", next.score);
                }
            }
            info!(
                "game over: score {} after {} rounds",
                next.score, next.rounds_survived
            );
        } else {
            next.rounds_survived += 1;
            let count = target_count(
                self.config.initial_targets,
                next.rounds_survived,
                self.config.capacity,
            );
            next.active_targets = generate_targets(
                count,
                self.config.layout_radius,
                self.config.sampling,
                self.rng.as_mut(),
            );
            next.round_time = 0;
            next.current_message = Some(ROUND_COMPLETE_MESSAGE.to_string());
            next.record(LastAction::RoundEnded);
            debug!("round {} complete, next round has {count} targets", next.rounds_survived);
        }
        self.commit(next);
    }

    fn commit(&mut self, next: GameState) {
        self.state = next;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }
}

impl GameHandle for RoundMachine {
    fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Restart => self.restart(),
            Command::ActivateTarget(i) => self.activate_target(i),
            Command::Tick => self.tick(),
            Command::PostMessage(text) => self.post_message(text),
            Command::ClearMessage => self.clear_message(),
        }
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        if !self.disposed {
            self.listeners.push((id, listener));
        }
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn dispose(&mut self) {
        self.clock.stop();
        self.listeners.clear();
        self.disposed = true;
    }
}

impl Drop for RoundMachine {
    fn drop(&mut self) {
        self.clock.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn machine(indices: Vec<usize>) -> (RoundMachine, ManualClock) {
        let clock = ManualClock::new();
        let m = RoundMachine::new(
            GameConfig::default(),
            Box::new(ScriptedRandom::new(indices)),
            Box::new(clock.clone()),
            Box::new(MemoryScoreStore::default()),
        )
        .unwrap();
        (m, clock)
    }

    #[test]
    fn starts_in_intro_and_ignores_play_commands() {
        let (mut m, clock) = machine(vec![0]);
        assert_eq!(m.state().phase, Phase::Intro);
        assert!(!m.activate_target(0));
        assert!(!m.tick());
        assert!(!clock.is_running());
    }

    #[test]
    fn start_generates_initial_round() {
        let (mut m, clock) = machine(vec![2]);
        assert!(m.start());
        let s = m.state();
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.active_targets.len(), 3);
        assert_eq!(s.last_action, Some(LastAction::GameStarted));
        assert!(clock.is_running());
        // Second start mid-round is ignored.
        assert!(!m.start());
    }

    #[test]
    fn activation_is_first_click_wins() {
        let (mut m, _) = machine(vec![2]);
        m.start();
        assert!(m.activate_target(1));
        assert_eq!(m.state().score, 3);
        assert_eq!(m.state().last_target_index, Some(1));
        assert!(!m.activate_target(1));
        assert!(!m.activate_target(3));
        assert_eq!(m.state().score, 3);
    }

    #[test]
    fn last_target_index_cleared_by_other_transitions() {
        let (mut m, _) = machine(vec![0]);
        m.start();
        m.activate_target(0);
        assert!(m.state().last_target().is_some());
        m.tick();
        assert_eq!(m.state().last_target_index, None);
        assert!(m.state().last_target().is_none());
    }

    #[test]
    fn clear_message_only_when_present() {
        let (mut m, _) = machine(vec![0]);
        assert!(!m.clear_message());
        m.post_message("hi");
        assert_eq!(m.state().current_message.as_deref(), Some("hi"));
        assert!(m.clear_message());
        assert_eq!(m.state().last_action, Some(LastAction::MessageCleared));
    }

    #[test]
    fn listeners_run_in_order_after_commit() {
        let (mut m, _) = machine(vec![0]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = log.clone();
        m.subscribe(Box::new(move |s| a.borrow_mut().push(("a", s.phase))));
        let b = log.clone();
        let id = m.subscribe(Box::new(move |s| b.borrow_mut().push(("b", s.phase))));
        m.start();
        assert_eq!(*log.borrow(), vec![("a", Phase::Playing), ("b", Phase::Playing)]);
        assert!(m.unsubscribe(id));
        assert!(!m.unsubscribe(id));
        m.tick();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn command_parse() {
        assert_eq!(Command::parse("activate", Some(2), None), Ok(Command::ActivateTarget(2)));
        assert_eq!(
            Command::parse("activate", None, None),
            Err(CommandError::MissingPayload("activate"))
        );
        assert_eq!(
            Command::parse("message", None, Some("yo".into())),
            Ok(Command::PostMessage("yo".into()))
        );
        assert_eq!(
            Command::parse("explode", None, None),
            Err(CommandError::Unknown("explode".into()))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GameConfig {
            initial_targets: 0,
            ..GameConfig::default()
        };
        let r = RoundMachine::new(
            cfg,
            Box::new(ScriptedRandom::default()),
            Box::new(ManualClock::new()),
            Box::new(MemoryScoreStore::default()),
        );
        assert!(matches!(r, Err(ConfigError::NoTargets)));
    }
}
