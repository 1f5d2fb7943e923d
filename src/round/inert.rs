// Inert stand-in for the round machine.
//
// Selected by the host when the real machine cannot be constructed, so the UI
// still has a phase and a score to show. It stays in `Intro` with score 0,
// ignores every command and never notifies.

use log::warn;

use super::{Command, GameHandle, GameState, Listener, ListenerId};

#[derive(Debug, Default)]
pub struct InertGame {
    state: GameState,
    next_listener: u32,
}

impl InertGame {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameHandle for InertGame {
    fn dispatch(&mut self, command: Command) -> bool {
        warn!("game unavailable, ignoring {command:?}");
        false
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn subscribe(&mut self, _listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    fn unsubscribe(&mut self, _id: ListenerId) -> bool {
        false
    }

    fn dispose(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Phase;

    #[test]
    fn answers_queries_and_ignores_commands() {
        let mut g = InertGame::new();
        assert!(!g.dispatch(Command::Start));
        assert!(!g.dispatch(Command::ActivateTarget(0)));
        assert_eq!(g.phase(), Phase::Intro);
        assert_eq!(g.score(), 0);
        let id = g.subscribe(Box::new(|_| panic!("inert game must not notify")));
        g.dispatch(Command::Tick);
        assert!(!g.unsubscribe(id));
    }
}
