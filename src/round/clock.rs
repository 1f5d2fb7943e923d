// Round clock and high-score store seams.
//
// The machine owns both through trait objects so the browser host can plug in
// `setInterval` and `localStorage` while native code and tests drive ticks by hand.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::StorageError;

/// Periodic source of `tick()` calls. The machine only starts and stops it;
/// the implementation is responsible for delivering ticks back to the game.
pub trait RoundClock {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Clock that never fires on its own. Callers tick the machine themselves and
/// can observe the running flag through a cloned handle.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    running: Rc<Cell<bool>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoundClock for ManualClock {
    fn start(&mut self) {
        self.running.set(true);
    }

    fn stop(&mut self) {
        self.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Persistent best score.
pub trait ScoreStore {
    fn load(&self) -> Result<u32, StorageError>;
    fn save(&mut self, score: u32) -> Result<(), StorageError>;
}

/// In-process store; clones share the same value.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    value: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    pub fn with_value(score: u32) -> Self {
        Self {
            value: Rc::new(Cell::new(score)),
        }
    }

    pub fn get(&self) -> u32 {
        self.value.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32, StorageError> {
        Ok(self.value.get())
    }

    fn save(&mut self, score: u32) -> Result<(), StorageError> {
        self.value.set(score);
        Ok(())
    }
}
