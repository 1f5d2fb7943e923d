// Headless sound backend.
//
// Records every call instead of producing audio. Useful for native hosts and
// for asserting what the player did; clones share one call log. Failures can
// be injected per sound to exercise the player's error paths.

use std::cell::RefCell;
use std::rc::Rc;

use super::{PlayOptions, SoundBackend, SoundId};
use crate::error::FxError;

#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    Load(SoundId, String),
    Play(SoundId, PlayOptions),
    Stop(SoundId),
    Release(SoundId),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<BackendCall>,
    failing_loads: Vec<SoundId>,
    blocked_plays: usize,
    rejected: Vec<(SoundId, PlayOptions)>,
}

#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    inner: Rc<RefCell<Inner>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes loading `id` fail.
    pub fn failing_load(self, id: SoundId) -> Self {
        self.inner.borrow_mut().failing_loads.push(id);
        self
    }

    /// Makes the next `n` plays fail as blocked by autoplay policy.
    pub fn blocking_first(self, n: usize) -> Self {
        self.inner.borrow_mut().blocked_plays = n;
        self
    }

    /// Queues an asynchronous autoplay rejection for a playback of `id`.
    pub fn reject(&self, id: SoundId, options: PlayOptions) {
        self.inner.borrow_mut().rejected.push((id, options));
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn loads(&self) -> Vec<SoundId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Load(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Successful plays, in order.
    pub fn plays(&self) -> Vec<(SoundId, PlayOptions)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Play(id, opts) => Some((id, opts)),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> Vec<SoundId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Stop(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn releases(&self) -> Vec<SoundId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Release(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

impl SoundBackend for RecordingBackend {
    fn load(&mut self, id: SoundId, url: &str) -> Result<(), FxError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(BackendCall::Load(id, url.to_string()));
        if inner.failing_loads.contains(&id) {
            return Err(FxError::Load {
                id: id.name(),
                reason: "injected failure".into(),
            });
        }
        Ok(())
    }

    fn play(&mut self, id: SoundId, options: PlayOptions) -> Result<(), FxError> {
        let mut inner = self.inner.borrow_mut();
        if inner.blocked_plays > 0 {
            inner.blocked_plays -= 1;
            return Err(FxError::Blocked(id.name()));
        }
        inner.calls.push(BackendCall::Play(id, options));
        Ok(())
    }

    fn stop(&mut self, id: SoundId) {
        self.inner.borrow_mut().calls.push(BackendCall::Stop(id));
    }

    fn release(&mut self, id: SoundId) {
        self.inner.borrow_mut().calls.push(BackendCall::Release(id));
    }

    fn take_rejected(&mut self) -> Vec<(SoundId, PlayOptions)> {
        std::mem::take(&mut self.inner.borrow_mut().rejected)
    }
}
