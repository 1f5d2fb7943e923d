//! Sound effects.
//!
//! [`FxPlayer`] picks and plays named sounds through a [`SoundBackend`]. It
//! knows nothing about game state; the session forwards the transitions that
//! should make noise. Every failure stops at this boundary: it is logged and
//! the caller carries on.

use log::{debug, warn};

use crate::config::FxConfig;
use crate::error::FxError;
use crate::rng::RandomSource;

mod recording;

pub use recording::{BackendCall, RecordingBackend};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    Fart1,
    Fart2,
    Fart3,
    Fart4,
    RoundStart,
    RoundEnd,
    GameOver,
}

impl SoundId {
    pub const ALL: [SoundId; 7] = [
        SoundId::Fart1,
        SoundId::Fart2,
        SoundId::Fart3,
        SoundId::Fart4,
        SoundId::RoundStart,
        SoundId::RoundEnd,
        SoundId::GameOver,
    ];

    /// The interchangeable activation sounds, indexed by `variant_id % 4`.
    pub const ACTIVATION: [SoundId; 4] = [SoundId::Fart1, SoundId::Fart2, SoundId::Fart3, SoundId::Fart4];

    pub fn name(self) -> &'static str {
        match self {
            SoundId::Fart1 => "fart1",
            SoundId::Fart2 => "fart2",
            SoundId::Fart3 => "fart3",
            SoundId::Fart4 => "fart4",
            SoundId::RoundStart => "round_start",
            SoundId::RoundEnd => "round_end",
            SoundId::GameOver => "game_over",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn file_name(self) -> String {
        format!("{}.mp3", self.name())
    }

    pub fn for_variant(variant_id: u32) -> Self {
        Self::ACTIVATION[(variant_id % 4) as usize]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayOptions {
    pub volume: Option<f32>,
    pub looped: Option<bool>,
}

impl PlayOptions {
    pub fn volume(volume: f32) -> Self {
        Self {
            volume: Some(volume),
            looped: None,
        }
    }
}

/// Audio output used by [`FxPlayer`].
pub trait SoundBackend {
    fn load(&mut self, id: SoundId, url: &str) -> Result<(), FxError>;
    /// Restarts `id` from the beginning with the given overrides.
    fn play(&mut self, id: SoundId, options: PlayOptions) -> Result<(), FxError>;
    fn stop(&mut self, id: SoundId);
    fn release(&mut self, id: SoundId);

    /// Playbacks refused by autoplay policy after `play` returned, with the
    /// options they were started with. Other rejections (e.g. a pause
    /// interrupting playback) must not be reported here.
    fn take_rejected(&mut self) -> Vec<(SoundId, PlayOptions)> {
        Vec::new()
    }
}

pub struct FxPlayer {
    backend: Option<Box<dyn SoundBackend>>,
    config: FxConfig,
    rng: Box<dyn RandomSource>,
    loaded: Vec<SoundId>,
    muted: bool,
    // Playbacks refused by autoplay policy, retried once on the next user gesture.
    pending_retry: Vec<(SoundId, PlayOptions)>,
}

impl FxPlayer {
    pub fn new(backend: Box<dyn SoundBackend>, config: FxConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            backend: Some(backend),
            config,
            rng,
            loaded: Vec::new(),
            muted: false,
            pending_retry: Vec::new(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_disposed(&self) -> bool {
        self.backend.is_none()
    }

    pub fn is_loaded(&self, id: SoundId) -> bool {
        self.loaded.contains(&id)
    }

    /// Loads every sound, isolating failures per item. Returns how many loaded.
    pub fn preload(&mut self) -> usize {
        let Some(backend) = self.backend.as_mut() else {
            return 0;
        };
        for id in SoundId::ALL {
            if self.loaded.contains(&id) {
                continue;
            }
            let url = self.config.asset_url(&id.file_name());
            match backend.load(id, &url) {
                Ok(()) => self.loaded.push(id),
                Err(e) => warn!("{e}"),
            }
        }
        debug!("preloaded {}/{} sounds", self.loaded.len(), SoundId::ALL.len());
        self.loaded.len()
    }

    /// Plays the activation sound for a variant with a little volume jitter.
    pub fn play_activation(&mut self, variant_id: u32) {
        if self.muted || self.backend.is_none() {
            return;
        }
        let volume = self.config.jitter_min + self.rng.next_unit() * self.config.jitter_span;
        self.play(SoundId::for_variant(variant_id), PlayOptions::volume(volume));
    }

    pub fn play_named(&mut self, name: &str, options: PlayOptions) {
        match SoundId::from_name(name) {
            Some(id) => self.play(id, options),
            None => warn!("{}", FxError::UnknownSound(name.to_string())),
        }
    }

    pub fn play(&mut self, id: SoundId, options: PlayOptions) {
        if self.muted {
            return;
        }
        if !self.loaded.contains(&id) {
            warn!("sound {} not loaded", id.name());
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        match backend.play(id, options) {
            Ok(()) => {}
            Err(FxError::Blocked(name)) => {
                warn!("playback of {name} blocked, will retry after next interaction");
                self.pending_retry.push((id, options));
            }
            Err(e) => warn!("{e}"),
        }
    }

    /// Retries playbacks the browser refused, once each. Call on user gestures.
    pub fn on_user_interaction(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let mut retries = std::mem::take(&mut self.pending_retry);
        retries.extend(backend.take_rejected());
        if self.muted {
            return;
        }
        for (id, options) in retries {
            if let Err(e) = backend.play(id, options) {
                warn!("retry failed: {e}");
            }
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        let was_muted = self.muted;
        self.muted = muted;
        if muted {
            self.stop_all();
        } else if was_muted {
            // Nothing plays while muted; anything rejected meanwhile was cut off by the mute.
            self.forget_retries();
        }
    }

    /// Flips the mute flag and returns the new value.
    pub fn toggle_muted(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    /// Stops every sound and forgets pending retries; a stopped sound never replays.
    pub fn stop_all(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            for id in &self.loaded {
                backend.stop(*id);
            }
        }
        self.forget_retries();
    }

    fn forget_retries(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.take_rejected();
        }
        self.pending_retry.clear();
    }

    /// Stops and releases everything; the player is inert afterwards.
    pub fn dispose(&mut self) {
        self.stop_all();
        if let Some(mut backend) = self.backend.take() {
            for id in self.loaded.drain(..) {
                backend.release(id);
            }
        }
    }
}
