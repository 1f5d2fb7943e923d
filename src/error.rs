//! Error types for the crate's internal boundaries.
//!
//! Game commands themselves never fail: an invalid command is a silent no-op.
//! These errors only travel across the seams where something external can go
//! wrong (configuration, host command decoding, audio, storage) and are logged
//! at the point where they are swallowed.

/// Invalid tunables in [`GameConfig`](crate::config::GameConfig) or
/// [`FxConfig`](crate::config::FxConfig).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial target count must be at least 1")]
    NoTargets,

    #[error("target capacity {capacity} is below the initial count {initial}")]
    CapacityBelowInitial { initial: usize, capacity: usize },

    #[error("round duration must be at least one second")]
    ZeroRoundTime,

    #[error("layout radius must be positive, got {0}")]
    BadRadius(f32),

    #[error("volume jitter band {min}..{max} is outside 0.0..=1.0")]
    BadJitter { min: f32, max: f32 },

    #[error("could not parse config: {0}")]
    Parse(String),
}

/// A host command that could not be decoded into a [`Command`](crate::round::Command).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("command '{0}' is missing its payload")]
    MissingPayload(&'static str),
}

/// Sound loading or playback failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    #[error("unknown sound '{0}'")]
    UnknownSound(String),

    #[error("failed to load sound {id}: {reason}")]
    Load { id: &'static str, reason: String },

    /// Playback refused by the browser's autoplay policy; eligible for a retry
    /// after the next user gesture.
    #[error("playback of {0} blocked until user interaction")]
    Blocked(&'static str),

    #[error("failed to play sound {id}: {reason}")]
    Playback { id: &'static str, reason: String },
}

/// High-score persistence failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("score storage is unavailable")]
    Unavailable,

    #[error("failed to read stored score: {0}")]
    Read(String),

    #[error("failed to write score: {0}")]
    Write(String),

    #[error("stored score '{0}' is not a number")]
    Corrupt(String),
}
