//! Game and effects tunables.
//!
//! Defaults mirror the desktop build; [`GameConfig::mobile`] lowers the target
//! capacity for phones where many animated cushions get sluggish.

use crate::error::ConfigError;

/// How variants are drawn when a round's targets are generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SamplingPolicy {
    /// Each target draws independently; duplicates within a round are allowed.
    #[default]
    Independent,
    /// Draw from a shuffled copy of the table; reshuffle once it runs out.
    WithoutReplacement,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Targets in the first round, and the base of the growth formula.
    pub initial_targets: usize,
    /// Upper bound on targets per round.
    pub capacity: usize,
    /// Round length in ticks (one tick per second in the browser).
    pub max_round_time: u32,
    pub layout_radius: f32,
    pub sampling: SamplingPolicy,
    /// How long a deity quote stays on screen.
    pub quote_message_ms: u32,
    /// How long the "round complete" banner stays on screen.
    pub round_message_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_targets: 3,
            capacity: 7,
            max_round_time: 30,
            layout_radius: 3.0,
            sampling: SamplingPolicy::Independent,
            quote_message_ms: 5_000,
            round_message_ms: 3_000,
        }
    }
}

impl GameConfig {
    pub fn mobile() -> Self {
        Self {
            capacity: 5,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_targets == 0 {
            return Err(ConfigError::NoTargets);
        }
        if self.capacity < self.initial_targets {
            return Err(ConfigError::CapacityBelowInitial {
                initial: self.initial_targets,
                capacity: self.capacity,
            });
        }
        if self.max_round_time == 0 {
            return Err(ConfigError::ZeroRoundTime);
        }
        if !(self.layout_radius > 0.0) {
            return Err(ConfigError::BadRadius(self.layout_radius));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FxConfig {
    /// Prefix for asset URLs, e.g. `/whoopee-chaos` when served from a subpath.
    pub base_url: String,
    /// Quietest activation volume.
    pub jitter_min: f32,
    /// Random spread added on top of `jitter_min`.
    pub jitter_span: f32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            jitter_min: 0.7,
            jitter_span: 0.3,
        }
    }
}

impl FxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.jitter_min + self.jitter_span;
        if self.jitter_min < 0.0 || self.jitter_span < 0.0 || max > 1.0 {
            return Err(ConfigError::BadJitter {
                min: self.jitter_min,
                max,
            });
        }
        Ok(())
    }

    pub fn asset_url(&self, file: &str) -> String {
        format!("{}/assets/sounds/{}", self.base_url.trim_end_matches('/'), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::mobile().validate(), Ok(()));
        assert_eq!(FxConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_capacity_below_initial() {
        let cfg = GameConfig {
            initial_targets: 4,
            capacity: 2,
            ..GameConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CapacityBelowInitial {
                initial: 4,
                capacity: 2
            })
        );
    }

    #[test]
    fn rejects_zero_round_and_bad_radius() {
        let zero = GameConfig {
            max_round_time: 0,
            ..GameConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroRoundTime));
        let nan = GameConfig {
            layout_radius: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::BadRadius(_))));
    }

    #[test]
    fn asset_url_joins_base() {
        let fx = FxConfig {
            base_url: "/whoopee-chaos/".into(),
            ..FxConfig::default()
        };
        assert_eq!(fx.asset_url("fart1.mp3"), "/whoopee-chaos/assets/sounds/fart1.mp3");
        assert_eq!(FxConfig::default().asset_url("x.mp3"), "/assets/sounds/x.mp3");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_fills_missing_fields_from_defaults() {
        let cfg = GameConfig::from_json(r#"{"capacity": 5, "sampling": "without_replacement"}"#).unwrap();
        assert_eq!(cfg.capacity, 5);
        assert_eq!(cfg.initial_targets, 3);
        assert_eq!(cfg.sampling, SamplingPolicy::WithoutReplacement);
        assert!(GameConfig::from_json(r#"{"initial_targets": 0}"#).is_err());
    }
}
