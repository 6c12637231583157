//! Coordinator configuration
//!
//! Every field has a default, so a `tandem.toml` only needs the values it
//! changes:
//!
//! ```toml
//! handoff = "intercept_only"
//! handoff_threshold = 25.0
//!
//! [decay]
//! friction = 3.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tandem_animation::{DecayConfig, SpringConfig};

use crate::error::{ConfigError, Result};

/// Which fling hand-offs the coordinator performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffPolicy {
    /// Pre-fling interception plus hand-off in both directions
    #[default]
    Full,
    /// Intercept flings into a header settle; never pass velocity across
    InterceptOnly,
    /// Each region flings on its own and stops at its edge
    Disabled,
}

impl HandoffPolicy {
    /// Whether a fling starting while the header is mid-way is stolen
    pub fn intercepts_pre_fling(&self) -> bool {
        matches!(self, HandoffPolicy::Full | HandoffPolicy::InterceptOnly)
    }

    /// Whether residual velocity crosses between regions
    pub fn hands_off(&self) -> bool {
        matches!(self, HandoffPolicy::Full)
    }
}

/// Fling deceleration settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecaySettings {
    /// Friction per second
    pub friction: f32,
    /// Speed at which a fling is considered finished (pixels/second)
    pub velocity_threshold: f32,
}

impl Default for DecaySettings {
    fn default() -> Self {
        let config = DecayConfig::default();
        Self {
            friction: config.friction,
            velocity_threshold: config.velocity_threshold,
        }
    }
}

impl From<DecaySettings> for DecayConfig {
    fn from(settings: DecaySettings) -> Self {
        DecayConfig::new(settings.friction, settings.velocity_threshold)
    }
}

/// Spring settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSettings {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Default for SpringSettings {
    fn default() -> Self {
        SpringConfig::default().into()
    }
}

impl From<SpringConfig> for SpringSettings {
    fn from(config: SpringConfig) -> Self {
        Self {
            stiffness: config.stiffness,
            damping: config.damping,
            mass: config.mass,
        }
    }
}

impl From<SpringSettings> for SpringConfig {
    fn from(settings: SpringSettings) -> Self {
        SpringConfig::new(settings.stiffness, settings.damping, settings.mass)
    }
}

/// Configuration for a [`crate::NestedScrollCoordinator`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Which fling hand-offs are performed
    pub handoff: HandoffPolicy,
    /// Residual velocity below this is exhausted, not forwarded (pixels/second)
    pub handoff_threshold: f32,
    /// Header fling deceleration
    pub decay: DecaySettings,
    /// Spring used to settle the header after an intercepted fling
    pub settle: SpringSettings,
    /// Spring used by animated programmatic scrolling
    pub scroll_to: SpringSettings,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            handoff: HandoffPolicy::Full,
            handoff_threshold: 10.0,
            decay: DecaySettings::default(),
            settle: SpringSettings::default(),
            // Snappy spring for programmatic jumps
            scroll_to: SpringConfig::stiff().into(),
        }
    }
}

impl CoordinatorConfig {
    /// Regions fling independently
    pub fn no_handoff() -> Self {
        Self {
            handoff: HandoffPolicy::Disabled,
            ..Default::default()
        }
    }

    /// Flings over a half-collapsed header settle it; nothing crosses over
    pub fn intercept_only() -> Self {
        Self {
            handoff: HandoffPolicy::InterceptOnly,
            ..Default::default()
        }
    }

    pub fn decay_config(&self) -> DecayConfig {
        self.decay.into()
    }

    pub fn settle_spring(&self) -> SpringConfig {
        self.settle.into()
    }

    pub fn scroll_to_spring(&self) -> SpringConfig {
        self.scroll_to.into()
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulations cannot run with
    pub fn validate(&self) -> Result<()> {
        positive("decay.friction", self.decay.friction)?;
        non_negative("decay.velocity_threshold", self.decay.velocity_threshold)?;
        non_negative("handoff_threshold", self.handoff_threshold)?;
        for (fields, spring) in [
            (["settle.stiffness", "settle.damping", "settle.mass"], self.settle),
            (
                ["scroll_to.stiffness", "scroll_to.damping", "scroll_to.mass"],
                self.scroll_to,
            ),
        ] {
            positive(fields[0], spring.stiffness)?;
            non_negative(fields[1], spring.damping)?;
            positive(fields[2], spring.mass)?;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        tracing::warn!("rejecting config: {field} = {value}");
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        tracing::warn!("rejecting config: {field} = {value}");
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be zero or positive, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoordinatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.handoff, HandoffPolicy::Full);
        assert_eq!(config.decay_config(), DecayConfig::default());
        assert_eq!(config.settle_spring(), SpringConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CoordinatorConfig::from_toml_str(
            r#"
            handoff = "intercept_only"

            [decay]
            friction = 3.5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.handoff, HandoffPolicy::InterceptOnly);
        assert_eq!(config.decay.friction, 3.5);
        assert_eq!(
            config.decay.velocity_threshold,
            DecayConfig::default().velocity_threshold
        );
        assert_eq!(config.settle, SpringSettings::default());
    }

    #[test]
    fn test_rejects_zero_friction() {
        let err = CoordinatorConfig::from_toml_str("[decay]\nfriction = 0.0\n")
            .expect_err("friction must be positive");
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "decay.friction"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_zero_spring_mass() {
        let err = CoordinatorConfig::from_toml_str("[scroll_to]\nmass = 0.0\n")
            .expect_err("mass must be positive");
        assert!(err.to_string().contains("scroll_to.mass"));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = CoordinatorConfig::from_toml_str("handoff = \"sometimes\"\n")
            .expect_err("unknown policy");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = CoordinatorConfig::no_handoff();
        let text = config.to_toml_string().expect("serializable");
        assert_eq!(CoordinatorConfig::from_toml_str(&text).expect("parses"), config);
    }

    #[test]
    fn test_policy_capabilities() {
        assert!(HandoffPolicy::Full.hands_off());
        assert!(HandoffPolicy::Full.intercepts_pre_fling());
        assert!(!HandoffPolicy::InterceptOnly.hands_off());
        assert!(HandoffPolicy::InterceptOnly.intercepts_pre_fling());
        assert!(!HandoffPolicy::Disabled.hands_off());
        assert!(!HandoffPolicy::Disabled.intercepts_pre_fling());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CoordinatorConfig::load(Path::new("/nonexistent/tandem.toml"))
            .expect_err("file does not exist");
        assert!(err.to_string().contains("/nonexistent/tandem.toml"));
    }
}
