use crate::coins::CoinConfig;
use cityloop_citygen::{CityConfig, LayoutError};
use cityloop_motion::{CharacterConfig, VehicleConfig};
use cityloop_render::{CameraConfig, CameraError};
use cityloop_sky::{CycleError, DayNightCycle, SkyConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Tick-timing instrumentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Number of recent ticks averaged.
    pub history: usize,
    /// Deltas longer than this count as stalls.
    pub spike_threshold_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            history: 120,
            spike_threshold_ms: 250,
        }
    }
}

/// Every tunable of the simulation. Missing sections and fields take their
/// defaults, so an empty document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub city: CityConfig,
    pub character: CharacterConfig,
    pub vehicle: VehicleConfig,
    pub camera: CameraConfig,
    pub sky: SkyConfig,
    pub coins: CoinConfig,
    pub timing: TimingConfig,
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

impl SimConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every section plus the constraints that span sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.city.validate()?;
        self.camera.validate()?;
        DayNightCycle::new(&self.sky)?;

        let c = &self.character;
        positive("character.move_speed", c.move_speed)?;
        positive("character.turn_smoothing", c.turn_smoothing)?;
        positive("character.gravity", c.gravity)?;
        if c.jump_velocity < 0.0 {
            return Err(ConfigError::Invalid("character.jump_velocity must not be negative".into()));
        }
        if c.fall_limit >= c.feet_y {
            return Err(ConfigError::Invalid(format!(
                "character.fall_limit ({}) must be below feet_y ({})",
                c.fall_limit, c.feet_y
            )));
        }

        let v = &self.vehicle;
        positive("vehicle.max_speed", v.max_speed)?;
        positive("vehicle.acceleration", v.acceleration)?;
        positive("vehicle.wheel_base", v.wheel_base)?;
        positive("vehicle.wheel_radius", v.wheel_radius)?;
        positive("vehicle.enter_distance", v.enter_distance)?;
        if v.reverse_max_speed > 0.0 {
            return Err(ConfigError::Invalid(format!(
                "vehicle.reverse_max_speed must be <= 0, got {}",
                v.reverse_max_speed
            )));
        }
        if v.deceleration < 0.0 || v.stop_epsilon < 0.0 {
            return Err(ConfigError::Invalid(
                "vehicle.deceleration and vehicle.stop_epsilon must not be negative".into(),
            ));
        }
        if v.exit_offset > v.enter_distance {
            return Err(ConfigError::Invalid(format!(
                "vehicle.exit_offset ({}) must not exceed enter_distance ({}), or the driver could not get back in",
                v.exit_offset, v.enter_distance
            )));
        }

        positive("coins.pickup_radius", self.coins.pickup_radius)?;
        if self.timing.history == 0 {
            return Err(ConfigError::Invalid("timing.history must be at least 1".into()));
        }
        Ok(())
    }
}
