use serde::{Deserialize, Serialize};

/// Street lamp behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampConfig {
    /// Sun intensity below which lamps switch on.
    pub night_threshold: f32,
    /// Lamp intensity when fully on.
    pub intensity: f32,
    /// Easing rate per second toward the on/off target.
    pub ease_rate: f32,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            night_threshold: 0.3,
            intensity: 2.0,
            ease_rate: 2.0,
        }
    }
}

/// Shared intensity for every street lamp, eased rather than snapped so
/// the dusk crossing does not flicker.
#[derive(Debug, Clone, PartialEq)]
pub struct LampDimmer {
    config: LampConfig,
    intensity: f32,
    lit: bool,
}

impl LampDimmer {
    pub fn new(config: LampConfig) -> Self {
        Self {
            config,
            intensity: 0.0,
            lit: false,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn target(&self, sun_intensity: f32) -> f32 {
        if sun_intensity < self.config.night_threshold {
            self.config.intensity
        } else {
            0.0
        }
    }

    /// Ease toward the target for this sun intensity. Returns the new value.
    pub fn update(&mut self, sun_intensity: f32, dt: f32) -> f32 {
        let target = self.target(sun_intensity);
        let lit = target > 0.0;
        if lit != self.lit {
            self.lit = lit;
            tracing::debug!(lit, sun_intensity, "street lamps switching");
        }
        let k = (dt * self.config.ease_rate).clamp(0.0, 1.0);
        self.intensity += (target - self.intensity) * k;
        self.intensity
    }
}
