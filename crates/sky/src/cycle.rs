use crate::lamps::LampConfig;
use cityloop_common::{Color, lerp};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CycleError {
    #[error("cycle duration must be positive, got {0}")]
    NonPositiveDuration(f32),
    #[error("need at least two keyframes, got {0}")]
    TooFewKeyframes(usize),
    #[error("keyframe {index} at phase {phase} is not after the previous one")]
    Unsorted { index: usize, phase: f32 },
    #[error("keyframes must start at phase 0 and end at phase 1, got {first} and {last}")]
    Endpoints { first: f32, last: f32 },
    #[error("last keyframe must repeat the first so the cycle wraps seamlessly")]
    SeamMismatch,
}

/// Lighting anchor at a fixed phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub phase: f32,
    pub sun_intensity: f32,
    pub sun_color: Color,
    pub ambient_intensity: f32,
    pub ambient_color: Color,
    pub fog_color: Color,
}

impl Keyframe {
    fn same_lighting(&self, other: &Keyframe) -> bool {
        self.sun_intensity == other.sun_intensity
            && self.sun_color == other.sun_color
            && self.ambient_intensity == other.ambient_intensity
            && self.ambient_color == other.ambient_color
            && self.fog_color == other.fog_color
    }
}

const fn keyframe(
    phase: f32,
    sun_intensity: f32,
    sun_color: u32,
    ambient_intensity: f32,
    ambient_color: u32,
    fog_color: u32,
) -> Keyframe {
    Keyframe {
        phase,
        sun_intensity,
        sun_color: Color::from_hex(sun_color),
        ambient_intensity,
        ambient_color: Color::from_hex(ambient_color),
        fog_color: Color::from_hex(fog_color),
    }
}

/// Night, dawn, day, day, dusk, night, and night again at phase 1.
pub fn default_keyframes() -> Vec<Keyframe> {
    vec![
        keyframe(0.0, 0.05, 0x8899ff, 0.15, 0x223355, 0x0a0f1e),
        keyframe(0.2, 0.6, 0xffaa66, 0.35, 0x886655, 0xd08060),
        keyframe(0.3, 1.2, 0xffffff, 0.6, 0xaabbdd, 0x87ceeb),
        keyframe(0.7, 1.2, 0xffffff, 0.6, 0xaabbdd, 0x87ceeb),
        keyframe(0.8, 0.6, 0xff7744, 0.35, 0x775566, 0xc06850),
        keyframe(0.9, 0.05, 0x8899ff, 0.15, 0x223355, 0x0a0f1e),
        keyframe(1.0, 0.05, 0x8899ff, 0.15, 0x223355, 0x0a0f1e),
    ]
}

/// Day/night parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Length of one full day in seconds.
    pub cycle_duration: f32,
    /// Phase at startup, in `[0, 1)`.
    pub start_phase: f32,
    /// Radius of the sun's circular path.
    pub sun_distance: f32,
    /// Sideways lean of the sun path, as a fraction of `sun_distance`.
    pub sun_tilt: f32,
    pub keyframes: Vec<Keyframe>,
    pub lamps: LampConfig,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            cycle_duration: 240.0,
            start_phase: 0.35,
            sun_distance: 200.0,
            sun_tilt: 0.3,
            keyframes: default_keyframes(),
            lamps: LampConfig::default(),
        }
    }
}

/// Interpolated lighting for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightingState {
    pub phase: f32,
    pub sun_intensity: f32,
    pub sun_color: Color,
    pub sun_position: Vec3,
    pub ambient_intensity: f32,
    pub ambient_color: Color,
    pub fog_color: Color,
    /// Clear color. Always equal to the fog color so distant geometry
    /// fades into the sky.
    pub background: Color,
}

/// Phase accumulator plus a validated keyframe table.
#[derive(Debug, Clone)]
pub struct DayNightCycle {
    keyframes: Vec<Keyframe>,
    duration: f32,
    elapsed: f32,
    sun_distance: f32,
    sun_tilt: f32,
}

impl DayNightCycle {
    pub fn new(config: &SkyConfig) -> Result<Self, CycleError> {
        if !(config.cycle_duration > 0.0) {
            return Err(CycleError::NonPositiveDuration(config.cycle_duration));
        }
        validate_keyframes(&config.keyframes)?;
        let mut cycle = Self {
            keyframes: config.keyframes.clone(),
            duration: config.cycle_duration,
            elapsed: 0.0,
            sun_distance: config.sun_distance,
            sun_tilt: config.sun_tilt,
        };
        cycle.set_phase(config.start_phase);
        tracing::debug!(
            duration = cycle.duration,
            keyframes = cycle.keyframes.len(),
            phase = cycle.phase(),
            "day/night cycle ready"
        );
        Ok(cycle)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds into the current day, in `[0, duration)`.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Position in the day, in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.elapsed / self.duration
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    fn set_elapsed(&mut self, elapsed: f32) {
        let e = elapsed.rem_euclid(self.duration);
        // rem_euclid can round up to the divisor for tiny negative inputs.
        self.elapsed = if e >= self.duration { 0.0 } else { e };
    }

    pub fn advance(&mut self, dt: f32) {
        self.set_elapsed(self.elapsed + dt);
    }

    /// Jump to a phase; any real value is wrapped into `[0, 1)`.
    pub fn set_phase(&mut self, phase: f32) {
        self.set_elapsed(phase.rem_euclid(1.0) * self.duration);
    }

    /// Move the phase by `delta` days.
    pub fn scrub(&mut self, delta: f32) {
        self.set_phase(self.phase() + delta);
        tracing::debug!(phase = self.phase(), "time of day scrubbed");
    }

    /// Sun position on a circle parameterized by phase: below the horizon
    /// at phase 0, overhead at 0.5.
    pub fn sun_position(&self, phase: f32) -> Vec3 {
        let angle = phase * TAU;
        let r = self.sun_distance;
        Vec3::new(r * angle.sin(), -r * angle.cos(), r * self.sun_tilt)
    }

    /// Lighting at an arbitrary phase.
    pub fn sample(&self, phase: f32) -> LightingState {
        let phase = phase.rem_euclid(1.0);
        let (a, b) = self.bounding_pair(phase);
        let t = (phase - a.phase) / (b.phase - a.phase);
        let fog_color = a.fog_color.lerp(b.fog_color, t);
        LightingState {
            phase,
            sun_intensity: lerp(a.sun_intensity, b.sun_intensity, t),
            sun_color: a.sun_color.lerp(b.sun_color, t),
            sun_position: self.sun_position(phase),
            ambient_intensity: lerp(a.ambient_intensity, b.ambient_intensity, t),
            ambient_color: a.ambient_color.lerp(b.ambient_color, t),
            fog_color,
            background: fog_color,
        }
    }

    /// Lighting at the current phase.
    pub fn current(&self) -> LightingState {
        self.sample(self.phase())
    }

    fn bounding_pair(&self, phase: f32) -> (&Keyframe, &Keyframe) {
        // Validation guarantees phases 0 and 1 at the ends, so a pair with
        // `a.phase <= phase < b.phase` always exists for phase in [0, 1).
        for pair in self.keyframes.windows(2) {
            if phase < pair[1].phase {
                return (&pair[0], &pair[1]);
            }
        }
        let n = self.keyframes.len();
        (&self.keyframes[n - 2], &self.keyframes[n - 1])
    }
}

fn validate_keyframes(keyframes: &[Keyframe]) -> Result<(), CycleError> {
    if keyframes.len() < 2 {
        return Err(CycleError::TooFewKeyframes(keyframes.len()));
    }
    for (index, pair) in keyframes.windows(2).enumerate() {
        if !(pair[1].phase > pair[0].phase) {
            return Err(CycleError::Unsorted {
                index: index + 1,
                phase: pair[1].phase,
            });
        }
    }
    let first = &keyframes[0];
    let last = &keyframes[keyframes.len() - 1];
    if first.phase != 0.0 || last.phase != 1.0 {
        return Err(CycleError::Endpoints {
            first: first.phase,
            last: last.phase,
        });
    }
    if !first.same_lighting(last) {
        return Err(CycleError::SeamMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle() -> DayNightCycle {
        DayNightCycle::new(&SkyConfig {
            start_phase: 0.0,
            ..SkyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        let c = DayNightCycle::new(&SkyConfig::default()).unwrap();
        assert!((c.phase() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn phase_stays_in_range() {
        let mut c = cycle();
        for dt in [0.016, 1.0, 239.9, 480.0, 1000.5, 0.0, 3.3e4, -5.0] {
            c.advance(dt);
            assert!(c.elapsed() >= 0.0 && c.elapsed() < c.duration());
            assert!((0.0..1.0).contains(&c.phase()), "{}", c.phase());
        }
    }

    #[test]
    fn advance_wraps_modulo_duration() {
        let mut c = cycle();
        c.advance(250.0);
        assert!((c.elapsed() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn keyframe_phases_are_exact() {
        let c = cycle();
        for kf in &c.keyframes()[..c.keyframes().len() - 1] {
            let s = c.sample(kf.phase);
            assert_eq!(s.sun_intensity, kf.sun_intensity);
            assert_eq!(s.ambient_intensity, kf.ambient_intensity);
            assert_eq!(s.sun_color, kf.sun_color);
            assert_eq!(s.ambient_color, kf.ambient_color);
            assert_eq!(s.fog_color, kf.fog_color);
        }
    }

    #[test]
    fn midpoint_interpolates() {
        let c = cycle();
        let s = c.sample(0.1);
        assert!((s.sun_intensity - (0.05 + 0.6) / 2.0).abs() < 1e-5);
    }

    #[test]
    fn wraparound_is_continuous() {
        let c = cycle();
        let start = c.sample(0.0);
        let end = c.sample(1.0 - 1e-6);
        assert!((start.sun_intensity - end.sun_intensity).abs() < 1e-4);
        assert!((start.ambient_intensity - end.ambient_intensity).abs() < 1e-4);
        assert!(start.fog_color.max_diff(end.fog_color) < 1e-4);
        assert!(start.sun_color.max_diff(end.sun_color) < 1e-4);
    }

    #[test]
    fn background_matches_fog() {
        let c = cycle();
        for i in 0..20 {
            let s = c.sample(i as f32 / 20.0);
            assert_eq!(s.background, s.fog_color);
        }
    }

    #[test]
    fn sun_rises_and_sets() {
        let c = cycle();
        assert!(c.sun_position(0.0).y < 0.0);
        assert!((c.sun_position(0.5).y - 200.0).abs() < 1e-3);
        assert!((c.sun_position(0.25).x - 200.0).abs() < 1e-3);
        assert!((c.sun_position(0.7).z - 60.0).abs() < 1e-3);
    }

    #[test]
    fn scrub_and_set_phase_wrap() {
        let mut c = cycle();
        c.set_phase(1.25);
        assert!((c.phase() - 0.25).abs() < 1e-5);
        c.scrub(-0.5);
        assert!((c.phase() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let mut kfs = default_keyframes();
        kfs.swap(1, 2);
        let config = SkyConfig {
            keyframes: kfs,
            ..SkyConfig::default()
        };
        assert!(matches!(DayNightCycle::new(&config), Err(CycleError::Unsorted { index: 2, .. })));

        let mut kfs = default_keyframes();
        kfs.last_mut().unwrap().sun_intensity = 3.0;
        let config = SkyConfig {
            keyframes: kfs,
            ..SkyConfig::default()
        };
        assert_eq!(DayNightCycle::new(&config).unwrap_err(), CycleError::SeamMismatch);

        let config = SkyConfig {
            keyframes: default_keyframes()[..1].to_vec(),
            ..SkyConfig::default()
        };
        assert_eq!(DayNightCycle::new(&config).unwrap_err(), CycleError::TooFewKeyframes(1));

        let config = SkyConfig {
            cycle_duration: 0.0,
            ..SkyConfig::default()
        };
        assert!(DayNightCycle::new(&config).is_err());
    }
}
