//! External forces: constant gravity plus an oscillating wind.
//!
//! The wind phase follows the host's wall clock while the integrator uses a
//! fixed nominal step, so the gust frequency on screen does not scale with
//! simulation speed. Both time sources are passed in explicitly.

use crate::config::{Config, Controls};
use glam::Vec3;

/// Oscillating gust factor, `cos(t) * amplitude + bias`.
///
/// With the default constants this stays within `[-1.5, 3.5]`.
#[inline]
pub fn wind_strength(cfg: &Config, elapsed_secs: f64) -> f32 {
    elapsed_secs.cos() as f32 * cfg.wind_amplitude + cfg.wind_bias
}

/// Wind vector for this step, or zero when wind is disabled.
///
/// Magnitude along [`Config::wind_axis`] is `(wind_level / -10) * strength`.
pub fn wind_force(cfg: &Config, controls: &Controls, elapsed_secs: f64) -> Vec3 {
    if !controls.wind_enabled {
        return Vec3::ZERO;
    }
    let magnitude = (controls.wind_level as f32 / -10.0) * wind_strength(cfg, elapsed_secs);
    cfg.wind_axis * magnitude
}

/// Total external force on a particle of the given mass.
///
/// Gravity scales with mass; the wind is applied as a flat force.
#[inline]
pub fn external_force(cfg: &Config, mass: f32, wind: Vec3) -> Vec3 {
    cfg.gravity * mass + wind
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn wind_strength_oscillates_within_bounds() {
        let cfg = Config::default();

        assert!((wind_strength(&cfg, 0.0) - 3.5).abs() < 1e-6);
        assert!((wind_strength(&cfg, PI) + 1.5).abs() < 1e-5);

        for i in 0..1000 {
            let s = wind_strength(&cfg, i as f64 * 0.037);
            assert!((-1.5 - 1e-5..=3.5 + 1e-5).contains(&s), "strength {s} out of range");
        }
    }

    #[test]
    fn wind_acts_along_configured_axis_only() {
        let cfg = Config::default();
        let controls = Controls::default();

        // level 50 at t = 0: (50 / -10) * 3.5 = -17.5 along z.
        let wind = wind_force(&cfg, &controls, 0.0);
        assert_eq!(wind.x, 0.0);
        assert_eq!(wind.y, 0.0);
        assert!((wind.z + 17.5).abs() < 1e-4);
    }

    #[test]
    fn disabled_wind_is_zero_for_every_level() {
        let cfg = Config::default();
        for level in 0..=100 {
            let controls = Controls {
                wind_enabled: false,
                wind_level: level,
                ..Controls::default()
            };
            for t in [0.0, 0.5, 2.0, 100.0] {
                assert_eq!(wind_force(&cfg, &controls, t), Vec3::ZERO);
                assert_eq!(external_force(&cfg, 1.0, Vec3::ZERO), cfg.gravity);
            }
        }
    }

    #[test]
    fn zero_level_means_no_wind() {
        let cfg = Config::default();
        let controls = Controls {
            wind_level: 0,
            ..Controls::default()
        };
        assert_eq!(wind_force(&cfg, &controls, 1.0).length(), 0.0);
    }

    #[test]
    fn gravity_scales_with_mass() {
        let cfg = Config::default();
        let f = external_force(&cfg, 2.0, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(f, Vec3::new(0.0, -19.6, 1.0));
    }
}
