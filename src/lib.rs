//! Arena Survivor - a top-down survival arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, weapons, spawning, upgrades, run state)
//! - `config`: Data-driven run configuration
//!
//! Rendering, audio and input devices are host concerns. The host feeds an
//! [`sim::InputState`] into [`sim::tick`] once per frame, then reads
//! [`sim::GameState::snapshot`] and [`sim::GameState::events`].

pub mod config;
pub mod sim;

pub use config::SimConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Collision radius of the player
    pub const PLAYER_RADIUS: f32 = 5.0;

    /// Damage flash duration after the player is hit (seconds)
    pub const DAMAGE_FLASH: f32 = 0.5;
    /// Pickup flash duration after collecting something (seconds)
    pub const PICKUP_FLASH: f32 = 0.1;
    /// Enemy hit flash duration (seconds)
    pub const HIT_FLASH: f32 = 0.1;

    /// Knockback speed lost per second
    pub const KNOCKBACK_DECAY: f32 = 20.0;
    /// Knockback below this speed snaps to zero
    pub const KNOCKBACK_EPSILON: f32 = 0.1;

    /// Extra random distance beyond the visible edge for spawned enemies
    pub const SPAWN_RING_JITTER: f32 = 100.0;

    /// Upgrade choices offered per level-up
    pub const UPGRADE_CHOICES: usize = 3;
    /// Default cap on how often one upgrade may be taken
    pub const DEFAULT_MAX_APPLICATIONS: u32 = 5;
    /// Selection weight of ordinary upgrades
    pub const BASE_UPGRADE_WEIGHT: f32 = 1.0;
    /// Selection weight of upgrades that grant a new weapon
    pub const WEAPON_ACQUIRE_WEIGHT: f32 = 0.5;
    /// Selection weight of upgrades that level an equipped weapon
    pub const WEAPON_LEVEL_WEIGHT: f32 = 1.5;

    /// Extra pull range used by the pickup magnet speed formula
    pub const PICKUP_PULL_BONUS: f32 = 10.0;
    /// Pickup magnet speed factor
    pub const PICKUP_PULL_FACTOR: f32 = 2.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-2.25 * PI) - (-PI / 4.0)).abs() < 1e-5);
        assert_eq!(normalize_angle(0.5), 0.5);
    }

    #[test]
    fn test_normalize_angle_stays_in_range() {
        for i in -40..=40 {
            let angle = normalize_angle(i as f32 * 0.7);
            assert!((-PI..PI).contains(&angle) || (angle - PI).abs() < 1e-5);
        }
    }

    #[test]
    fn test_polar_roundtrip_angle() {
        let p = polar_to_cartesian(10.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - PI / 3.0).abs() < 1e-5);
    }
}
