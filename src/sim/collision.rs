//! Proximity and cone hit-testing
//!
//! Enemies are circles; weapons test against them with three shapes: a cone
//! in front of the player, a disc around the player, and small discs (orbs).

use glam::Vec2;

use crate::{cartesian_to_polar, normalize_angle};

/// Result of testing an enemy against an attack shape
#[derive(Debug, Clone, Copy)]
pub struct HitResult {
    /// Whether the shape touches the enemy
    pub hit: bool,
    /// Unit direction from the attack origin to the enemy (zero if coincident)
    pub direction: Vec2,
    /// Center distance from the attack origin
    pub distance: f32,
}

impl HitResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            direction: Vec2::ZERO,
            distance: 0.0,
        }
    }
}

/// Cone of half-angle `angle / 2` around `facing`, reaching `reach` from `origin`
///
/// The enemy's radius widens the cone by `atan2(radius / 2, distance)` and
/// shortens the distance check by `radius`.
pub fn cone_hit(
    origin: Vec2,
    facing: f32,
    angle: f32,
    reach: f32,
    target: Vec2,
    target_radius: f32,
) -> HitResult {
    let offset = target - origin;
    let (distance, theta) = cartesian_to_polar(offset);

    if distance - target_radius >= reach {
        return HitResult::miss();
    }

    let allowance = (target_radius / 2.0).atan2(distance);
    let delta = normalize_angle(theta - facing).abs();

    HitResult {
        hit: delta <= angle / 2.0 + allowance,
        direction: offset.normalize_or_zero(),
        distance,
    }
}

/// Disc of `radius` around `origin`
pub fn disc_hit(origin: Vec2, radius: f32, target: Vec2, target_radius: f32) -> HitResult {
    let offset = target - origin;
    let distance = offset.length();
    HitResult {
        hit: distance - target_radius < radius,
        direction: offset.normalize_or_zero(),
        distance,
    }
}

/// Unit step from `from` toward `to`, zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
