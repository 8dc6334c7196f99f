//! Enemy archetypes and instances

use glam::Vec2;
use serde::Serialize;

use crate::consts::{HIT_FLASH, KNOCKBACK_DECAY, KNOCKBACK_EPSILON};

/// Enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnemyKind {
    Grunt,
    Runner,
    Brute,
    Tank,
    Boss,
    FinalBoss,
}

/// Static per-kind stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    pub health: f32,
    /// Movement speed (units/s)
    pub speed: f32,
    /// Contact damage per attack
    pub damage: f32,
    /// Seconds between contact attacks
    pub attack_cooldown: f32,
    /// Experience dropped on death
    pub experience: f32,
    pub radius: f32,
    pub boss: bool,
}

impl EnemyKind {
    pub fn archetype(&self) -> Archetype {
        match self {
            EnemyKind::Grunt => Archetype {
                health: 10.0,
                speed: 20.0,
                damage: 1.0,
                attack_cooldown: 1.0,
                experience: 1.0,
                radius: 5.0,
                boss: false,
            },
            EnemyKind::Runner => Archetype {
                health: 20.0,
                speed: 21.0,
                damage: 2.0,
                attack_cooldown: 1.0,
                experience: 2.0,
                radius: 5.0,
                boss: false,
            },
            EnemyKind::Brute => Archetype {
                health: 25.0,
                speed: 25.0,
                damage: 1.0,
                attack_cooldown: 1.0,
                experience: 3.0,
                radius: 5.0,
                boss: false,
            },
            EnemyKind::Tank => Archetype {
                health: 60.0,
                speed: 15.0,
                damage: 4.0,
                attack_cooldown: 1.2,
                experience: 6.0,
                radius: 8.0,
                boss: false,
            },
            EnemyKind::Boss => Archetype {
                health: 500.0,
                speed: 20.0,
                damage: 10.0,
                attack_cooldown: 1.0,
                experience: 20.0,
                radius: 10.0,
                boss: true,
            },
            EnemyKind::FinalBoss => Archetype {
                health: 2000.0,
                speed: 22.0,
                damage: 15.0,
                attack_cooldown: 1.0,
                experience: 100.0,
                radius: 14.0,
                boss: true,
            },
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    /// Remaining hit flash (seconds)
    pub hit_flash: f32,
    /// Seconds until the next contact attack
    pub attack_cooldown: f32,
    /// Knockback velocity, decays toward zero
    pub knockback: Vec2,
    pub boss: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        let archetype = kind.archetype();
        Self {
            kind,
            pos,
            health: archetype.health,
            hit_flash: 0.0,
            attack_cooldown: 0.0,
            knockback: Vec2::ZERO,
            boss: archetype.boss,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.archetype().radius
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply weapon damage and set knockback velocity
    pub fn take_hit(&mut self, damage: f32, knockback: Vec2) {
        self.health -= damage;
        self.hit_flash = HIT_FLASH;
        if knockback != Vec2::ZERO {
            self.knockback = knockback;
        }
    }

    /// Reduce knockback speed toward zero
    pub fn decay_knockback(&mut self, dt: f32) {
        let speed = self.knockback.length();
        if speed > KNOCKBACK_EPSILON {
            let slowed = (speed - KNOCKBACK_DECAY * dt).max(0.0);
            self.knockback *= slowed / speed;
        } else {
            self.knockback = Vec2::ZERO;
        }
    }
}
