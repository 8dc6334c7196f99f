//! The player character and its class archetypes

use glam::Vec2;
use serde::Serialize;

use super::attribute::{Attribute, Contributor};
use super::upgrade::UpgradeId;
use super::weapon::{Weapon, WeaponContext, WeaponKind};
use crate::config::SimConfig;

/// Named player attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stat {
    MaxHealth,
    /// Health regenerated per second
    HealthRegen,
    /// Movement speed (units/s)
    Speed,
    /// Flat damage added to every weapon hit
    Damage,
    /// Weapon radius/reach multiplier
    Area,
    /// Weapon cooldown multiplier, lower is faster
    AttackSpeed,
    /// Distance at which pickups start drifting toward the player
    PickupRadius,
    /// Probability that a killed enemy also drops health
    HealthDropChance,
    /// Experience multiplier
    ExperienceGain,
}

impl Stat {
    pub const COUNT: usize = 9;

    pub const ALL: [Stat; Stat::COUNT] = [
        Stat::MaxHealth,
        Stat::HealthRegen,
        Stat::Speed,
        Stat::Damage,
        Stat::Area,
        Stat::AttackSpeed,
        Stat::PickupRadius,
        Stat::HealthDropChance,
        Stat::ExperienceGain,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stat::MaxHealth => "Health",
            Stat::HealthRegen => "Health Regen",
            Stat::Speed => "Speed",
            Stat::Damage => "Damage",
            Stat::Area => "Area",
            Stat::AttackSpeed => "Attack Speed",
            Stat::PickupRadius => "Pickup Range",
            Stat::HealthDropChance => "Health Drops",
            Stat::ExperienceGain => "Experience",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One attribute per [`Stat`]
#[derive(Debug, Clone)]
pub struct Attributes([Attribute; Stat::COUNT]);

impl Attributes {
    pub fn get(&self, stat: Stat) -> &Attribute {
        &self.0[stat.index()]
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut Attribute {
        &mut self.0[stat.index()]
    }
}

/// Selectable character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerClass {
    Knight,
    Mystic,
    Monk,
}

/// Base stats of a class
#[derive(Debug, Clone, Copy)]
pub struct ClassArchetype {
    pub max_health: f32,
    pub health_regen: f32,
    pub speed: f32,
    pub damage: f32,
    pub area: f32,
    pub attack_speed: f32,
    pub pickup_radius: f32,
    pub health_drop_chance: f32,
    pub starting_weapon: WeaponKind,
}

impl PlayerClass {
    pub const ALL: [PlayerClass; 3] = [PlayerClass::Knight, PlayerClass::Mystic, PlayerClass::Monk];

    pub fn name(&self) -> &'static str {
        match self {
            PlayerClass::Knight => "Knight",
            PlayerClass::Mystic => "Mystic",
            PlayerClass::Monk => "Monk",
        }
    }

    pub fn archetype(&self) -> ClassArchetype {
        match self {
            PlayerClass::Knight => ClassArchetype {
                max_health: 120.0,
                health_regen: 0.1,
                speed: 25.0,
                damage: 0.0,
                area: 1.0,
                attack_speed: 1.0,
                pickup_radius: 50.0,
                health_drop_chance: 0.05,
                starting_weapon: WeaponKind::MeleeCone,
            },
            PlayerClass::Mystic => ClassArchetype {
                max_health: 80.0,
                health_regen: 0.15,
                speed: 27.0,
                damage: 0.0,
                area: 1.1,
                attack_speed: 1.0,
                pickup_radius: 60.0,
                health_drop_chance: 0.05,
                starting_weapon: WeaponKind::Orbs,
            },
            PlayerClass::Monk => ClassArchetype {
                max_health: 100.0,
                health_regen: 0.2,
                speed: 26.0,
                damage: 1.0,
                area: 1.0,
                attack_speed: 0.95,
                pickup_radius: 50.0,
                health_drop_chance: 0.08,
                starting_weapon: WeaponKind::AreaPulse,
            },
        }
    }

    /// Class at `index`, wrapping
    pub fn cycle(index: usize) -> PlayerClass {
        Self::ALL[index % Self::ALL.len()]
    }

    fn attributes(&self) -> Attributes {
        let a = self.archetype();
        let seeded = |base: f32, per_level: Option<f32>| {
            let mut contributors = vec![Contributor::Add(base)];
            if let Some(amount) = per_level {
                contributors.push(Contributor::PerLevel(amount));
            }
            Attribute::with_contributors(contributors, Vec::new())
        };

        Attributes(Stat::ALL.map(|stat| match stat {
            Stat::MaxHealth => seeded(a.max_health, Some(10.0)),
            Stat::HealthRegen => seeded(a.health_regen, None),
            Stat::Speed => seeded(a.speed, Some(0.2)),
            Stat::Damage => seeded(a.damage, Some(0.5)),
            Stat::Area => seeded(a.area, None),
            Stat::AttackSpeed => seeded(a.attack_speed, None),
            Stat::PickupRadius => seeded(a.pickup_radius, None),
            Stat::HealthDropChance => seeded(a.health_drop_chance, None),
            Stat::ExperienceGain => seeded(1.0, None),
        }))
    }
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    pub class: PlayerClass,
    pub pos: Vec2,
    /// Level index, 0-based
    pub level: u32,
    pub experience: f32,
    pub experience_to_next: f32,
    pub health: f32,
    pub attributes: Attributes,
    pub weapons: Vec<Weapon>,
    /// Applied upgrades in order, repeated entries for repeated picks
    pub applied_upgrades: Vec<UpgradeId>,
    /// Facing angle (radians)
    pub facing: f32,
    /// Remaining damage flash (seconds)
    pub damage_flash: f32,
    /// Remaining pickup flash (seconds)
    pub pickup_flash: f32,
}

impl Player {
    pub fn new(class: PlayerClass, config: &SimConfig) -> Self {
        let attributes = class.attributes();
        let health = attributes.get(Stat::MaxHealth).value(0);
        Self {
            class,
            pos: Vec2::ZERO,
            level: 0,
            experience: 0.0,
            experience_to_next: config.first_level_threshold,
            health,
            attributes,
            weapons: vec![Weapon::new(class.archetype().starting_weapon)],
            applied_upgrades: Vec::new(),
            facing: 0.0,
            damage_flash: 0.0,
            pickup_flash: 0.0,
        }
    }

    /// Current value of a stat at the player's level
    #[inline]
    pub fn stat(&self, stat: Stat) -> f32 {
        self.attributes.get(stat).value(self.level)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind == kind)
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapon(kind).is_some()
    }

    /// How many times an upgrade has been applied
    pub fn upgrade_count(&self, id: UpgradeId) -> u32 {
        self.applied_upgrades.iter().filter(|u| **u == id).count() as u32
    }

    /// Move by a direction (normalized, so diagonals are not faster)
    pub fn apply_movement(&mut self, direction: Vec2, dt: f32) {
        let step = direction.normalize_or_zero() * self.stat(Stat::Speed) * dt;
        self.pos += step;
    }

    /// Face toward an aim offset; a zero offset keeps the current facing
    pub fn aim(&mut self, offset: Vec2) {
        if offset.length_squared() > f32::EPSILON {
            self.facing = offset.y.atan2(offset.x);
        }
    }

    /// Regenerate, never exceeding max health
    pub fn regenerate(&mut self, dt: f32) {
        let max = self.stat(Stat::MaxHealth);
        self.health = max.min(self.health + self.stat(Stat::HealthRegen) * dt);
    }

    /// Take one level if the threshold is met. Excess experience carries over,
    /// but at most one level is gained per call.
    pub fn try_level_up(&mut self, config: &SimConfig) -> bool {
        if self.experience < self.experience_to_next {
            return false;
        }
        self.level += 1;
        self.experience -= self.experience_to_next;
        self.experience_to_next += config.level_threshold_step;
        self.health += config.level_up_heal;
        true
    }

    pub fn decay_flashes(&mut self, dt: f32) {
        self.damage_flash = (self.damage_flash - dt).max(0.0);
        self.pickup_flash = (self.pickup_flash - dt).max(0.0);
    }

    /// Inputs for this frame's weapon ticks
    pub fn weapon_context(&self) -> WeaponContext {
        WeaponContext {
            origin: self.pos,
            facing: self.facing,
            damage_bonus: self.stat(Stat::Damage),
            area: self.stat(Stat::Area),
            attack_speed: self.stat(Stat::AttackSpeed),
        }
    }
}
