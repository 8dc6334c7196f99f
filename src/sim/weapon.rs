//! Weapon archetypes and equipped weapon instances
//!
//! Each archetype has a level table built once from a full level-0 record
//! followed by partial patches (only the fields that change per level).
//! Behavior lives in the match arms of [`Weapon::tick`]; data lives in the
//! tables.

use std::f32::consts::{PI, TAU};
use std::sync::LazyLock;

use glam::Vec2;
use serde::Serialize;

use super::collision::{cone_hit, disc_hit};
use super::enemy::Enemy;
use super::events::GameEvent;
use crate::polar_to_cartesian;

/// Attack speed floor so a stacked cooldown multiplier never divides by zero
const MIN_ATTACK_SPEED: f32 = 0.05;

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeaponKind {
    /// Periodic swing hitting everything in a cone in front of the player
    MeleeCone,
    /// Orbs circling the player, each with its own hit cooldown
    Orbs,
    /// Periodic burst hitting everything around the player
    AreaPulse,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::MeleeCone, WeaponKind::Orbs, WeaponKind::AreaPulse];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::MeleeCone => "Blade Sweep",
            WeaponKind::Orbs => "Orbiting Orbs",
            WeaponKind::AreaPulse => "Shock Pulse",
        }
    }

    /// Highest reachable level index
    pub fn max_level(&self) -> usize {
        level_table(*self).len() - 1
    }

    fn table_index(&self) -> usize {
        match self {
            WeaponKind::MeleeCone => 0,
            WeaponKind::Orbs => 1,
            WeaponKind::AreaPulse => 2,
        }
    }
}

/// Fully populated stats for one weapon level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeaponStats {
    /// Damage per hit, before the player's damage bonus
    pub damage: f32,
    /// Seconds between activations, before the attack speed multiplier
    pub damage_rate: f32,
    /// Cone reach, orbit radius or pulse radius
    pub reach: f32,
    /// Full cone angle (radians)
    pub angle: f32,
    /// Number of orbs
    pub count: u32,
    /// Radius of each orb
    pub orb_radius: f32,
    /// Orb angular speed (radians/s)
    pub orbit_speed: f32,
    /// Knockback speed applied on hit
    pub knockback: f32,
}

/// Fields that change from the previous level
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsPatch {
    pub damage: Option<f32>,
    pub damage_rate: Option<f32>,
    pub reach: Option<f32>,
    pub angle: Option<f32>,
    pub count: Option<u32>,
    pub orb_radius: Option<f32>,
    pub orbit_speed: Option<f32>,
    pub knockback: Option<f32>,
}

impl StatsPatch {
    pub const NONE: StatsPatch = StatsPatch {
        damage: None,
        damage_rate: None,
        reach: None,
        angle: None,
        count: None,
        orb_radius: None,
        orbit_speed: None,
        knockback: None,
    };
}

impl WeaponStats {
    fn patched(self, patch: &StatsPatch) -> Self {
        Self {
            damage: patch.damage.unwrap_or(self.damage),
            damage_rate: patch.damage_rate.unwrap_or(self.damage_rate),
            reach: patch.reach.unwrap_or(self.reach),
            angle: patch.angle.unwrap_or(self.angle),
            count: patch.count.unwrap_or(self.count),
            orb_radius: patch.orb_radius.unwrap_or(self.orb_radius),
            orbit_speed: patch.orbit_speed.unwrap_or(self.orbit_speed),
            knockback: patch.knockback.unwrap_or(self.knockback),
        }
    }
}

/// Forward-fill `patches` onto `base`, one table entry per level
pub fn build_level_table(base: WeaponStats, patches: &[StatsPatch]) -> Vec<WeaponStats> {
    let mut table = Vec::with_capacity(patches.len() + 1);
    let mut current = base;
    table.push(current);
    for patch in patches {
        current = current.patched(patch);
        table.push(current);
    }
    table
}

const MELEE_BASE: WeaponStats = WeaponStats {
    damage: 8.0,
    damage_rate: 0.5,
    reach: 80.0,
    angle: PI / 2.0,
    count: 0,
    orb_radius: 0.0,
    orbit_speed: 0.0,
    knockback: 25.0,
};

const MELEE_LEVELS: [StatsPatch; 7] = [
    StatsPatch { damage: Some(10.0), ..StatsPatch::NONE },
    StatsPatch { reach: Some(90.0), ..StatsPatch::NONE },
    StatsPatch { damage: Some(13.0), angle: Some(PI * 0.6), ..StatsPatch::NONE },
    StatsPatch { damage_rate: Some(0.42), ..StatsPatch::NONE },
    StatsPatch { damage: Some(17.0), reach: Some(100.0), ..StatsPatch::NONE },
    StatsPatch { angle: Some(PI * 0.75), knockback: Some(35.0), ..StatsPatch::NONE },
    StatsPatch { damage: Some(22.0), damage_rate: Some(0.35), ..StatsPatch::NONE },
];

const ORBS_BASE: WeaponStats = WeaponStats {
    damage: 5.0,
    damage_rate: 0.6,
    reach: 45.0,
    angle: 0.0,
    count: 2,
    orb_radius: 6.0,
    orbit_speed: 3.0,
    knockback: 8.0,
};

const ORBS_LEVELS: [StatsPatch; 7] = [
    StatsPatch { count: Some(3), ..StatsPatch::NONE },
    StatsPatch { damage: Some(7.0), ..StatsPatch::NONE },
    StatsPatch { orbit_speed: Some(3.6), ..StatsPatch::NONE },
    StatsPatch { count: Some(4), reach: Some(50.0), ..StatsPatch::NONE },
    StatsPatch { damage: Some(9.0), orb_radius: Some(7.0), ..StatsPatch::NONE },
    StatsPatch { count: Some(5), ..StatsPatch::NONE },
    StatsPatch { damage: Some(12.0), damage_rate: Some(0.5), ..StatsPatch::NONE },
];

const PULSE_BASE: WeaponStats = WeaponStats {
    damage: 4.0,
    damage_rate: 1.2,
    reach: 55.0,
    angle: 0.0,
    count: 0,
    orb_radius: 0.0,
    orbit_speed: 0.0,
    knockback: 0.0,
};

const PULSE_LEVELS: [StatsPatch; 6] = [
    StatsPatch { damage: Some(6.0), ..StatsPatch::NONE },
    StatsPatch { reach: Some(65.0), ..StatsPatch::NONE },
    StatsPatch { damage_rate: Some(1.0), ..StatsPatch::NONE },
    StatsPatch { damage: Some(8.0), ..StatsPatch::NONE },
    StatsPatch { reach: Some(75.0), ..StatsPatch::NONE },
    StatsPatch { damage: Some(11.0), damage_rate: Some(0.85), ..StatsPatch::NONE },
];

static LEVEL_TABLES: LazyLock<[Vec<WeaponStats>; 3]> = LazyLock::new(|| {
    [
        build_level_table(MELEE_BASE, &MELEE_LEVELS),
        build_level_table(ORBS_BASE, &ORBS_LEVELS),
        build_level_table(PULSE_BASE, &PULSE_LEVELS),
    ]
});

/// Per-level stats of an archetype, index = level
pub fn level_table(kind: WeaponKind) -> &'static [WeaponStats] {
    &LEVEL_TABLES[kind.table_index()]
}

/// Player-derived inputs for one weapon tick
#[derive(Debug, Clone, Copy)]
pub struct WeaponContext {
    pub origin: Vec2,
    /// Facing angle (radians)
    pub facing: f32,
    /// Flat damage added to every hit
    pub damage_bonus: f32,
    /// Radius/reach multiplier
    pub area: f32,
    /// Cooldown multiplier (lower is faster)
    pub attack_speed: f32,
}

/// An equipped weapon
#[derive(Debug, Clone, Serialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: usize,
    /// Seconds since the weapon was equipped
    pub elapsed: f32,
    /// Seconds until the next activation (cone and pulse)
    pub cooldown: f32,
    /// Current orbit angle of orb 0 (radians)
    pub phase: f32,
    /// Per-orb hit cooldowns
    pub orb_cooldowns: Vec<f32>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            level: 0,
            elapsed: 0.0,
            cooldown: 0.0,
            phase: 0.0,
            orb_cooldowns: Vec::new(),
        }
    }

    pub fn stats(&self) -> &'static WeaponStats {
        let table = level_table(self.kind);
        &table[self.level.min(table.len() - 1)]
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.kind.max_level()
    }

    /// Advance one level; false if already at max
    pub fn level_up(&mut self) -> bool {
        if self.is_max_level() {
            return false;
        }
        self.level += 1;
        true
    }

    /// World positions of the orbs (empty for other archetypes)
    pub fn orb_positions(&self, origin: Vec2, area: f32) -> Vec<Vec2> {
        if self.kind != WeaponKind::Orbs {
            return Vec::new();
        }
        let stats = self.stats();
        let count = stats.count.max(1) as f32;
        let radius = stats.reach * area;
        (0..stats.count)
            .map(|i| origin + polar_to_cartesian(radius, self.phase + i as f32 * TAU / count))
            .collect()
    }

    /// Advance cooldowns and fire when ready. Returns total damage dealt.
    pub fn tick(
        &mut self,
        ctx: &WeaponContext,
        enemies: &mut [Enemy],
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) -> f32 {
        self.elapsed += dt;
        let stats = *self.stats();

        if self.kind == WeaponKind::Orbs {
            return self.tick_orbs(&stats, ctx, enemies, events, dt);
        }

        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return 0.0;
        }
        self.cooldown = stats.damage_rate * ctx.attack_speed;

        match self.kind {
            WeaponKind::MeleeCone => fire_cone(&stats, ctx, enemies, events),
            WeaponKind::AreaPulse => fire_pulse(&stats, ctx, enemies, events),
            WeaponKind::Orbs => 0.0,
        }
    }

    fn tick_orbs(
        &mut self,
        stats: &WeaponStats,
        ctx: &WeaponContext,
        enemies: &mut [Enemy],
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) -> f32 {
        self.orb_cooldowns.resize(stats.count as usize, 0.0);
        let speed = stats.orbit_speed / ctx.attack_speed.max(MIN_ATTACK_SPEED);
        self.phase = (self.phase + speed * dt) % TAU;

        let damage = stats.damage + ctx.damage_bonus;
        let orb_size = stats.orb_radius * ctx.area;
        let positions = self.orb_positions(ctx.origin, ctx.area);
        let mut dealt = 0.0;

        for (cooldown, orb) in self.orb_cooldowns.iter_mut().zip(positions) {
            *cooldown = (*cooldown - dt).max(0.0);
            if *cooldown > 0.0 {
                continue;
            }

            let mut hit_any = false;
            for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
                let hit = disc_hit(orb, orb_size, enemy.pos, enemy.radius());
                if !hit.hit {
                    continue;
                }
                enemy.take_hit(damage, hit.direction * stats.knockback);
                events.push(GameEvent::EnemyHit {
                    pos: enemy.pos,
                    weapon: WeaponKind::Orbs,
                });
                dealt += damage;
                hit_any = true;
            }

            if hit_any {
                *cooldown = stats.damage_rate * ctx.attack_speed;
            }
        }

        dealt
    }
}

fn fire_cone(
    stats: &WeaponStats,
    ctx: &WeaponContext,
    enemies: &mut [Enemy],
    events: &mut Vec<GameEvent>,
) -> f32 {
    let damage = stats.damage + ctx.damage_bonus;
    let reach = stats.reach * ctx.area;
    let mut dealt = 0.0;

    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        let hit = cone_hit(ctx.origin, ctx.facing, stats.angle, reach, enemy.pos, enemy.radius());
        if !hit.hit {
            continue;
        }
        enemy.take_hit(damage, hit.direction * stats.knockback);
        events.push(GameEvent::EnemyHit {
            pos: enemy.pos,
            weapon: WeaponKind::MeleeCone,
        });
        dealt += damage;
    }

    dealt
}

fn fire_pulse(
    stats: &WeaponStats,
    ctx: &WeaponContext,
    enemies: &mut [Enemy],
    events: &mut Vec<GameEvent>,
) -> f32 {
    let damage = stats.damage + ctx.damage_bonus;
    let radius = stats.reach * ctx.area;
    let mut dealt = 0.0;

    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        if !disc_hit(ctx.origin, radius, enemy.pos, enemy.radius()).hit {
            continue;
        }
        enemy.take_hit(damage, Vec2::ZERO);
        events.push(GameEvent::EnemyHit {
            pos: enemy.pos,
            weapon: WeaponKind::AreaPulse,
        });
        dealt += damage;
    }

    dealt
}

fn stat_lines(kind: WeaponKind, stats: &WeaponStats) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Damage", format!("{}", stats.damage)),
        ("Cooldown", format!("{:.2}s", stats.damage_rate)),
    ];
    match kind {
        WeaponKind::MeleeCone => {
            lines.push(("Reach", format!("{}", stats.reach)));
            lines.push(("Angle", format!("{:.0}°", stats.angle.to_degrees())));
            lines.push(("Knockback", format!("{}", stats.knockback)));
        }
        WeaponKind::Orbs => {
            lines.push(("Orbs", format!("{}", stats.count)));
            lines.push(("Orbit radius", format!("{}", stats.reach)));
            lines.push(("Orb size", format!("{}", stats.orb_radius)));
            lines.push(("Orbit speed", format!("{:.1}", stats.orbit_speed)));
        }
        WeaponKind::AreaPulse => {
            lines.push(("Radius", format!("{}", stats.reach)));
        }
    }
    lines
}

/// "Label: value" lines for a level
pub fn describe_stats(kind: WeaponKind, level: usize) -> Vec<String> {
    let table = level_table(kind);
    let Some(stats) = table.get(level) else {
        return Vec::new();
    };
    stat_lines(kind, stats)
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect()
}

/// Changed stats between `level` and the next, as "Label a → b"
pub fn describe_level_up(kind: WeaponKind, level: usize) -> Option<String> {
    let table = level_table(kind);
    let current = stat_lines(kind, table.get(level)?);
    let next = stat_lines(kind, table.get(level + 1)?);

    let changes: Vec<String> = current
        .iter()
        .zip(&next)
        .filter(|(a, b)| a.1 != b.1)
        .map(|(a, b)| format!("{} {} → {}", a.0, a.1, b.1))
        .collect();
    Some(changes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use proptest::prelude::*;

    fn ctx_at_origin() -> WeaponContext {
        WeaponContext {
            origin: Vec2::ZERO,
            facing: 0.0,
            damage_bonus: 0.0,
            area: 1.0,
            attack_speed: 1.0,
        }
    }

    #[test]
    fn test_tables_forward_fill() {
        let table = level_table(WeaponKind::MeleeCone);
        assert_eq!(table.len(), 8);
        // Level 2 only changes reach; damage carries from level 1
        assert_eq!(table[2].damage, 10.0);
        assert_eq!(table[2].reach, 90.0);
        // Knockback untouched until level 6
        assert_eq!(table[5].knockback, 25.0);
        assert_eq!(table[6].knockback, 35.0);
        assert_eq!(table[7].reach, 100.0);
    }

    #[test]
    fn test_cone_hits_front_not_side() {
        let mut weapon = Weapon::new(WeaponKind::MeleeCone);
        let mut enemies = vec![
            Enemy::new(EnemyKind::Grunt, Vec2::new(50.0, 0.0)),
            Enemy::new(EnemyKind::Grunt, Vec2::new(0.0, 50.0)),
        ];
        let mut events = Vec::new();

        let dealt = weapon.tick(&ctx_at_origin(), &mut enemies, &mut events, 0.016);
        assert_eq!(dealt, 8.0);
        assert_eq!(enemies[0].health, EnemyKind::Grunt.archetype().health - 8.0);
        assert!(enemies[0].knockback.x > 0.0);
        assert_eq!(enemies[1].health, EnemyKind::Grunt.archetype().health);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_cooldown_scales_with_attack_speed() {
        let mut weapon = Weapon::new(WeaponKind::MeleeCone);
        let mut enemies = vec![Enemy::new(EnemyKind::Tank, Vec2::new(30.0, 0.0))];
        let mut events = Vec::new();
        let ctx = WeaponContext {
            attack_speed: 0.5,
            ..ctx_at_origin()
        };

        weapon.tick(&ctx, &mut enemies, &mut events, 0.01);
        assert!((weapon.cooldown - 0.25).abs() < 1e-6);

        // Not ready yet
        assert_eq!(weapon.tick(&ctx, &mut enemies, &mut events, 0.2), 0.0);
        // Ready
        assert!(weapon.tick(&ctx, &mut enemies, &mut events, 0.06) > 0.0);
    }

    #[test]
    fn test_damage_bonus_and_area() {
        let mut weapon = Weapon::new(WeaponKind::AreaPulse);
        let mut enemies = vec![
            Enemy::new(EnemyKind::Tank, Vec2::new(60.0, 0.0)),
            Enemy::new(EnemyKind::Tank, Vec2::new(0.0, 100.0)),
        ];
        let mut events = Vec::new();
        let ctx = WeaponContext {
            damage_bonus: 3.0,
            area: 1.2,
            ..ctx_at_origin()
        };

        let dealt = weapon.tick(&ctx, &mut enemies, &mut events, 0.01);
        assert_eq!(dealt, 7.0);
        assert_eq!(enemies[0].knockback, Vec2::ZERO);
        assert_eq!(enemies[1].health, EnemyKind::Tank.archetype().health);
    }

    #[test]
    fn test_orbs_have_independent_cooldowns() {
        let mut weapon = Weapon::new(WeaponKind::Orbs);
        // Orb 0 starts at angle 0, radius 45
        let mut enemies = vec![Enemy::new(EnemyKind::Tank, Vec2::new(45.0, 0.0))];
        let mut events = Vec::new();
        let ctx = ctx_at_origin();

        let dealt = weapon.tick(&ctx, &mut enemies, &mut events, 0.001);
        assert_eq!(dealt, 5.0);
        assert_eq!(weapon.orb_cooldowns.len(), 2);
        assert!(weapon.orb_cooldowns[0] > 0.0);
        assert_eq!(weapon.orb_cooldowns[1], 0.0);

        // Orb 0 still cooling down, orb 1 is on the far side
        assert_eq!(weapon.tick(&ctx, &mut enemies, &mut events, 0.001), 0.0);
    }

    #[test]
    fn test_level_up_stops_at_max() {
        let mut weapon = Weapon::new(WeaponKind::AreaPulse);
        let mut levels = 0;
        while weapon.level_up() {
            levels += 1;
        }
        assert_eq!(levels, WeaponKind::AreaPulse.max_level());
        assert!(weapon.is_max_level());
        assert_eq!(weapon.stats().damage, 11.0);
    }

    #[test]
    fn test_dead_enemies_are_ignored() {
        let mut weapon = Weapon::new(WeaponKind::AreaPulse);
        let mut enemy = Enemy::new(EnemyKind::Grunt, Vec2::new(10.0, 0.0));
        enemy.health = 0.0;
        let mut enemies = vec![enemy];
        let mut events = Vec::new();
        assert_eq!(weapon.tick(&ctx_at_origin(), &mut enemies, &mut events, 0.01), 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_describe_level_up_lists_changes_only() {
        let text = describe_level_up(WeaponKind::MeleeCone, 0).unwrap();
        assert_eq!(text, "Damage 8 → 10");
        let text = describe_level_up(WeaponKind::Orbs, 3).unwrap();
        assert!(text.contains("Orbs 3 → 4"));
        assert!(text.contains("Orbit radius 45 → 50"));
        assert!(describe_level_up(WeaponKind::Orbs, WeaponKind::Orbs.max_level()).is_none());
    }

    #[test]
    fn test_describe_stats() {
        let lines = describe_stats(WeaponKind::AreaPulse, 0);
        assert_eq!(lines, vec!["Damage: 4", "Cooldown: 1.20s", "Radius: 55"]);
    }

    proptest! {
        #[test]
        fn prop_patch_only_overrides_given_fields(damage in proptest::option::of(0.0f32..100.0),
                                                  reach in proptest::option::of(0.0f32..200.0)) {
            let patch = StatsPatch { damage, reach, ..StatsPatch::NONE };
            let table = build_level_table(MELEE_BASE, &[patch]);
            prop_assert_eq!(table.len(), 2);
            prop_assert_eq!(table[1].damage, damage.unwrap_or(MELEE_BASE.damage));
            prop_assert_eq!(table[1].reach, reach.unwrap_or(MELEE_BASE.reach));
            prop_assert_eq!(table[1].damage_rate, MELEE_BASE.damage_rate);
            prop_assert_eq!(table[1].angle, MELEE_BASE.angle);
        }
    }
}
