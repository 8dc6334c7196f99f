//! Level-up upgrade catalog and weighted selection
//!
//! The catalog is built once. Eligibility is decided per player: the
//! upgrade's condition must hold and it must have been applied fewer than
//! `max_applications` times. Choices are drawn without replacement,
//! weighted.

use std::sync::LazyLock;

use rand::Rng;
use serde::Serialize;

use super::attribute::Contributor;
use super::player::{Player, Stat};
use super::weapon::{Weapon, WeaponKind, describe_level_up};
use crate::consts::{
    BASE_UPGRADE_WEIGHT, DEFAULT_MAX_APPLICATIONS, WEAPON_ACQUIRE_WEIGHT, WEAPON_LEVEL_WEIGHT,
};

/// Index into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UpgradeId(pub usize);

/// What an upgrade does when applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Append `Add(amount)` to the stat's base contributors
    AddBase(Stat, f32),
    /// Append `Add(amount)` to the stat's multiplier contributors
    AddMultiplier(Stat, f32),
    /// Append `PerLevel(amount)` to the stat's base contributors
    AddPerLevel(Stat, f32),
    /// Restore health now
    Heal(f32),
    /// Raise max health and heal a little
    MaxHealth { amount: f32, heal: f32 },
    /// Equip a new weapon at level 0
    AcquireWeapon(WeaponKind),
    /// Raise an equipped weapon's level
    LevelWeapon(WeaponKind),
}

/// Extra eligibility rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Health below max
    Wounded,
    /// Weapon not yet equipped
    LacksWeapon(WeaponKind),
    /// Weapon equipped and below its max level
    CanLevelWeapon(WeaponKind),
}

impl Condition {
    pub fn holds(&self, player: &Player) -> bool {
        match self {
            Condition::Wounded => player.health < player.stat(Stat::MaxHealth),
            Condition::LacksWeapon(kind) => !player.has_weapon(*kind),
            Condition::CanLevelWeapon(kind) => {
                player.weapon(*kind).is_some_and(|w| !w.is_max_level())
            }
        }
    }
}

/// Catalog entry
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub name: String,
    description: Option<&'static str>,
    pub effect: UpgradeEffect,
    pub max_applications: u32,
    pub condition: Option<Condition>,
    pub weight: f32,
}

impl Upgrade {
    fn stat(name: &str, description: &'static str, effect: UpgradeEffect) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description),
            effect,
            max_applications: DEFAULT_MAX_APPLICATIONS,
            condition: None,
            weight: BASE_UPGRADE_WEIGHT,
        }
    }

    fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    fn acquire(kind: WeaponKind) -> Self {
        Self {
            name: kind.name().to_string(),
            description: None,
            effect: UpgradeEffect::AcquireWeapon(kind),
            max_applications: 1,
            condition: Some(Condition::LacksWeapon(kind)),
            weight: WEAPON_ACQUIRE_WEIGHT,
        }
    }

    fn level(kind: WeaponKind) -> Self {
        Self {
            name: format!("{}+", kind.name()),
            description: None,
            effect: UpgradeEffect::LevelWeapon(kind),
            max_applications: kind.max_level() as u32,
            condition: Some(Condition::CanLevelWeapon(kind)),
            weight: WEAPON_LEVEL_WEIGHT,
        }
    }

    /// Description for the player's current state
    pub fn description(&self, player: &Player) -> String {
        if let Some(text) = self.description {
            return text.to_string();
        }
        match self.effect {
            UpgradeEffect::AcquireWeapon(kind) => format!("Equip {}", kind.name()),
            UpgradeEffect::LevelWeapon(kind) => player
                .weapon(kind)
                .and_then(|w| describe_level_up(kind, w.level))
                .unwrap_or_else(|| "Max level".to_string()),
            _ => String::new(),
        }
    }

    pub fn is_available(&self, id: UpgradeId, player: &Player) -> bool {
        if self.condition.is_some_and(|c| !c.holds(player)) {
            return false;
        }
        player.upgrade_count(id) < self.max_applications
    }

    /// Mutate the player. Does not record the application.
    pub fn apply(&self, player: &mut Player) {
        match self.effect {
            UpgradeEffect::AddBase(stat, amount) => {
                player.attributes.get_mut(stat).add_base(Contributor::Add(amount));
            }
            UpgradeEffect::AddMultiplier(stat, amount) => {
                player.attributes.get_mut(stat).add_multiplier(Contributor::Add(amount));
            }
            UpgradeEffect::AddPerLevel(stat, amount) => {
                player.attributes.get_mut(stat).add_base(Contributor::PerLevel(amount));
            }
            UpgradeEffect::Heal(amount) => player.health += amount,
            UpgradeEffect::MaxHealth { amount, heal } => {
                player.attributes.get_mut(Stat::MaxHealth).add_base(Contributor::Add(amount));
                player.health += heal;
            }
            UpgradeEffect::AcquireWeapon(kind) => {
                if !player.has_weapon(kind) {
                    player.weapons.push(Weapon::new(kind));
                }
            }
            UpgradeEffect::LevelWeapon(kind) => {
                if let Some(weapon) = player.weapon_mut(kind) {
                    weapon.level_up();
                }
            }
        }
    }
}

fn build_catalog() -> Vec<Upgrade> {
    use UpgradeEffect::*;

    let mut catalog = vec![
        Upgrade::stat("Swift Feet", "+10% speed", AddMultiplier(Stat::Speed, 0.1)),
        Upgrade::stat("Quick Step", "+1 base speed", AddBase(Stat::Speed, 1.0)),
        Upgrade::stat("Second Wind", "+25 health", Heal(25.0)).when(Condition::Wounded),
        Upgrade::stat(
            "Vitality",
            "+25 max health, +5 health",
            MaxHealth {
                amount: 25.0,
                heal: 5.0,
            },
        ),
        Upgrade::stat("Sharpened Edge", "+2 damage", AddBase(Stat::Damage, 2.0)),
        Upgrade::stat(
            "Growing Fury",
            "+0.5 damage per level",
            AddPerLevel(Stat::Damage, 0.5),
        ),
        Upgrade::stat("Wide Reach", "+15% area", AddMultiplier(Stat::Area, 0.15)),
        Upgrade::stat(
            "Haste",
            "-8% weapon cooldowns",
            AddMultiplier(Stat::AttackSpeed, -0.08),
        ),
        Upgrade::stat(
            "Regeneration",
            "+0.05 health regen",
            AddBase(Stat::HealthRegen, 0.05),
        ),
        Upgrade::stat(
            "Deep Roots",
            "+5% health regen",
            AddMultiplier(Stat::HealthRegen, 0.05),
        ),
        Upgrade::stat("Magnetism", "+10 pickup range", AddBase(Stat::PickupRadius, 10.0)),
        Upgrade::stat(
            "Scavenger",
            "+3% health drop chance",
            AddBase(Stat::HealthDropChance, 0.03),
        ),
        Upgrade::stat(
            "Insight",
            "+10% experience",
            AddMultiplier(Stat::ExperienceGain, 0.1),
        ),
    ];

    for kind in WeaponKind::ALL {
        catalog.push(Upgrade::acquire(kind));
        catalog.push(Upgrade::level(kind));
    }
    catalog
}

static CATALOG: LazyLock<Vec<Upgrade>> = LazyLock::new(build_catalog);

pub fn catalog() -> &'static [Upgrade] {
    &CATALOG
}

pub fn get(id: UpgradeId) -> Option<&'static Upgrade> {
    CATALOG.get(id.0)
}

/// Catalog entries the player may currently be offered
pub fn eligible(player: &Player) -> Vec<UpgradeId> {
    catalog()
        .iter()
        .enumerate()
        .map(|(i, u)| (UpgradeId(i), u))
        .filter(|(id, u)| u.is_available(*id, player))
        .map(|(id, _)| id)
        .collect()
}

/// Draw up to `count` distinct items, weighted, without replacement
///
/// Each draw picks `r` uniform in `[0, total)` and walks the pool until the
/// running weight sum reaches `r`.
pub fn weighted_sample<T: Copy, R: Rng>(
    mut pool: Vec<(T, f32)>,
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut chosen = Vec::with_capacity(count.min(pool.len()));

    while chosen.len() < count && !pool.is_empty() {
        let total: f32 = pool.iter().map(|(_, w)| w.max(0.0)).sum();
        let draw = if total > 0.0 {
            rng.random::<f32>() * total
        } else {
            0.0
        };

        // Rounding can leave `draw` above the final sum; fall back to the
        // last positive weight, or the last entry if none are positive
        let mut running = 0.0;
        let mut pick = pool
            .iter()
            .rposition(|(_, w)| *w > 0.0)
            .unwrap_or(pool.len() - 1);
        for (i, (_, weight)) in pool.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            running += weight;
            if running >= draw {
                pick = i;
                break;
            }
        }

        chosen.push(pool.remove(pick).0);
    }

    chosen
}

/// Roll the level-up choices for a player
pub fn roll_choices<R: Rng>(player: &Player, count: usize, rng: &mut R) -> Vec<UpgradeId> {
    let pool: Vec<(UpgradeId, f32)> = eligible(player)
        .into_iter()
        .filter_map(|id| get(id).map(|u| (id, u.weight)))
        .collect();
    let choices = weighted_sample(pool, count, rng);
    log::debug!("Rolled upgrade choices {:?}", choices);
    choices
}

/// Apply an upgrade and record it on the player
pub fn apply(id: UpgradeId, player: &mut Player) -> bool {
    let Some(upgrade) = get(id) else {
        log::warn!("Unknown upgrade {:?}", id);
        return false;
    };
    upgrade.apply(player);
    player.applied_upgrades.push(id);
    log::info!("Applied upgrade '{}'", upgrade.name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::player::PlayerClass;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn find(name: &str) -> UpgradeId {
        let index = catalog()
            .iter()
            .position(|u| u.name == name)
            .unwrap_or_else(|| panic!("no upgrade named {name}"));
        UpgradeId(index)
    }

    fn knight() -> Player {
        Player::new(PlayerClass::Knight, &SimConfig::default())
    }

    #[test]
    fn test_uniform_weights_are_fair() {
        let mut rng = Pcg32::seed_from_u64(7);
        let n = 6;
        let trials = 30_000;
        let mut counts = vec![[0u32; 3]; n];

        for _ in 0..trials {
            let pool: Vec<(usize, f32)> = (0..n).map(|i| (i, 1.0)).collect();
            let picks = weighted_sample(pool, 3, &mut rng);
            assert_eq!(picks.len(), 3);
            for (slot, item) in picks.into_iter().enumerate() {
                counts[item][slot] += 1;
            }
        }

        for item in &counts {
            for &slot_count in item {
                let freq = slot_count as f32 / trials as f32;
                assert!((freq - 1.0 / n as f32).abs() < 0.02, "frequency {freq}");
            }
        }
    }

    #[test]
    fn test_sample_without_replacement() {
        let mut rng = Pcg32::seed_from_u64(1);
        let pool = vec![("a", 1.0), ("b", 5.0), ("c", 0.5)];
        let mut picks = weighted_sample(pool, 3, &mut rng);
        picks.sort();
        assert_eq!(picks, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sample_short_and_empty_pools() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(weighted_sample(vec![(1, 1.0)], 3, &mut rng), vec![1]);
        assert!(weighted_sample(Vec::<(u8, f32)>::new(), 3, &mut rng).is_empty());
        // All-zero weights still terminate
        assert_eq!(weighted_sample(vec![(1, 0.0), (2, 0.0)], 2, &mut rng).len(), 2);
    }

    #[test]
    fn test_zero_weight_never_drawn_before_positive() {
        let mut rng = Pcg32::seed_from_u64(11);
        let pool = vec![(0, 0.1), (1, 0.2), (2, 0.3), (3, 0.0)];
        for _ in 0..5_000 {
            let picks = weighted_sample(pool.clone(), 3, &mut rng);
            assert!(!picks.contains(&3), "zero weight picked: {picks:?}");
        }
    }

    #[test]
    fn test_heavier_weight_is_favoured() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut heavy = 0;
        for _ in 0..2_000 {
            let pick = weighted_sample(vec![(0, 1.0), (1, 9.0)], 1, &mut rng);
            if pick == vec![1] {
                heavy += 1;
            }
        }
        assert!(heavy > 1_700 && heavy < 1_900, "heavy picks {heavy}");
    }

    #[test]
    fn test_max_applications_enforced() {
        let mut player = knight();
        let id = find("Quick Step");
        for _ in 0..5 {
            assert!(eligible(&player).contains(&id));
            assert!(apply(id, &mut player));
        }
        assert_eq!(player.upgrade_count(id), 5);
        assert!(!eligible(&player).contains(&id));

        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            assert!(!roll_choices(&player, 3, &mut rng).contains(&id));
        }
    }

    #[test]
    fn test_conditions() {
        let mut player = knight();
        let heal = find("Second Wind");
        let acquire_cone = find("Blade Sweep");
        let level_cone = find("Blade Sweep+");
        let acquire_orbs = find("Orbiting Orbs");
        let level_orbs = find("Orbiting Orbs+");

        let available = eligible(&player);
        assert!(!available.contains(&heal));
        assert!(!available.contains(&acquire_cone));
        assert!(available.contains(&level_cone));
        assert!(available.contains(&acquire_orbs));
        assert!(!available.contains(&level_orbs));

        player.health -= 10.0;
        apply(acquire_orbs, &mut player);
        let available = eligible(&player);
        assert!(available.contains(&heal));
        assert!(!available.contains(&acquire_orbs));
        assert!(available.contains(&level_orbs));
    }

    #[test]
    fn test_weapon_level_upgrade_caps_at_table() {
        let mut player = knight();
        let id = find("Blade Sweep+");
        assert_eq!(get(id).map(|u| u.max_applications), Some(7));
        while eligible(&player).contains(&id) {
            apply(id, &mut player);
        }
        assert_eq!(player.upgrade_count(id), 7);
        assert!(player.weapons[0].is_max_level());
    }

    #[test]
    fn test_stat_upgrades_change_attributes() {
        let mut player = knight();
        apply(find("Swift Feet"), &mut player);
        assert!((player.stat(Stat::Speed) - 27.5).abs() < 1e-4);
        apply(find("Quick Step"), &mut player);
        assert!((player.stat(Stat::Speed) - 28.6).abs() < 1e-4);

        apply(find("Vitality"), &mut player);
        assert_eq!(player.stat(Stat::MaxHealth), 145.0);
        assert_eq!(player.health, 125.0);

        apply(find("Haste"), &mut player);
        assert!((player.stat(Stat::AttackSpeed) - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_weapon_descriptions_follow_level() {
        let mut player = knight();
        let id = find("Blade Sweep+");
        let upgrade = get(id).unwrap();
        assert_eq!(upgrade.description(&player), "Damage 8 → 10");
        apply(id, &mut player);
        assert_eq!(upgrade.description(&player), "Reach 80 → 90");
        assert_eq!(get(find("Shock Pulse")).unwrap().description(&player), "Equip Shock Pulse");
    }

    #[test]
    fn test_acquire_weighted_below_level() {
        assert!(WEAPON_ACQUIRE_WEIGHT < WEAPON_LEVEL_WEIGHT);
        assert!(get(find("Orbiting Orbs")).unwrap().weight < get(find("Orbiting Orbs+")).unwrap().weight);
    }
}
