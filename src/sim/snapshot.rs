//! Read-only frame view for presentation layers
//!
//! A [`FrameSnapshot`] carries everything a renderer, HUD or audio host
//! needs to present one frame. It owns its data and serializes to JSON.

use glam::Vec2;
use serde::Serialize;

use super::enemy::EnemyKind;
use super::events::GameEvent;
use super::player::{PlayerClass, Stat};
use super::state::{GameMode, GameState, PickupKind};
use super::upgrade::{self, UpgradeId};
use super::weapon::{WeaponKind, describe_stats};

#[derive(Debug, Clone, Serialize)]
pub struct StatView {
    pub stat: Stat,
    pub label: &'static str,
    pub value: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub name: &'static str,
    /// Zero-based level
    pub level: usize,
    pub max_level: usize,
    /// Orb centers, empty for non-orb weapons
    pub orbs: Vec<Vec2>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub class: PlayerClass,
    pub pos: Vec2,
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    /// One-based level for display
    pub level: u32,
    pub experience: f32,
    pub experience_to_next: f32,
    pub damage_flash: f32,
    pub pickup_flash: f32,
    pub stats: Vec<StatView>,
    pub weapons: Vec<WeaponView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub hit_flash: f32,
    pub boss: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupView {
    pub pos: Vec2,
    pub kind: PickupKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeChoiceView {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub applied: u32,
    pub max_applications: u32,
}

/// End-of-run summary
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub time: f32,
    pub level: u32,
    pub damage_dealt: f32,
    pub dps: f32,
    pub kills: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub mode: GameMode,
    pub run_clock: f32,
    pub period: Option<usize>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub pickups: Vec<PickupView>,
    pub upgrade_choices: Vec<UpgradeChoiceView>,
    pub selected_choice: usize,
    /// Class highlighted on the class picker
    pub selected_class: PlayerClass,
    pub summary: RunSummary,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Capture the current frame
    pub fn snapshot(&self) -> FrameSnapshot {
        let player = &self.player;
        let ctx = player.weapon_context();

        let weapons = player
            .weapons
            .iter()
            .map(|weapon| WeaponView {
                kind: weapon.kind,
                name: weapon.kind.name(),
                level: weapon.level,
                max_level: weapon.kind.max_level(),
                orbs: if weapon.kind == WeaponKind::Orbs {
                    weapon.orb_positions(player.pos, ctx.area)
                } else {
                    Vec::new()
                },
                details: describe_stats(weapon.kind, weapon.level),
            })
            .collect();

        let stats = Stat::ALL
            .iter()
            .map(|&stat| StatView {
                stat,
                label: stat.label(),
                value: player.stat(stat),
            })
            .collect();

        let upgrade_choices = self
            .manager
            .upgrade_choices
            .iter()
            .filter_map(|&id| {
                let upgrade = upgrade::get(id)?;
                Some(UpgradeChoiceView {
                    id,
                    name: upgrade.name.clone(),
                    description: upgrade.description(player),
                    applied: player.upgrade_count(id),
                    max_applications: upgrade.max_applications,
                })
            })
            .collect();

        FrameSnapshot {
            mode: self.manager.mode,
            run_clock: self.manager.run_clock,
            period: self.manager.last_period,
            player: PlayerView {
                class: player.class,
                pos: player.pos,
                facing: player.facing,
                health: player.health,
                max_health: player.stat(Stat::MaxHealth),
                level: player.level + 1,
                experience: player.experience,
                experience_to_next: player.experience_to_next,
                damage_flash: player.damage_flash,
                pickup_flash: player.pickup_flash,
                stats,
                weapons,
            },
            enemies: self
                .enemies
                .iter()
                .map(|enemy| EnemyView {
                    kind: enemy.kind,
                    pos: enemy.pos,
                    radius: enemy.radius(),
                    health: enemy.health,
                    max_health: enemy.kind.archetype().health,
                    hit_flash: enemy.hit_flash,
                    boss: enemy.boss,
                })
                .collect(),
            pickups: self
                .pickups
                .iter()
                .map(|pickup| PickupView {
                    pos: pickup.pos,
                    kind: pickup.kind,
                })
                .collect(),
            upgrade_choices,
            selected_choice: self.manager.selected_choice,
            selected_class: self.selected_class(),
            summary: RunSummary {
                time: self.manager.run_clock,
                level: player.level + 1,
                damage_dealt: self.manager.damage_dealt,
                dps: self.manager.dps(),
                kills: self.manager.kills,
            },
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(SimConfig::default());
        state.spawn_enemy(EnemyKind::Boss, Vec2::new(10.0, 0.0));
        state.enemies[0].health = 250.0;
        state.manager.run_clock = 10.0;
        state.manager.damage_dealt = 50.0;

        let snap = state.snapshot();
        assert_eq!(snap.mode, GameMode::Start);
        assert_eq!(snap.player.level, 1);
        assert_eq!(snap.player.stats.len(), Stat::COUNT);
        assert_eq!(snap.player.weapons.len(), 1);
        assert!(snap.player.weapons[0].orbs.is_empty());
        assert_eq!(snap.enemies[0].max_health, 500.0);
        assert!(snap.enemies[0].boss);
        assert_eq!(snap.summary.dps, 5.0);
    }

    #[test]
    fn test_snapshot_orbs_and_choices() {
        let mut state = GameState::new(SimConfig::default());
        state.manager.selected_class = 1;
        state.seed_player();
        state.manager.upgrade_choices = vec![UpgradeId(0), UpgradeId(1)];

        let snap = state.snapshot();
        assert_eq!(snap.selected_class, PlayerClass::Mystic);
        assert_eq!(snap.player.weapons[0].orbs.len(), 2);
        assert_eq!(snap.upgrade_choices.len(), 2);
        assert_eq!(snap.upgrade_choices[0].applied, 0);
        assert!(!snap.upgrade_choices[0].description.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(SimConfig::default());
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"mode\":\"Start\""));
    }
}
