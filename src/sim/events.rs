//! Discrete notifications for the presentation layer
//!
//! Collected during a tick and cleared at the start of the next one. Audio
//! and effects subscribe by reading [`GameState::events`](super::GameState::events).

use glam::Vec2;
use serde::Serialize;

use super::enemy::EnemyKind;
use super::upgrade::UpgradeId;
use super::weapon::WeaponKind;

/// Simulation event types
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// A weapon damaged an enemy
    EnemyHit { pos: Vec2, weapon: WeaponKind },
    /// An enemy died and dropped its pickups
    EnemyKilled { pos: Vec2, kind: EnemyKind },
    /// An enemy damaged the player
    PlayerHit { damage: f32 },
    /// Player collected a pickup
    PickupCollected,
    /// Player reached a new level
    LevelUp { level: u32 },
    /// A period's boss entered the arena
    BossSpawned { kind: EnemyKind },
    /// A period's one-shot formation entered the arena
    WaveSpawned { count: usize },
    /// An upgrade was chosen and applied
    UpgradeApplied { upgrade: UpgradeId },
    /// A menu cursor moved
    MenuMove,
    /// A menu choice was confirmed
    MenuConfirm,
    Paused,
    Resumed,
    /// A fresh run began
    RunStarted,
    /// Player health reached zero
    PlayerDied,
    /// Final boss defeated
    RunWon,
}
