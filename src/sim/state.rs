//! Game state and core simulation types
//!
//! One [`GameState`] is built at startup and reset in place for each run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::enemy::{Enemy, EnemyKind};
use super::events::GameEvent;
use super::player::{Player, PlayerClass};
use super::upgrade::UpgradeId;
use crate::config::SimConfig;

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    /// Title screen
    Start,
    /// Choosing a class, with a live preview player
    PickingPlayer,
    /// Active gameplay
    Running,
    /// Choosing a level-up upgrade
    PickingUpgrade,
    /// Game is paused
    Paused,
    /// Player died
    Dead,
    /// Final boss defeated
    Won,
}

/// Pickup contents
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PickupKind {
    Experience(f32),
    Health(f32),
}

/// A collectible dropped by a defeated enemy
#[derive(Debug, Clone, Serialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
}

/// Run clock, counters and menu state
#[derive(Debug, Clone, Serialize)]
pub struct Manager {
    pub mode: GameMode,
    /// Seconds of running time this run
    pub run_clock: f32,
    pub damage_dealt: f32,
    pub kills: u32,
    /// Accumulated time toward the next regular spawn
    pub spawn_timer: f32,
    /// Last spawn period whose one-shots have fired
    pub last_period: Option<usize>,
    /// Upgrades offered on the current level-up
    pub upgrade_choices: Vec<UpgradeId>,
    pub selected_choice: usize,
    /// Highlighted class on the class picker
    pub selected_class: usize,
}

impl Default for Manager {
    fn default() -> Self {
        Self {
            mode: GameMode::Start,
            run_clock: 0.0,
            damage_dealt: 0.0,
            kills: 0,
            spawn_timer: 0.0,
            last_period: None,
            upgrade_choices: Vec::new(),
            selected_choice: 0,
            selected_class: 0,
        }
    }
}

impl Manager {
    /// Clear per-run values, keeping the mode and class selection
    pub fn reset_run(&mut self) {
        self.run_clock = 0.0;
        self.damage_dealt = 0.0;
        self.kills = 0;
        self.spawn_timer = 0.0;
        self.last_period = None;
        self.upgrade_choices.clear();
        self.selected_choice = 0;
    }

    /// Damage per second over the run so far
    pub fn dps(&self) -> f32 {
        if self.run_clock > 0.0 {
            self.damage_dealt / self.run_clock
        } else {
            0.0
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SimConfig,
    /// Single source of randomness for the run
    pub rng: Pcg32,
    pub manager: Manager,
    pub player: Player,
    /// Active enemies, order preserved across removals
    pub enemies: Vec<Enemy>,
    /// Active pickups, order preserved across removals
    pub pickups: Vec<Pickup>,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state on the title screen
    pub fn new(config: SimConfig) -> Self {
        let config = config.sanitized();
        let player = Player::new(PlayerClass::cycle(0), &config);
        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            manager: Manager::default(),
            player,
            enemies: Vec::new(),
            pickups: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Class currently highlighted on the class picker
    pub fn selected_class(&self) -> PlayerClass {
        PlayerClass::cycle(self.manager.selected_class)
    }

    /// Replace the player with a fresh one of the highlighted class
    pub fn seed_player(&mut self) {
        self.player = Player::new(self.selected_class(), &self.config);
    }

    /// Reset everything for a new run, reusing allocations
    pub fn reset_run(&mut self) {
        self.manager.reset_run();
        self.enemies.clear();
        self.pickups.clear();
        self.seed_player();
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) {
        self.enemies.push(Enemy::new(kind, pos));
    }

    /// Events raised during the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
