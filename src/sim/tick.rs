//! Per-frame simulation tick
//!
//! Advances the manager every frame; enemies, pickups and the player only
//! while running. Entities removed during a pass are collected by index and
//! compacted afterwards, preserving the order of the survivors.

use glam::Vec2;
use rand::Rng;

use super::collision::direction_to;
use super::events::GameEvent;
use super::player::{PlayerClass, Stat};
use super::spawn::{self, FINAL_PERIOD};
use super::state::{GameMode, GameState, Pickup, PickupKind};
use super::upgrade;
use crate::consts::*;

/// Discrete input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Pause,
}

/// One flag per [`Button`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub pause: bool,
}

impl Buttons {
    pub fn get(&self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Confirm => self.confirm,
            Button::Pause => self.pause,
        }
    }

    pub fn set(&mut self, button: Button, value: bool) {
        let flag = match button {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Confirm => &mut self.confirm,
            Button::Pause => &mut self.pause,
        };
        *flag = value;
    }
}

/// Abstract input for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Buttons currently held
    pub held: Buttons,
    /// Buttons that went down since the last tick
    pub just_pressed: Buttons,
    /// Aim offset from the player (pointer relative to screen center)
    pub aim: Option<Vec2>,
}

impl InputState {
    /// Input with one button freshly pressed
    pub fn pressed(button: Button) -> Self {
        let mut input = Self::default();
        input.press(button);
        input
    }

    pub fn press(&mut self, button: Button) {
        if !self.held.get(button) {
            self.just_pressed.set(button, true);
        }
        self.held.set(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.held.set(button, false);
    }

    /// Held direction, not normalized (+y is down)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(
            axis(self.held.left, self.held.right),
            axis(self.held.up, self.held.down),
        )
    }

    /// Consume the edge-triggered presses
    pub fn end_frame(&mut self) {
        self.just_pressed = Buttons::default();
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &mut InputState, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.events.clear();

    manager_tick(state, input, dt);

    if state.manager.mode == GameMode::Running {
        enemies_tick(state, dt);
        // A downed player gains nothing more this frame
        if state.player.is_alive() {
            pickups_tick(state, dt);
            player_tick(state, input, dt);
        }
    }

    input.end_frame();
}

fn manager_tick(state: &mut GameState, input: &InputState, dt: f32) {
    let pressed = input.just_pressed;

    match state.manager.mode {
        GameMode::Start | GameMode::Dead | GameMode::Won => {
            if pressed.confirm {
                state.manager.mode = GameMode::PickingPlayer;
                state.seed_player();
                state.events.push(GameEvent::MenuConfirm);
            }
        }

        GameMode::PickingPlayer => {
            let classes = PlayerClass::ALL.len();
            let step = if pressed.left || pressed.up {
                classes - 1
            } else if pressed.right || pressed.down {
                1
            } else {
                0
            };
            if step != 0 {
                state.manager.selected_class = (state.manager.selected_class + step) % classes;
                state.seed_player();
                state.events.push(GameEvent::MenuMove);
            }

            if pressed.confirm {
                state.reset_run();
                state.manager.mode = GameMode::Running;
                state.events.push(GameEvent::MenuConfirm);
                state.events.push(GameEvent::RunStarted);
                log::info!("Run started as {}", state.player.class.name());
            }
        }

        GameMode::Running => {
            if pressed.pause {
                state.manager.mode = GameMode::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }

            if !state.player.is_alive() {
                state.manager.mode = GameMode::Dead;
                state.events.push(GameEvent::PlayerDied);
                log::info!(
                    "Player died at {:.1}s, level {}, {} kills",
                    state.manager.run_clock,
                    state.player.level + 1,
                    state.manager.kills
                );
                return;
            }

            state.manager.run_clock += dt;
            spawn::advance(state, dt);

            if state.manager.last_period == Some(FINAL_PERIOD) && state.enemies.is_empty() {
                state.manager.mode = GameMode::Won;
                state.events.push(GameEvent::RunWon);
                log::info!("Run won at {:.1}s", state.manager.run_clock);
            }
        }

        GameMode::PickingUpgrade => {
            let manager = &mut state.manager;
            if pressed.up && manager.selected_choice > 0 {
                manager.selected_choice -= 1;
                state.events.push(GameEvent::MenuMove);
            }
            if pressed.down && manager.selected_choice + 1 < manager.upgrade_choices.len() {
                manager.selected_choice += 1;
                state.events.push(GameEvent::MenuMove);
            }

            if pressed.confirm {
                match manager.upgrade_choices.get(manager.selected_choice).copied() {
                    Some(id) => {
                        if upgrade::apply(id, &mut state.player) {
                            state.events.push(GameEvent::UpgradeApplied { upgrade: id });
                        }
                    }
                    None => log::warn!(
                        "Upgrade selection {} out of range ({} choices)",
                        manager.selected_choice,
                        manager.upgrade_choices.len()
                    ),
                }
                manager.upgrade_choices.clear();
                manager.selected_choice = 0;
                manager.mode = GameMode::Running;
                state.events.push(GameEvent::MenuConfirm);
            }
        }

        GameMode::Paused => {
            if pressed.pause || pressed.confirm {
                state.manager.mode = GameMode::Running;
                state.events.push(GameEvent::Resumed);
            }
        }
    }
}

/// Remove the items at the sorted `indices`, keeping the rest in order
fn compact<T>(items: &mut Vec<T>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let mut pending = indices.iter().peekable();
    let mut index = 0;
    items.retain(|_| {
        let remove = pending.peek() == Some(&&index);
        if remove {
            pending.next();
        }
        index += 1;
        !remove
    });
}

fn enemies_tick(state: &mut GameState, dt: f32) {
    let GameState {
        config,
        rng,
        manager,
        player,
        enemies,
        pickups,
        events,
    } = state;

    let despawn_radius = config.despawn_radius();
    let drop_chance = player.stat(Stat::HealthDropChance);
    let mut removed = Vec::new();

    for (index, enemy) in enemies.iter_mut().enumerate() {
        let archetype = enemy.kind.archetype();

        if !enemy.is_alive() {
            pickups.push(Pickup {
                pos: enemy.pos,
                kind: PickupKind::Experience(archetype.experience),
            });
            if rng.random::<f32>() < drop_chance {
                pickups.push(Pickup {
                    pos: enemy.pos,
                    kind: PickupKind::Health(config.health_pickup_value),
                });
            }
            manager.kills += 1;
            events.push(GameEvent::EnemyKilled {
                pos: enemy.pos,
                kind: enemy.kind,
            });
            removed.push(index);
            continue;
        }

        enemy.hit_flash = (enemy.hit_flash - dt).max(0.0);

        let mut step = enemy.knockback * dt;
        let to_player = player.pos - enemy.pos;
        let distance = to_player.length();

        if !enemy.boss && distance > despawn_radius {
            removed.push(index);
            continue;
        }

        if enemy.attack_cooldown <= 0.0 {
            if distance < archetype.radius + PLAYER_RADIUS {
                player.health -= archetype.damage;
                player.damage_flash = DAMAGE_FLASH;
                enemy.attack_cooldown = archetype.attack_cooldown;
                events.push(GameEvent::PlayerHit {
                    damage: archetype.damage,
                });
            }
            step += direction_to(enemy.pos, player.pos) * archetype.speed * dt;
        } else {
            enemy.attack_cooldown -= dt;
        }

        enemy.pos += step;
        enemy.decay_knockback(dt);
    }

    compact(enemies, &removed);
}

fn pickups_tick(state: &mut GameState, dt: f32) {
    let GameState {
        config,
        player,
        pickups,
        events,
        ..
    } = state;

    let pull_radius = player.stat(Stat::PickupRadius);
    let experience_gain = player.stat(Stat::ExperienceGain);
    let mut removed = Vec::new();

    for (index, pickup) in pickups.iter_mut().enumerate() {
        let to_player = player.pos - pickup.pos;
        let distance = to_player.length();

        if distance < config.collect_radius {
            match pickup.kind {
                PickupKind::Experience(amount) => player.experience += amount * experience_gain,
                PickupKind::Health(amount) => player.health += amount,
            }
            player.pickup_flash = PICKUP_FLASH;
            events.push(GameEvent::PickupCollected);
            removed.push(index);
        } else if distance < pull_radius {
            let speed = (pull_radius + PICKUP_PULL_BONUS - distance) * dt * PICKUP_PULL_FACTOR;
            pickup.pos += direction_to(pickup.pos, player.pos) * speed;
        }
    }

    compact(pickups, &removed);
}

fn player_tick(state: &mut GameState, input: &InputState, dt: f32) {
    let GameState {
        config,
        rng,
        manager,
        player,
        enemies,
        events,
        ..
    } = state;

    player.apply_movement(input.movement(), dt);
    if let Some(aim) = input.aim {
        player.aim(aim);
    }

    if player.try_level_up(config) {
        log::info!("Level up -> {}", player.level + 1);
        events.push(GameEvent::LevelUp {
            level: player.level,
        });

        let choices = upgrade::roll_choices(player, UPGRADE_CHOICES, rng);
        if choices.is_empty() {
            log::debug!("No upgrades available, continuing");
        } else {
            manager.upgrade_choices = choices;
            manager.selected_choice = 0;
            manager.mode = GameMode::PickingUpgrade;
        }
    }

    player.decay_flashes(dt);
    player.regenerate(dt);

    let ctx = player.weapon_context();
    let mut dealt = 0.0;
    for weapon in &mut player.weapons {
        dealt += weapon.tick(&ctx, enemies, events, dt);
    }
    manager.damage_dealt += dealt;
}
