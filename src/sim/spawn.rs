//! Spawn director
//!
//! The run is split into fixed-length periods. Each period has an enemy mix
//! and spawn interval, and may carry a boss or a one-shot formation that
//! fires once when the period is first entered. The last period carries the
//! final boss and no regular enemies.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::enemy::EnemyKind;
use super::events::GameEvent;
use super::state::GameState;
use crate::consts::SPAWN_RING_JITTER;
use crate::polar_to_cartesian;

/// One-shot enemy formation around the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WavePattern {
    /// `count` enemies evenly spaced on a circle
    Ring {
        kind: EnemyKind,
        count: usize,
        radius: f32,
    },
    /// Enemies every `spacing` units along a rectangle's perimeter
    Rect {
        kind: EnemyKind,
        half_width: f32,
        half_height: f32,
        spacing: f32,
    },
}

impl WavePattern {
    /// Spawn points relative to the player
    pub fn offsets(&self) -> Vec<(EnemyKind, Vec2)> {
        match *self {
            WavePattern::Ring {
                kind,
                count,
                radius,
            } => (0..count)
                .map(|i| (kind, polar_to_cartesian(radius, i as f32 * TAU / count as f32)))
                .collect(),
            WavePattern::Rect {
                kind,
                half_width,
                half_height,
                spacing,
            } => {
                if spacing <= 0.0 {
                    return Vec::new();
                }
                let mut points = Vec::new();
                let cols = (2.0 * half_width / spacing).floor() as usize;
                let rows = (2.0 * half_height / spacing).floor() as usize;
                for i in 0..=cols {
                    let x = -half_width + i as f32 * spacing;
                    points.push((kind, Vec2::new(x, -half_height)));
                    points.push((kind, Vec2::new(x, half_height)));
                }
                // Corners already placed by the horizontal edges
                for j in 1..rows {
                    let y = -half_height + j as f32 * spacing;
                    points.push((kind, Vec2::new(-half_width, y)));
                    points.push((kind, Vec2::new(half_width, y)));
                }
                points
            }
        }
    }
}

/// A segment of the run
#[derive(Debug, Clone, Copy)]
pub struct Period {
    /// Kinds picked uniformly for regular spawns
    pub enemies: &'static [EnemyKind],
    /// Seconds between regular spawns
    pub interval: f32,
    pub boss: Option<EnemyKind>,
    pub wave: Option<WavePattern>,
}

const fn period(enemies: &'static [EnemyKind], interval: f32) -> Period {
    Period {
        enemies,
        interval,
        boss: None,
        wave: None,
    }
}

pub const PERIODS: [Period; 9] = [
    period(&[EnemyKind::Grunt], 1.0),
    period(&[EnemyKind::Runner, EnemyKind::Grunt], 1.0),
    period(&[EnemyKind::Runner, EnemyKind::Grunt], 0.5),
    Period {
        boss: Some(EnemyKind::Boss),
        ..period(&[EnemyKind::Runner], 0.5)
    },
    Period {
        wave: Some(WavePattern::Ring {
            kind: EnemyKind::Grunt,
            count: 16,
            radius: 150.0,
        }),
        ..period(&[EnemyKind::Runner, EnemyKind::Brute], 0.7)
    },
    period(&[EnemyKind::Runner, EnemyKind::Brute], 0.5),
    Period {
        wave: Some(WavePattern::Rect {
            kind: EnemyKind::Runner,
            half_width: 220.0,
            half_height: 220.0,
            spacing: 40.0,
        }),
        ..period(&[EnemyKind::Brute, EnemyKind::Tank], 0.5)
    },
    Period {
        boss: Some(EnemyKind::Boss),
        ..period(&[EnemyKind::Brute, EnemyKind::Tank, EnemyKind::Runner], 0.35)
    },
    Period {
        boss: Some(EnemyKind::FinalBoss),
        ..period(&[], 0.0)
    },
];

pub const FINAL_PERIOD: usize = PERIODS.len() - 1;

/// Period active at `run_clock`; stays on the final period once reached
pub fn period_index(run_clock: f32, period_duration: f32) -> usize {
    if period_duration <= 0.0 || run_clock <= 0.0 {
        return 0;
    }
    ((run_clock / period_duration).floor() as usize).min(FINAL_PERIOD)
}

/// Random point on the ring just outside the visible playfield
pub fn ring_position<R: Rng>(center: Vec2, ring_radius: f32, rng: &mut R) -> Vec2 {
    let angle = rng.random::<f32>() * TAU;
    let distance = ring_radius + rng.random::<f32>() * SPAWN_RING_JITTER;
    center + polar_to_cartesian(distance, angle)
}

/// Run the director for one tick
pub fn advance(state: &mut GameState, dt: f32) {
    let index = period_index(state.manager.run_clock, state.config.period_duration);
    let period = PERIODS[index];

    if state.manager.last_period != Some(index) {
        state.manager.last_period = Some(index);
        log::info!("Spawn period {} at {:.1}s", index, state.manager.run_clock);

        if let Some(boss) = period.boss {
            let pos = ring_position(state.player.pos, state.config.spawn_ring_radius(), &mut state.rng);
            state.spawn_enemy(boss, pos);
            state.events.push(GameEvent::BossSpawned { kind: boss });
            log::info!("Boss {:?} spawned", boss);
        }

        if let Some(wave) = period.wave {
            let offsets = wave.offsets();
            let count = offsets.len();
            for (kind, offset) in offsets {
                state.spawn_enemy(kind, state.player.pos + offset);
            }
            state.events.push(GameEvent::WaveSpawned { count });
            log::info!("Wave of {} spawned", count);
        }
    }

    if period.enemies.is_empty() || period.interval <= 0.0 {
        return;
    }

    state.manager.spawn_timer += dt;
    while state.manager.spawn_timer > period.interval {
        state.manager.spawn_timer -= period.interval;
        let kind = period.enemies[state.rng.random_range(0..period.enemies.len())];
        let pos = ring_position(state.player.pos, state.config.spawn_ring_radius(), &mut state.rng);
        log::debug!("Spawning {:?} at {:?}", kind, pos);
        state.spawn_enemy(kind, pos);
    }
}
