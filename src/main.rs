//! Arena Survivor entry point
//!
//! Headless demo: plays one run on autopilot, logs it, and prints the final
//! frame snapshot as JSON. The only argument is an optional RNG seed.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use arena_survivor::SimConfig;
    use arena_survivor::sim::{Button, GameMode, GameState, InputState, tick};
    use glam::Vec2;

    /// Frame length fed to the simulation
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this much simulated time (seconds)
    pub const MAX_SIM_TIME: f32 = 20.0 * 60.0;
    /// Keep at least this far from the nearest enemy
    const SAFE_DISTANCE: f32 = 60.0;

    /// Input a simple bot would produce for the current frame
    pub fn input_for(state: &GameState) -> InputState {
        let mut input = InputState::default();

        match state.manager.mode {
            GameMode::Start
            | GameMode::PickingPlayer
            | GameMode::PickingUpgrade
            | GameMode::Paused => input.press(Button::Confirm),
            GameMode::Running => {
                let player = state.player.pos;
                let nearest = state
                    .enemies
                    .iter()
                    .map(|e| e.pos - player)
                    .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));

                if let Some(offset) = nearest {
                    input.aim = Some(offset);
                    if offset.length() < SAFE_DISTANCE {
                        hold_direction(&mut input, -offset);
                    }
                }
            }
            GameMode::Dead | GameMode::Won => {}
        }

        input
    }

    fn hold_direction(input: &mut InputState, dir: Vec2) {
        if dir.x < -0.5 {
            input.press(Button::Left);
        } else if dir.x > 0.5 {
            input.press(Button::Right);
        }
        if dir.y < -0.5 {
            input.press(Button::Up);
        } else if dir.y > 0.5 {
            input.press(Button::Down);
        }
    }

    pub fn run(seed: u64) {
        let mut state = GameState::new(SimConfig::with_seed(seed));
        log::info!("Game initialized with seed: {}", seed);

        let mut sim_time = 0.0;
        loop {
            let mut input = input_for(&state);
            tick(&mut state, &mut input, FRAME_DT);
            sim_time += FRAME_DT;

            if matches!(state.manager.mode, GameMode::Dead | GameMode::Won) {
                break;
            }
            if sim_time >= MAX_SIM_TIME {
                log::warn!("Stopping after {:.0}s of simulated time", sim_time);
                break;
            }
        }

        let snapshot = state.snapshot();
        let summary = &snapshot.summary;
        log::info!(
            "Run over ({:?}): {:.1}s, level {}, {:.0} damage ({:.1} dps), {} kills",
            snapshot.mode,
            summary.time,
            summary.level,
            summary.damage_dealt,
            summary.dps,
            summary.kills
        );

        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Survivor (headless) starting...");

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid seed '{}'", arg);
            arena_survivor::SimConfig::default().seed
        }),
        None => arena_survivor::SimConfig::default().seed,
    };

    autopilot::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive the library directly on wasm
}
