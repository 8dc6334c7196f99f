//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only (one [`rand_pcg::Pcg32`] per game)
//! - Stable iteration order (insertion order, preserved across removals)
//! - No rendering, audio or platform dependencies

pub mod attribute;
pub mod collision;
pub mod enemy;
pub mod events;
pub mod player;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod weapon;

pub use attribute::{Attribute, Contributor};
pub use collision::{HitResult, cone_hit, disc_hit};
pub use enemy::{Enemy, EnemyKind};
pub use events::GameEvent;
pub use player::{Player, PlayerClass, Stat};
pub use snapshot::FrameSnapshot;
pub use state::{GameMode, GameState, Manager, Pickup, PickupKind};
pub use tick::{Button, InputState, tick};
pub use upgrade::{Upgrade, UpgradeId};
pub use weapon::{Weapon, WeaponKind, WeaponStats};
