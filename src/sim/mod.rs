//! Game session simulation
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Synchronous, single-threaded state transitions
//! - Events delivered in a fixed FIFO order
//! - Seeded RNG only

pub mod egg;
pub mod flock;
pub mod launch;
pub mod session;
pub mod signal;
pub mod state;

pub use egg::{Egg, EggKey, EggOutcome, EggSignal};
pub use flock::{EggFlock, SpawnedEgg};
pub use launch::{EggLaunch, LaunchPlanner};
pub use session::GameSession;
pub use signal::{SignalQueue, Subscribers, SubscriptionId};
pub use state::{GameEvent, GameSnapshot, GameState, Scene};
