//! Egg Flight - tap the falling eggs before they hit the ground
//!
//! Core modules:
//! - `sim`: Session state (eggs, flock, scores, scene state machine)
//! - `scenes`: Scene lifecycle controllers and display commands
//! - `codec`: Score token obfuscation for highscore submission
//! - `highscores`: Remote leaderboard contract and validator
//! - `identity`: Player identity / social login contract
//! - `settings`: Data-driven game configuration

pub mod codec;
pub mod game;
pub mod highscores;
pub mod identity;
pub mod scenes;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use codec::{CodecError, ScoreToken};
pub use game::Game;
pub use highscores::{HighscoreEntry, HighscoreError, HighscoreService, InMemoryHighscores};
pub use identity::{IdentityError, IdentityProvider, PlayerIdentity};
pub use settings::{ConfigError, GameConfig, TransitionPolicy};

/// Game configuration constants
pub mod consts {
    /// Taps needed before an egg flies away (five sprites, starting on the first)
    pub const EGG_STAGES: u8 = 4;
    /// Eggs dropped per level
    pub const EGGS_PER_LEVEL: usize = 10;
    /// Lives at the start of a game
    pub const STARTING_LIVES: u32 = 3;
    /// Speed multiplier increase per completed level
    pub const SPEED_STEP: f32 = 0.25;

    /// Pause before the first egg of a level drops (level label on screen)
    pub const INTERMISSION_SECS: f32 = 3.5;
    /// Egg fall speed at multiplier 1.0 (px/s)
    pub const BASE_FALL_SPEED: f32 = 100.0;
    /// Random spread applied to fall speed (+/- px/s)
    pub const FALL_SPEED_JITTER: f32 = 50.0;

    /// Scores at or above this are rejected by the validator
    pub const MAX_SCORE: u32 = 1000;
    /// Leaderboard size
    pub const MAX_HIGH_SCORES: usize = 10;
}
