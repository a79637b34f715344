//! Session state and the scene state machine
//!
//! `GameState` is owned by one `GameSession` and only changes through its own
//! handler methods. Every mutation reports what happened as `GameEvent`s.

use serde::{Deserialize, Serialize};

use super::egg::{EggKey, EggOutcome};
use super::flock::{EggFlock, SpawnedEgg};
use crate::settings::{GameConfig, TransitionPolicy};

/// Full-screen game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Menu,
    Playing,
    GameOver,
    Highscore,
    Credits,
}

impl Scene {
    pub const ALL: [Scene; 5] = [
        Scene::Menu,
        Scene::Playing,
        Scene::GameOver,
        Scene::Highscore,
        Scene::Credits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scene::Menu => "menu",
            Scene::Playing => "playing",
            Scene::GameOver => "game_over",
            Scene::Highscore => "highscore",
            Scene::Credits => "credits",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "menu" => Some(Scene::Menu),
            "playing" | "game" => Some(Scene::Playing),
            "game_over" => Some(Scene::GameOver),
            "highscore" => Some(Scene::Highscore),
            "credits" => Some(Scene::Credits),
            _ => None,
        }
    }

    /// Transition table. Self-transitions are handled separately as no-ops.
    pub fn can_transition(self, to: Scene) -> bool {
        use Scene::*;
        matches!(
            (self, to),
            (_, Menu)
                | (Menu, Playing | Highscore | Credits)
                | (Playing, GameOver)
                | (GameOver, Playing)
        )
    }
}

/// Everything observers learn about a session, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A level started with these eggs
    EggsSpawned { eggs: Vec<SpawnedEgg> },
    EggAdvanced { egg: EggKey, stage: u8 },
    EggFlew { egg: EggKey },
    EggBroke { egg: EggKey },
    /// Egg removed from the live set
    EggSettled { egg: EggKey, outcome: EggOutcome },
    /// score + 1
    ScoreGained,
    /// lives - 1
    LifeLost,
    LevelComplete { generation: u32 },
    ScoreChanged { score: u32 },
    LivesChanged { lives: u32 },
    LevelChanged { level: u32, speed_multiplier: f32 },
    SceneChanged { from: Scene, to: Scene },
    /// The current game was abandoned; callbacks for its eggs are void
    FlockDiscarded { generation: u32 },
}

/// Read-only view of the session for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub scene: Scene,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub speed_multiplier: f32,
    pub live_eggs: usize,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    scene: Scene,
    score: u32,
    lives: u32,
    level: u32,
    speed_multiplier: f32,
    /// Eggs of the running game (None outside of play)
    flock: Option<EggFlock>,
    next_generation: u32,
    config: GameConfig,
}

impl GameState {
    /// Fresh session sitting on the menu
    pub fn new(config: GameConfig) -> Self {
        Self {
            scene: Scene::Menu,
            score: 0,
            lives: config.starting_lives,
            level: 1,
            speed_multiplier: 1.0,
            flock: None,
            next_generation: 1,
            config,
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn flock(&self) -> Option<&EggFlock> {
        self.flock.as_ref()
    }

    pub fn flock_generation(&self) -> Option<u32> {
        self.flock.as_ref().map(EggFlock::generation)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            scene: self.scene,
            score: self.score,
            lives: self.lives,
            level: self.level,
            speed_multiplier: self.speed_multiplier,
            live_eggs: self.flock.as_ref().map_or(0, EggFlock::len),
        }
    }

    /// Defaults for a new game
    pub fn reset_game_data(&mut self, out: &mut Vec<GameEvent>) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.level = 1;
        self.speed_multiplier = 1.0;
        out.push(GameEvent::ScoreChanged { score: self.score });
        out.push(GameEvent::LivesChanged { lives: self.lives });
        out.push(GameEvent::LevelChanged {
            level: self.level,
            speed_multiplier: self.speed_multiplier,
        });
    }

    pub fn handle_score(&mut self, out: &mut Vec<GameEvent>) {
        self.score += 1;
        out.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Lose a life; running out ends the game
    pub fn handle_life_loss(&mut self, out: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        out.push(GameEvent::LivesChanged { lives: self.lives });
        if self.lives == 0 {
            log::info!("Out of lives at level {} with score {}", self.level, self.score);
            self.set_scene(Scene::GameOver, out);
        }
    }

    /// Next level: faster eggs, fresh batch
    pub fn handle_level_complete(&mut self, out: &mut Vec<GameEvent>) {
        self.level += 1;
        self.speed_multiplier += self.config.speed_step;
        log::info!(
            "Level {} (speed x{:.2})",
            self.level,
            self.speed_multiplier
        );
        out.push(GameEvent::LevelChanged {
            level: self.level,
            speed_multiplier: self.speed_multiplier,
        });
        let eggs = self.config.eggs_per_level;
        if let Some(flock) = self.flock.as_mut() {
            flock.spawn(eggs, out);
        }
    }

    /// Scene state machine entry point.
    ///
    /// Returns false when nothing changed (same scene, or refused by a strict
    /// policy). Leaving `Playing` discards the flock; entering it starts a new game.
    pub fn set_scene(&mut self, to: Scene, out: &mut Vec<GameEvent>) -> bool {
        let from = self.scene;
        if from == to {
            return false;
        }
        if !from.can_transition(to) {
            match self.config.transition_policy {
                TransitionPolicy::Permissive => {
                    log::warn!("Unlisted scene transition {} -> {}", from.as_str(), to.as_str());
                }
                TransitionPolicy::Strict => {
                    log::warn!("Refused scene transition {} -> {}", from.as_str(), to.as_str());
                    return false;
                }
            }
        }

        if let Some(flock) = self.flock.take() {
            log::debug!("Discarding flock {} ({} live eggs)", flock.generation(), flock.len());
            out.push(GameEvent::FlockDiscarded {
                generation: flock.generation(),
            });
        }

        log::info!("Scene {} -> {}", from.as_str(), to.as_str());
        self.scene = to;
        out.push(GameEvent::SceneChanged { from, to });

        if to == Scene::Playing {
            self.start_game(out);
        }
        true
    }

    fn start_game(&mut self, out: &mut Vec<GameEvent>) {
        self.reset_game_data(out);
        let generation = self.next_generation;
        self.next_generation += 1;
        let mut flock = EggFlock::new(generation, self.config.egg_stages);
        flock.spawn(self.config.eggs_per_level, out);
        self.flock = Some(flock);
    }

    /// Tap on an egg; void if the egg belongs to an abandoned game
    pub fn tap_egg(&mut self, key: EggKey, out: &mut Vec<GameEvent>) -> bool {
        let handled = self.flock.as_mut().is_some_and(|f| f.tap(key, out));
        if !handled {
            log::debug!("Ignoring tap on stale egg {:?}", key);
        }
        handled
    }

    /// Fall animation finished; void if the egg is already gone
    pub fn egg_reached_ground(&mut self, key: EggKey, out: &mut Vec<GameEvent>) -> bool {
        let handled = self.flock.as_mut().is_some_and(|f| f.ground_reached(key, out));
        if !handled {
            log::debug!("Ignoring ground callback for stale egg {:?}", key);
        }
        handled
    }
}
