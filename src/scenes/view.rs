//! What each scene shows
//!
//! Plain data handed to the display layer. Views are built from read-only
//! state; they never hold on to it.

use serde::Serialize;

use crate::highscores::HighscoreEntry;
use crate::sim::{GameState, Scene};

/// Congratulation shown on game over, indexed by level reached
pub const CONGRATS: [&str; 10] = [
    "Not bad",
    "Good",
    "Great",
    "Fantastic",
    "Smashing!",
    "Amazing!",
    "Flying High",
    "Ridiculous!",
    "Extraordinary!",
    "Monstrous!!",
];

pub fn congrats_for_level(level: u32) -> &'static str {
    let index = (level.max(1) as usize - 1).min(CONGRATS.len() - 1);
    CONGRATS[index]
}

/// Clickable element of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Play,
    Highscores,
    Credits,
    Back,
    Menu,
    Replay,
    Submit,
}

/// What pressing a button asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Goto(Scene),
    SubmitHighscore,
}

impl Button {
    pub fn action(self) -> ButtonAction {
        match self {
            Button::Play | Button::Replay => ButtonAction::Goto(Scene::Playing),
            Button::Highscores => ButtonAction::Goto(Scene::Highscore),
            Button::Credits => ButtonAction::Goto(Scene::Credits),
            Button::Back | Button::Menu => ButtonAction::Goto(Scene::Menu),
            Button::Submit => ButtonAction::SubmitHighscore,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "play" => Some(Button::Play),
            "highscores" | "highscore" => Some(Button::Highscores),
            "credits" => Some(Button::Credits),
            "back" => Some(Button::Back),
            "menu" => Some(Button::Menu),
            "replay" => Some(Button::Replay),
            "submit" => Some(Button::Submit),
            _ => None,
        }
    }
}

/// Buttons offered by a scene
pub fn buttons_for(scene: Scene) -> &'static [Button] {
    match scene {
        Scene::Menu => &[Button::Play, Button::Highscores, Button::Credits],
        Scene::Playing => &[Button::Back],
        Scene::GameOver => &[Button::Menu, Button::Replay, Button::Submit],
        Scene::Highscore | Scene::Credits => &[Button::Back],
    }
}

/// In-game heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score(),
            lives: state.lives(),
            level: state.level(),
        }
    }
}

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    /// 1-indexed
    pub rank: usize,
    pub player: String,
    pub score: u32,
}

pub fn score_rows(entries: &[HighscoreEntry]) -> Vec<ScoreRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ScoreRow {
            rank: i + 1,
            player: entry.player.label().to_string(),
            score: entry.score,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scene", rename_all = "snake_case")]
pub enum SceneView {
    Menu {
        buttons: &'static [Button],
    },
    Playing {
        hud: Hud,
        buttons: &'static [Button],
    },
    GameOver {
        score: u32,
        congrats: &'static str,
        buttons: &'static [Button],
    },
    Highscore {
        /// None while the query is running
        scores: Option<Vec<ScoreRow>>,
        buttons: &'static [Button],
    },
    Credits {
        buttons: &'static [Button],
    },
}

impl SceneView {
    /// Initial view for entering `scene`
    pub fn build(scene: Scene, state: &GameState) -> Self {
        let buttons = buttons_for(scene);
        match scene {
            Scene::Menu => SceneView::Menu { buttons },
            Scene::Playing => SceneView::Playing {
                hud: Hud::from_state(state),
                buttons,
            },
            Scene::GameOver => SceneView::GameOver {
                score: state.score(),
                congrats: congrats_for_level(state.level()),
                buttons,
            },
            Scene::Highscore => SceneView::Highscore {
                scores: None,
                buttons,
            },
            Scene::Credits => SceneView::Credits { buttons },
        }
    }

    pub fn scene(&self) -> Scene {
        match self {
            SceneView::Menu { .. } => Scene::Menu,
            SceneView::Playing { .. } => Scene::Playing,
            SceneView::GameOver { .. } => Scene::GameOver,
            SceneView::Highscore { .. } => Scene::Highscore,
            SceneView::Credits { .. } => Scene::Credits,
        }
    }
}
