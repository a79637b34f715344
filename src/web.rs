//! Browser bindings
//!
//! JavaScript owns rendering, tweens and the remote services. It forwards
//! input and animation callbacks here and drains display commands as JSON
//! after every call. Without a remote service, scores go to a leaderboard kept
//! in LocalStorage.

use wasm_bindgen::prelude::*;

use crate::highscores::{HighscoreEntry, HighscoreError, InMemoryHighscores};
use crate::identity::{IdentityError, LocalIdentity};
use crate::scenes::{Button, ButtonAction, SubmissionId, SubmitError};
use crate::settings::GameConfig;
use crate::sim::{EggKey, Scene};
use crate::Game;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Egg Flight starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    /// Offline leaderboard
    local_scores: InMemoryHighscores,
}

#[wasm_bindgen]
impl WebGame {
    /// New game on the menu scene, using the stored config if valid
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(GameConfig::load(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.start();
        Ok(WebGame {
            game,
            local_scores: InMemoryHighscores::load(),
        })
    }

    pub fn tap(&mut self, generation: u32, id: u32) {
        self.game.tap(EggKey { generation, id });
    }

    /// Egg sprite finished its fall
    pub fn ground_reached(&mut self, generation: u32, id: u32) {
        self.game.ground_reached(EggKey { generation, id });
    }

    /// Exit animation of `scene` finished
    pub fn scene_removed(&mut self, scene: &str) -> bool {
        match Scene::from_str(scene) {
            Some(scene) => self.game.scene_removed(scene),
            None => {
                log::warn!("Unknown scene {:?}", scene);
                false
            }
        }
    }

    /// Press a button. Returns "goto", "submit" or undefined if ignored.
    pub fn press(&mut self, button: &str) -> Option<String> {
        let Some(button) = Button::from_str(button) else {
            log::warn!("Unknown button {:?}", button);
            return None;
        };
        let action = match self.game.press(button)? {
            ButtonAction::Goto(_) => "goto",
            ButtonAction::SubmitHighscore => "submit",
        };
        Some(action.to_string())
    }

    /// Start a submission. Returns its id, or undefined if none may start;
    /// send `score_token()` to the highscore service.
    pub fn begin_submission(&mut self) -> Option<u32> {
        self.game.begin_submission().map(|(id, _)| id.0)
    }

    pub fn score_token(&self) -> String {
        self.game.session().score_token().into()
    }

    /// Outcome of submission `id`. `login_failed` marks an identity failure,
    /// which returns the game-over scene to its idle state.
    pub fn finish_submission(&mut self, id: u32, ok: bool, login_failed: bool, message: String) {
        let result = if ok {
            Ok(())
        } else if login_failed {
            Err(SubmitError::Identity(IdentityError::Login(message)))
        } else {
            Err(SubmitError::Rejected(HighscoreError::Service(message)))
        };
        self.game.finish_submission(SubmissionId(id), &result);
    }

    /// Submit the score to the LocalStorage leaderboard under `player_name`
    pub fn submit_local(&mut self, player_name: String) -> bool {
        let mut identity = LocalIdentity::new("local", player_name);
        match self.game.submit_highscore(&mut identity, &mut self.local_scores) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Local highscore not saved: {}", e);
                false
            }
        }
    }

    /// Show the LocalStorage leaderboard on the highscore scene
    pub fn load_local_scores(&mut self) {
        self.game.load_highscores(&self.local_scores);
    }

    /// Leaderboard query answered with a JSON array of entries
    pub fn scores_loaded(&mut self, json: &str) {
        let result = serde_json::from_str::<Vec<HighscoreEntry>>(json)
            .map_err(|e| HighscoreError::Service(e.to_string()));
        self.game.scores_loaded(result);
    }

    pub fn scores_failed(&mut self, message: String) {
        self.game.scores_loaded(Err(HighscoreError::Service(message)));
    }

    /// Pending display commands as a JSON array
    pub fn take_commands(&mut self) -> String {
        let commands = self.game.take_commands();
        serde_json::to_string(&commands).unwrap_or_else(|e| {
            log::error!("Failed to serialize display commands: {}", e);
            "[]".to_string()
        })
    }

    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_else(|e| {
            log::error!("Failed to serialize snapshot: {}", e);
            "{}".to_string()
        })
    }
}
