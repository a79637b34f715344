//! A running game: session state plus scene lifecycle
//!
//! Inputs come from the player (taps, buttons) and the display layer
//! (ground reached, scene removed). Output is a stream of display commands,
//! collected with `take_commands`.

use crate::codec::ScoreToken;
use crate::consts::MAX_HIGH_SCORES;
use crate::highscores::{HighscoreEntry, HighscoreError, HighscoreService};
use crate::identity::IdentityProvider;
use crate::scenes::{Button, ButtonAction, Director, DisplayCommand, SubmissionId, SubmitError};
use crate::settings::{ConfigError, GameConfig};
use crate::sim::{EggKey, GameEvent, GameSession, GameSnapshot, Scene};

#[derive(Debug)]
pub struct Game {
    session: GameSession,
    director: Director,
}

impl Game {
    /// `seed` drives egg launch timing. Fails on a config the session cannot run.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let director = Director::new(seed, &config);
        Ok(Self {
            session: GameSession::new(config)?,
            director,
        })
    }

    /// Show the first scene
    pub fn start(&mut self) {
        log::info!("Starting on {}", self.session.state().scene().as_str());
        self.director.start(self.session.state());
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access for registering observers
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.session.snapshot()
    }

    pub fn take_commands(&mut self) -> Vec<DisplayCommand> {
        self.director.take_commands()
    }

    pub fn tap(&mut self, egg: EggKey) {
        let events = self.session.tap(egg);
        self.publish(&events);
    }

    pub fn ground_reached(&mut self, egg: EggKey) {
        let events = self.session.ground_reached(egg);
        self.publish(&events);
    }

    pub fn scene_removed(&mut self, scene: Scene) -> bool {
        self.director.scene_removed(scene)
    }

    /// Press a button on the active scene. Scene changes are applied here;
    /// `SubmitHighscore` is returned for the caller to run with its collaborators.
    pub fn press(&mut self, button: Button) -> Option<ButtonAction> {
        let action = self.director.press(button)?;
        if let ButtonAction::Goto(scene) = action {
            self.request_scene(scene);
        }
        Some(action)
    }

    pub fn request_scene(&mut self, scene: Scene) {
        let events = self.session.request_scene(scene);
        self.publish(&events);
    }

    /// Query the leaderboard for the highscore scene
    pub fn load_highscores<H: HighscoreService + ?Sized>(&mut self, service: &H) {
        self.scores_loaded(service.top_scores(MAX_HIGH_SCORES));
    }

    /// Submit the final score from the game-over scene
    pub fn submit_highscore<I, H>(&mut self, identity: &mut I, service: &mut H) -> Result<(), SubmitError>
    where
        I: IdentityProvider + ?Sized,
        H: HighscoreService + ?Sized,
    {
        if self.session.state().scene() != Scene::GameOver {
            return Err(SubmitError::Unavailable);
        }
        let token = self.session.score_token();
        self.director.submit(&token, identity, service)
    }

    /// Leaderboard fetched by an external transport
    pub fn scores_loaded(&mut self, result: Result<Vec<HighscoreEntry>, HighscoreError>) {
        self.director.scores_loaded(result);
    }

    /// Start a submission sent by an external transport. Returns the id to
    /// report the outcome with and the token to send, or None if submitting is
    /// not possible right now.
    pub fn begin_submission(&mut self) -> Option<(SubmissionId, ScoreToken)> {
        if self.session.state().scene() != Scene::GameOver {
            return None;
        }
        let id = self.director.begin_submission()?;
        Some((id, self.session.score_token()))
    }

    /// Outcome of submission `id`; stale results are dropped
    pub fn finish_submission(&mut self, id: SubmissionId, result: &Result<(), SubmitError>) {
        self.director.finish_submission(id, result);
    }

    fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            self.director.observe(event, self.session.state());
        }
    }
}
