//! Scene lifecycle
//!
//! One `SceneController` per scene watches scene changes and drives its own
//! entry (build view, attach) and exit (teardown, wait for the display to
//! report the scene fully removed). The `Director` fans game events out to the
//! controllers and collects the resulting display commands.

pub mod submit;
pub mod view;

use serde::Serialize;

use crate::codec::ScoreToken;
use crate::highscores::{HighscoreEntry, HighscoreError, HighscoreService};
use crate::identity::IdentityProvider;
use crate::settings::GameConfig;
use crate::sim::{EggKey, EggLaunch, GameEvent, GameState, LaunchPlanner, Scene};

pub use submit::{SubmissionFlow, SubmissionId, SubmissionStatus, SubmitError};
pub use view::{Button, ButtonAction, Hud, SceneView, ScoreRow, buttons_for};

/// Requests for the display/animation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DisplayCommand {
    AttachScene { view: SceneView },
    /// Start the exit animation; answer with `scene_removed` when done
    TeardownScene { scene: Scene },
    UpdateHud { hud: Hud },
    ShowLevelLabel { level: u32 },
    /// Start an egg falling; answer with `ground_reached` when it lands
    SpawnEgg { egg: EggKey, launch: EggLaunch },
    ShowEggStage { egg: EggKey, stage: u8 },
    FlyEgg { egg: EggKey },
    BreakEgg { egg: EggKey },
    /// Drop every egg view of the playing scene
    ClearEggs,
    SetButtonEnabled { scene: Scene, button: Button, enabled: bool },
    ShowScores { rows: Vec<ScoreRow> },
    ShowScoresError { message: String },
    ShowSubmission { status: SubmissionStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Hidden,
    Active,
    /// Teardown requested, display not done yet
    Exiting,
}

/// Show/hide lifecycle of one scene
#[derive(Debug, Clone)]
pub struct SceneController {
    scene: Scene,
    lifecycle: Lifecycle,
    /// Buttons pressed since the last entry
    disabled: Vec<Button>,
}

impl SceneController {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            lifecycle: Lifecycle::Hidden,
            disabled: Vec::new(),
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// React to `from -> to`. Returns true if this scene entered or exited.
    pub fn on_scene_changed(
        &mut self,
        from: Scene,
        to: Scene,
        state: &GameState,
        out: &mut Vec<DisplayCommand>,
    ) -> bool {
        if from == to {
            return false;
        }
        if from == self.scene {
            self.exit(out);
            true
        } else if to == self.scene {
            self.enter(state, out);
            true
        } else {
            false
        }
    }

    /// Build the view and attach it
    pub fn enter(&mut self, state: &GameState, out: &mut Vec<DisplayCommand>) {
        self.lifecycle = Lifecycle::Active;
        self.disabled.clear();
        out.push(DisplayCommand::AttachScene {
            view: SceneView::build(self.scene, state),
        });
    }

    fn exit(&mut self, out: &mut Vec<DisplayCommand>) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.lifecycle = Lifecycle::Exiting;
        if self.scene == Scene::Playing {
            out.push(DisplayCommand::ClearEggs);
        }
        out.push(DisplayCommand::TeardownScene { scene: self.scene });
    }

    /// Display finished the exit animation. Ignored unless exiting, since the
    /// scene may have been re-entered while its old view was still going away.
    pub fn on_removed(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Exiting {
            return false;
        }
        self.lifecycle = Lifecycle::Hidden;
        true
    }

    /// Press `button` once; it stays disabled until re-enabled or re-entry
    pub fn press(&mut self, button: Button, out: &mut Vec<DisplayCommand>) -> Option<ButtonAction> {
        if !self.is_active()
            || !buttons_for(self.scene).contains(&button)
            || self.disabled.contains(&button)
        {
            return None;
        }
        self.disabled.push(button);
        out.push(DisplayCommand::SetButtonEnabled {
            scene: self.scene,
            button,
            enabled: false,
        });
        Some(button.action())
    }

    pub fn enable(&mut self, button: Button, out: &mut Vec<DisplayCommand>) {
        let before = self.disabled.len();
        self.disabled.retain(|b| *b != button);
        if self.disabled.len() != before {
            out.push(DisplayCommand::SetButtonEnabled {
                scene: self.scene,
                button,
                enabled: true,
            });
        }
    }
}

/// Position of a scene's controller, matching `Scene::ALL`
fn slot(scene: Scene) -> usize {
    match scene {
        Scene::Menu => 0,
        Scene::Playing => 1,
        Scene::GameOver => 2,
        Scene::Highscore => 3,
        Scene::Credits => 4,
    }
}

/// Routes game events to the scene controllers
#[derive(Debug, Clone)]
pub struct Director {
    /// Registration order is notification order
    controllers: Vec<SceneController>,
    planner: LaunchPlanner,
    submission: SubmissionFlow,
    commands: Vec<DisplayCommand>,
}

impl Director {
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            controllers: Scene::ALL.into_iter().map(SceneController::new).collect(),
            planner: LaunchPlanner::new(seed, config),
            submission: SubmissionFlow::new(),
            commands: Vec::new(),
        }
    }

    pub fn controller(&self, scene: Scene) -> &SceneController {
        &self.controllers[slot(scene)]
    }

    fn controller_mut(&mut self, scene: Scene) -> &mut SceneController {
        &mut self.controllers[slot(scene)]
    }

    /// Scenes currently entered and not exiting
    pub fn active_scenes(&self) -> Vec<Scene> {
        self.controllers
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.scene)
            .collect()
    }

    pub fn submission(&self) -> &SubmissionFlow {
        &self.submission
    }

    /// Display commands produced since the last call
    pub fn take_commands(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Enter the session's initial scene
    pub fn start(&mut self, state: &GameState) {
        let scene = state.scene();
        let mut out = Vec::new();
        self.controller_mut(scene).enter(state, &mut out);
        self.commands.extend(out);
    }

    fn playing(&self) -> bool {
        self.controller(Scene::Playing).is_active()
    }

    pub fn observe(&mut self, event: &GameEvent, state: &GameState) {
        match event {
            GameEvent::SceneChanged { from, to } => {
                if *to == Scene::GameOver {
                    self.submission.reset();
                }
                let mut out = Vec::new();
                for controller in self.controllers.iter_mut() {
                    controller.on_scene_changed(*from, *to, state, &mut out);
                }
                self.commands.extend(out);
            }
            GameEvent::EggsSpawned { eggs } if self.playing() => {
                self.commands.push(DisplayCommand::ShowLevelLabel {
                    level: state.level(),
                });
                for spawned in eggs {
                    let launch = self.planner.plan(spawned.index, state.speed_multiplier());
                    self.commands.push(DisplayCommand::SpawnEgg {
                        egg: spawned.key,
                        launch,
                    });
                }
            }
            GameEvent::EggAdvanced { egg, stage } if self.playing() => {
                self.commands.push(DisplayCommand::ShowEggStage {
                    egg: *egg,
                    stage: *stage,
                });
            }
            GameEvent::EggFlew { egg } if self.playing() => {
                self.commands.push(DisplayCommand::FlyEgg { egg: *egg });
            }
            GameEvent::EggBroke { egg } if self.playing() => {
                self.commands.push(DisplayCommand::BreakEgg { egg: *egg });
            }
            GameEvent::ScoreChanged { .. }
            | GameEvent::LivesChanged { .. }
            | GameEvent::LevelChanged { .. }
                if self.playing() =>
            {
                self.commands.push(DisplayCommand::UpdateHud {
                    hud: Hud::from_state(state),
                });
            }
            _ => {}
        }
    }

    /// Display reports `scene` fully removed
    pub fn scene_removed(&mut self, scene: Scene) -> bool {
        let removed = self.controller_mut(scene).on_removed();
        if !removed {
            log::debug!("Ignoring stale removal of scene {}", scene.as_str());
        }
        removed
    }

    /// Press a button on whichever scene is active
    pub fn press(&mut self, button: Button) -> Option<ButtonAction> {
        if button == Button::Submit && !self.submission.can_submit() {
            return None;
        }
        let mut out = Vec::new();
        let action = self
            .controllers
            .iter_mut()
            .filter(|c| c.is_active())
            .find_map(|c| c.press(button, &mut out));
        self.commands.extend(out);
        action
    }

    /// Result of the leaderboard query started on entering the highscore scene
    pub fn scores_loaded(&mut self, result: Result<Vec<HighscoreEntry>, HighscoreError>) {
        if !self.controller(Scene::Highscore).is_active() {
            log::debug!("Highscores arrived after leaving the scene");
            return;
        }
        match result {
            Ok(entries) => self.commands.push(DisplayCommand::ShowScores {
                rows: view::score_rows(&entries),
            }),
            Err(e) => {
                log::warn!("Could not load highscores: {}", e);
                self.commands.push(DisplayCommand::ShowScoresError {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Start a submission whose transport is handled elsewhere
    pub fn begin_submission(&mut self) -> Option<SubmissionId> {
        let id = self.submission.begin()?;
        self.push_submission_status();
        Some(id)
    }

    /// Outcome of submission `id`. Ignored once a newer game-over screen was
    /// entered or the result was already recorded.
    pub fn finish_submission(&mut self, id: SubmissionId, result: &Result<(), SubmitError>) {
        if !self.submission.finish(id, result) {
            return;
        }
        self.push_submission_status();
        if self.submission.can_submit() {
            let mut out = Vec::new();
            self.controller_mut(Scene::GameOver)
                .enable(Button::Submit, &mut out);
            self.commands.extend(out);
        }
    }

    /// Submit `token` through the given collaborators
    pub fn submit<I, H>(
        &mut self,
        token: &ScoreToken,
        identity: &mut I,
        service: &mut H,
    ) -> Result<(), SubmitError>
    where
        I: IdentityProvider + ?Sized,
        H: HighscoreService + ?Sized,
    {
        let Some(id) = self.begin_submission() else {
            return Err(SubmitError::Unavailable);
        };
        let result = SubmissionFlow::deliver(token, identity, service);
        self.finish_submission(id, &result);
        result
    }

    fn push_submission_status(&mut self) {
        self.commands.push(DisplayCommand::ShowSubmission {
            status: self.submission.status().clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_state() -> GameState {
        GameState::new(GameConfig::default())
    }

    #[test]
    fn test_enter_and_exit() {
        let state = menu_state();
        let mut controller = SceneController::new(Scene::Credits);
        let mut out = Vec::new();

        assert!(controller.on_scene_changed(Scene::Menu, Scene::Credits, &state, &mut out));
        assert!(controller.is_active());
        assert!(matches!(&out[0], DisplayCommand::AttachScene { view } if view.scene() == Scene::Credits));

        out.clear();
        assert!(controller.on_scene_changed(Scene::Credits, Scene::Menu, &state, &mut out));
        assert_eq!(controller.lifecycle(), Lifecycle::Exiting);
        assert_eq!(out, vec![DisplayCommand::TeardownScene { scene: Scene::Credits }]);

        assert!(controller.on_removed());
        assert_eq!(controller.lifecycle(), Lifecycle::Hidden);
        assert!(!controller.on_removed());
    }

    #[test]
    fn test_unrelated_change_ignored() {
        let state = menu_state();
        let mut controller = SceneController::new(Scene::Credits);
        let mut out = Vec::new();
        assert!(!controller.on_scene_changed(Scene::Menu, Scene::Highscore, &state, &mut out));
        assert!(!controller.on_scene_changed(Scene::Credits, Scene::Credits, &state, &mut out));
        assert!(out.is_empty());
        assert_eq!(controller.lifecycle(), Lifecycle::Hidden);
    }

    #[test]
    fn test_reentry_before_removal() {
        let state = menu_state();
        let mut controller = SceneController::new(Scene::Menu);
        let mut out = Vec::new();
        controller.enter(&state, &mut out);
        controller.on_scene_changed(Scene::Menu, Scene::Credits, &state, &mut out);
        controller.on_scene_changed(Scene::Credits, Scene::Menu, &state, &mut out);

        // Removal of the old view arrives late
        assert!(!controller.on_removed());
        assert!(controller.is_active());
    }

    #[test]
    fn test_button_pressed_once() {
        let state = menu_state();
        let mut controller = SceneController::new(Scene::Menu);
        let mut out = Vec::new();

        assert_eq!(controller.press(Button::Play, &mut out), None);
        controller.enter(&state, &mut out);
        assert_eq!(
            controller.press(Button::Play, &mut out),
            Some(ButtonAction::Goto(Scene::Playing))
        );
        assert_eq!(controller.press(Button::Play, &mut out), None);
        assert_eq!(controller.press(Button::Replay, &mut out), None);

        controller.enter(&state, &mut out);
        assert!(controller.press(Button::Play, &mut out).is_some());
    }

    #[test]
    fn test_playing_exit_clears_eggs() {
        let state = menu_state();
        let mut controller = SceneController::new(Scene::Playing);
        let mut out = Vec::new();
        controller.enter(&state, &mut out);
        out.clear();
        controller.on_scene_changed(Scene::Playing, Scene::GameOver, &state, &mut out);
        assert_eq!(
            out,
            vec![
                DisplayCommand::ClearEggs,
                DisplayCommand::TeardownScene { scene: Scene::Playing }
            ]
        );
    }

    #[test]
    fn test_director_overlapping_transition() {
        let mut state = menu_state();
        let mut director = Director::new(1, state.config());
        director.start(&state);
        assert_eq!(director.active_scenes(), vec![Scene::Menu]);

        let mut events = Vec::new();
        state.set_scene(Scene::Highscore, &mut events);
        for event in &events {
            director.observe(event, &state);
        }

        // Menu still animating out while highscore is up
        assert_eq!(director.controller(Scene::Menu).lifecycle(), Lifecycle::Exiting);
        assert_eq!(director.active_scenes(), vec![Scene::Highscore]);
        assert!(director.scene_removed(Scene::Menu));
        assert!(!director.scene_removed(Scene::Menu));

        director.take_commands();
        director.scores_loaded(Ok(Vec::new()));
        assert_eq!(
            director.take_commands(),
            vec![DisplayCommand::ShowScores { rows: Vec::new() }]
        );
    }

    #[test]
    fn test_scores_after_leaving_dropped() {
        let state = menu_state();
        let mut director = Director::new(1, state.config());
        director.start(&state);
        director.take_commands();
        director.scores_loaded(Err(HighscoreError::Service("timeout".into())));
        assert!(director.take_commands().is_empty());
    }

    #[test]
    fn test_commands_serialize_tagged() {
        let json = serde_json::to_value(DisplayCommand::ShowLevelLabel { level: 2 }).unwrap();
        assert_eq!(json["command"], "show_level_label");
        assert_eq!(json["level"], 2);
    }
}
