//! One game session: state, signal queue and observers
//!
//! Inputs are processed to completion before returning. Signals raised while
//! handling an input are queued and dispatched one by one, each handler
//! running fully before the next signal is looked at.

use super::egg::EggKey;
use super::signal::{SignalQueue, Subscribers, SubscriptionId};
use super::state::{GameEvent, GameSnapshot, GameState, Scene};
use crate::codec::{self, ScoreToken};
use crate::settings::{ConfigError, GameConfig};

#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    queue: SignalQueue<GameEvent>,
    observers: Subscribers<GameEvent>,
}

impl GameSession {
    /// Rejects configs that could not run, such as empty levels, which would
    /// complete and respawn without end.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(config),
            queue: SignalQueue::new(),
            observers: Subscribers::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Observe every event, in registration order
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn tap(&mut self, key: EggKey) -> Vec<GameEvent> {
        let mut raised = Vec::new();
        self.state.tap_egg(key, &mut raised);
        self.dispatch(raised)
    }

    pub fn ground_reached(&mut self, key: EggKey) -> Vec<GameEvent> {
        let mut raised = Vec::new();
        self.state.egg_reached_ground(key, &mut raised);
        self.dispatch(raised)
    }

    pub fn request_scene(&mut self, scene: Scene) -> Vec<GameEvent> {
        let mut raised = Vec::new();
        self.state.set_scene(scene, &mut raised);
        self.dispatch(raised)
    }

    /// Token for submitting the current level and score
    pub fn score_token(&self) -> ScoreToken {
        codec::encode(self.state.level(), self.state.score())
    }

    /// Deliver `raised` and everything it triggers. Returns the events in
    /// delivery order.
    fn dispatch(&mut self, raised: Vec<GameEvent>) -> Vec<GameEvent> {
        // Inputs never arrive while a previous one is still dispatching
        debug_assert!(self.queue.is_empty());
        self.queue.extend(raised);
        let mut delivered = Vec::new();
        let mut follow_ups = Vec::new();

        while let Some(event) = self.queue.pop() {
            self.route(&event, &mut follow_ups);
            self.observers.emit(&event);
            delivered.push(event);
            self.queue.extend(follow_ups.drain(..));
        }
        delivered
    }

    /// Flock signals feeding the state handlers
    fn route(&mut self, event: &GameEvent, out: &mut Vec<GameEvent>) {
        match event {
            GameEvent::ScoreGained => self.state.handle_score(out),
            GameEvent::LifeLost => self.state.handle_life_loss(out),
            GameEvent::LevelComplete { generation } => {
                if self.state.flock_generation() == Some(*generation) {
                    self.state.handle_level_complete(out);
                } else {
                    log::debug!("Dropping level-complete from discarded flock {}", generation);
                }
            }
            _ => {}
        }
    }
}
