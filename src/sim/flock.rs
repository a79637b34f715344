//! The live eggs of one level
//!
//! Translates per-egg outcomes into scoring signals, removes settled eggs and
//! reports level completion once the set drains.

use serde::Serialize;

use super::egg::{Egg, EggKey, EggSignal};
use super::state::GameEvent;

/// Egg created by a spawn, as announced to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpawnedEgg {
    pub key: EggKey,
    pub index: u32,
}

#[derive(Debug, Clone)]
pub struct EggFlock {
    generation: u32,
    stages: u8,
    /// Live eggs in spawn order. Only shrinks between spawns.
    eggs: Vec<Egg>,
    next_id: u32,
    /// Level-complete already reported for the current spawn
    completed: bool,
}

impl EggFlock {
    /// Empty flock; nothing fires until the first `spawn`
    pub fn new(generation: u32, stages: u8) -> Self {
        Self {
            generation,
            stages,
            eggs: Vec::new(),
            next_id: 1,
            completed: true,
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn eggs(&self) -> &[Egg] {
        &self.eggs
    }

    pub fn len(&self) -> usize {
        self.eggs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eggs.is_empty()
    }

    pub fn key_of(&self, egg: &Egg) -> EggKey {
        EggKey {
            generation: self.generation,
            id: egg.id,
        }
    }

    pub fn get(&self, key: EggKey) -> Option<&Egg> {
        if key.generation != self.generation {
            return None;
        }
        self.eggs.iter().find(|e| e.id == key.id)
    }

    /// Start a level with `level_size` fresh eggs.
    ///
    /// An empty level completes immediately.
    pub fn spawn(&mut self, level_size: usize, out: &mut Vec<GameEvent>) {
        self.eggs.clear();
        self.completed = false;

        for index in 0..level_size {
            let id = self.next_id;
            self.next_id += 1;
            self.eggs.push(Egg::new(id, index as u32, self.stages));
        }

        out.push(GameEvent::EggsSpawned {
            eggs: self
                .eggs
                .iter()
                .map(|egg| SpawnedEgg {
                    key: self.key_of(egg),
                    index: egg.index,
                })
                .collect(),
        });
        self.check_complete(out);
    }

    /// Returns false if `key` is not a live egg of this flock
    pub fn tap(&mut self, key: EggKey, out: &mut Vec<GameEvent>) -> bool {
        self.apply(key, out, Egg::advance)
    }

    /// Returns false if `key` is not a live egg of this flock
    pub fn ground_reached(&mut self, key: EggKey, out: &mut Vec<GameEvent>) -> bool {
        self.apply(key, out, Egg::reach_ground)
    }

    fn apply(
        &mut self,
        key: EggKey,
        out: &mut Vec<GameEvent>,
        action: fn(&mut Egg, &mut Vec<EggSignal>),
    ) -> bool {
        if key.generation != self.generation {
            return false;
        }
        let Some(pos) = self.eggs.iter().position(|e| e.id == key.id) else {
            return false;
        };

        let mut signals = Vec::new();
        action(&mut self.eggs[pos], &mut signals);

        for signal in signals {
            match signal {
                EggSignal::Advanced { stage } => out.push(GameEvent::EggAdvanced { egg: key, stage }),
                EggSignal::Flew => {
                    out.push(GameEvent::EggFlew { egg: key });
                    out.push(GameEvent::ScoreGained);
                }
                EggSignal::Broke => {
                    out.push(GameEvent::EggBroke { egg: key });
                    out.push(GameEvent::LifeLost);
                }
                // Always the last signal of a transition
                EggSignal::Settled => {
                    let egg = self.eggs.remove(pos);
                    out.push(GameEvent::EggSettled {
                        egg: key,
                        outcome: egg.outcome(),
                    });
                }
            }
        }

        self.check_complete(out);
        true
    }

    fn check_complete(&mut self, out: &mut Vec<GameEvent>) {
        if !self.completed && self.eggs.is_empty() {
            self.completed = true;
            out.push(GameEvent::LevelComplete {
                generation: self.generation,
            });
        }
    }
}
