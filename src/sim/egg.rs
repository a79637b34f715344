//! Per-egg state machine
//!
//! `Pending -> Flew` after enough taps, `Pending -> Broke` on touching the ground.
//! Both outcomes are terminal; once reached the stage is frozen and further
//! input is ignored.

use serde::{Deserialize, Serialize};

/// Identifies an egg across the display boundary.
///
/// `generation` is bumped every time a flock is discarded, so callbacks for eggs
/// of an abandoned game can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EggKey {
    pub generation: u32,
    pub id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EggOutcome {
    Pending,
    Flew,
    Broke,
}

/// Signals raised by a single transition, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggSignal {
    /// Tap registered, sprite moves to `stage`
    Advanced { stage: u8 },
    Flew,
    Broke,
    /// Terminal outcome reached; the egg can be cleaned up
    Settled,
}

/// An egg entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Egg {
    pub id: u32,
    /// Ordinal within its level (drives launch staggering)
    pub index: u32,
    stages: u8,
    stage: u8,
    outcome: EggOutcome,
}

impl Egg {
    pub fn new(id: u32, index: u32, stages: u8) -> Self {
        Self {
            id,
            index,
            stages,
            stage: 0,
            outcome: EggOutcome::Pending,
        }
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn outcome(&self) -> EggOutcome {
        self.outcome
    }

    pub fn is_pending(&self) -> bool {
        self.outcome == EggOutcome::Pending
    }

    /// Register a tap. The final stage sends the egg flying.
    pub fn advance(&mut self, out: &mut Vec<EggSignal>) {
        if !self.is_pending() {
            return;
        }
        self.stage = (self.stage + 1).min(self.stages);
        out.push(EggSignal::Advanced { stage: self.stage });
        if self.stage >= self.stages {
            self.outcome = EggOutcome::Flew;
            out.push(EggSignal::Flew);
            out.push(EggSignal::Settled);
        }
    }

    /// The fall animation finished. Breaks the egg unless it already flew.
    pub fn reach_ground(&mut self, out: &mut Vec<EggSignal>) {
        if !self.is_pending() {
            return;
        }
        self.outcome = EggOutcome::Broke;
        out.push(EggSignal::Broke);
        out.push(EggSignal::Settled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EGG_STAGES;
    use proptest::prelude::*;

    fn count(signals: &[EggSignal], wanted: EggSignal) -> usize {
        signals.iter().filter(|s| **s == wanted).count()
    }

    #[test]
    fn test_flies_after_all_stages() {
        let mut egg = Egg::new(1, 0, EGG_STAGES);
        let mut signals = Vec::new();

        for _ in 0..EGG_STAGES - 1 {
            egg.advance(&mut signals);
        }
        assert!(egg.is_pending());
        assert_eq!(count(&signals, EggSignal::Flew), 0);

        egg.advance(&mut signals);
        assert_eq!(egg.outcome(), EggOutcome::Flew);
        assert_eq!(egg.stage(), EGG_STAGES);
        assert_eq!(
            &signals[signals.len() - 3..],
            &[
                EggSignal::Advanced { stage: EGG_STAGES },
                EggSignal::Flew,
                EggSignal::Settled
            ]
        );
    }

    #[test]
    fn test_ground_after_flying_is_ignored() {
        let mut egg = Egg::new(1, 0, EGG_STAGES);
        let mut signals = Vec::new();
        for _ in 0..EGG_STAGES {
            egg.advance(&mut signals);
        }
        signals.clear();

        egg.reach_ground(&mut signals);
        assert!(signals.is_empty());
        assert_eq!(egg.outcome(), EggOutcome::Flew);
    }

    #[test]
    fn test_broken_egg_freezes_stage() {
        let mut egg = Egg::new(7, 3, EGG_STAGES);
        let mut signals = Vec::new();
        egg.advance(&mut signals);
        egg.reach_ground(&mut signals);
        assert_eq!(egg.outcome(), EggOutcome::Broke);
        assert_eq!(count(&signals, EggSignal::Broke), 1);
        assert_eq!(count(&signals, EggSignal::Settled), 1);

        signals.clear();
        egg.advance(&mut signals);
        egg.reach_ground(&mut signals);
        assert!(signals.is_empty());
        assert_eq!(egg.stage(), 1);
    }

    proptest! {
        #[test]
        fn test_extra_taps_fly_exactly_once(extra in 0usize..20) {
            let mut egg = Egg::new(1, 0, EGG_STAGES);
            let mut signals = Vec::new();
            for _ in 0..EGG_STAGES as usize + extra {
                egg.advance(&mut signals);
            }
            prop_assert_eq!(egg.outcome(), EggOutcome::Flew);
            prop_assert_eq!(count(&signals, EggSignal::Flew), 1);
            prop_assert_eq!(count(&signals, EggSignal::Settled), 1);
            prop_assert_eq!(egg.stage(), EGG_STAGES);
        }
    }
}
