//! Highscore submission from the game-over scene
//!
//! `Idle -> Submitting -> Submitted`, or back to a retryable state on failure.
//! A validator rejection shows "Try Again"; a login failure is logged and the
//! button simply comes back.
//!
//! Every attempt gets its own id. Only the result of the attempt in flight is
//! recorded; a new game-over screen abandons it.

use serde::Serialize;
use thiserror::Error;

use crate::codec::ScoreToken;
use crate::highscores::{HighscoreError, HighscoreService};
use crate::identity::{IdentityError, IdentityProvider, ensure_identity};

pub const TRY_AGAIN: &str = "Try Again...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Submitted,
    Failed { message: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    #[error("identity unavailable: {0}")]
    Identity(#[from] IdentityError),
    #[error("highscore not accepted: {0}")]
    Rejected(#[from] HighscoreError),
    #[error("no submission possible right now")]
    Unavailable,
}

/// Identifies one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u32);

#[derive(Debug, Clone)]
pub struct SubmissionFlow {
    status: SubmissionStatus,
    /// Attempt awaiting its result
    in_flight: Option<SubmissionId>,
    next_id: u32,
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self {
            status: SubmissionStatus::Idle,
            in_flight: None,
            next_id: 1,
        }
    }
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Fresh game-over screen. Results still in flight become stale.
    pub fn reset(&mut self) {
        self.status = SubmissionStatus::Idle;
        self.in_flight = None;
    }

    /// Whether the submit button should accept presses
    pub fn can_submit(&self) -> bool {
        matches!(
            self.status,
            SubmissionStatus::Idle | SubmissionStatus::Failed { .. }
        )
    }

    /// Mark a submission as in flight. None if one is running or already done.
    pub fn begin(&mut self) -> Option<SubmissionId> {
        if !self.can_submit() {
            return None;
        }
        let id = SubmissionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.status = SubmissionStatus::Submitting;
        self.in_flight = Some(id);
        Some(id)
    }

    /// Record the outcome of the submission `id` started by `begin`. Returns
    /// false, changing nothing, if that submission is no longer in flight.
    pub fn finish(&mut self, id: SubmissionId, result: &Result<(), SubmitError>) -> bool {
        if self.in_flight != Some(id) {
            log::debug!("Dropping result of stale submission {}", id.0);
            return false;
        }
        self.in_flight = None;
        self.status = match result {
            Ok(()) => {
                log::info!("Highscore submitted");
                SubmissionStatus::Submitted
            }
            Err(SubmitError::Identity(e)) => {
                log::warn!("Highscore submission aborted: {}", e);
                SubmissionStatus::Idle
            }
            Err(e) => {
                log::warn!("Highscore submission failed: {}", e);
                SubmissionStatus::Failed {
                    message: TRY_AGAIN.to_string(),
                }
            }
        };
        true
    }

    /// Log in if needed, then submit `token`
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
        let Some(id) = self.begin() else {
            return Err(SubmitError::Unavailable);
        };
        let result = Self::deliver(token, identity, service);
        self.finish(id, &result);
        result
    }

    /// Log in and hand `token` to the service, without touching any flow state
    pub fn deliver<I, H>(
        token: &ScoreToken,
        identity: &mut I,
        service: &mut H,
    ) -> Result<(), SubmitError>
    where
        I: IdentityProvider + ?Sized,
        H: HighscoreService + ?Sized,
    {
        let player = ensure_identity(identity)?;
        service.submit(&player, token)?;
        Ok(())
    }
}
