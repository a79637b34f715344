//! Highscore leaderboard
//!
//! The leaderboard lives in a remote service; the client submits score tokens
//! and reads back the top 10. `InMemoryHighscores` applies the same validation
//! rules as the remote validator and backs native builds and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{self, CodecError, ScoreToken};
use crate::consts::{MAX_HIGH_SCORES, MAX_SCORE};
use crate::identity::PlayerIdentity;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub player: PlayerIdentity,
    pub score: u32,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HighscoreError {
    #[error("malformed score token: {0}")]
    Token(#[from] CodecError),
    #[error("score {score} is out of range")]
    ScoreTooHigh { score: u32 },
    #[error("level {level} does not match score {score}")]
    LevelMismatch { level: u32, score: u32 },
    #[error("highscore service error: {0}")]
    Service(String),
}

impl HighscoreError {
    /// True when the validator refused the token rather than the service failing
    pub fn is_rejection(&self) -> bool {
        !matches!(self, HighscoreError::Service(_))
    }
}

/// Remote highscore collaborator
pub trait HighscoreService {
    /// Validate and store a score for `player`
    fn submit(&mut self, player: &PlayerIdentity, token: &ScoreToken) -> Result<(), HighscoreError>;

    /// Best `limit` entries, highest score first
    fn top_scores(&self, limit: usize) -> Result<Vec<HighscoreEntry>, HighscoreError>;
}

/// Validator rule: decodes the token and checks the score is reachable at the
/// claimed level (10 eggs per level, scores below 1000).
pub fn validate_token(token: &str) -> Result<(u32, u32), HighscoreError> {
    let (level, score) = codec::decode(token)?;
    if score >= MAX_SCORE {
        return Err(HighscoreError::ScoreTooHigh { score });
    }
    if score / 10 + 1 != level {
        return Err(HighscoreError::LevelMismatch { level, score });
    }
    Ok((level, score))
}

/// Leaderboard of validated scores, highest first, at most 10
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InMemoryHighscores {
    pub entries: Vec<HighscoreEntry>,
}

impl InMemoryHighscores {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "egg_flight_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// Sort descending and drop everything below the leaderboard
    fn rank(&mut self) {
        // Stable sort keeps earlier submissions ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Leaderboard kept in LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = crate::settings::local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.map(|json| serde_json::from_str::<InMemoryHighscores>(&json)) {
            Some(Ok(mut scores)) => {
                scores.rank();
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored high scores: {}", e);
                Self::new()
            }
            None => Self::new(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let Some(storage) = crate::settings::local_storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not store high scores");
                }
            }
            Err(e) => log::warn!("Could not serialize high scores: {}", e),
        }
    }

    /// Native builds keep scores for the process only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {}
}

impl HighscoreService for InMemoryHighscores {
    fn submit(&mut self, player: &PlayerIdentity, token: &ScoreToken) -> Result<(), HighscoreError> {
        let (level, score) = validate_token(token.as_str()).inspect_err(|e| {
            log::warn!("Rejected highscore token {}: {}", token, e);
        })?;
        log::info!("Highscore {} (level {}) for {}", score, level, player.label());
        self.entries.push(HighscoreEntry {
            player: player.clone(),
            score,
        });
        self.rank();
        self.save();
        Ok(())
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighscoreEntry>, HighscoreError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    fn player(name: &str) -> PlayerIdentity {
        PlayerIdentity {
            id: name.to_lowercase(),
            display_name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_valid_token_accepted() {
        assert_eq!(validate_token(encode(1, 0).as_str()), Ok((1, 0)));
        assert_eq!(validate_token(encode(3, 25).as_str()), Ok((3, 25)));
        assert_eq!(validate_token(encode(100, 999).as_str()), Ok((100, 999)));
    }

    #[test]
    fn test_level_mismatch_rejected() {
        // floor(999 / 10) + 1 = 100, not 1
        assert_eq!(
            validate_token(encode(1, 999).as_str()),
            Err(HighscoreError::LevelMismatch { level: 1, score: 999 })
        );
    }

    #[test]
    fn test_score_cap() {
        assert_eq!(
            validate_token(encode(101, 1000).as_str()),
            Err(HighscoreError::ScoreTooHigh { score: 1000 })
        );
    }

    #[test]
    fn test_garbage_token() {
        let err = validate_token("hello").unwrap_err();
        assert!(matches!(err, HighscoreError::Token(_)));
        assert!(err.is_rejection());
        assert!(!HighscoreError::Service("down".into()).is_rejection());
    }

    #[test]
    fn test_submit_and_top_scores() {
        let mut board = InMemoryHighscores::new();
        assert!(board.is_empty());

        board.submit(&player("Ada"), &encode(2, 15)).unwrap();
        board.submit(&player("Grace"), &encode(5, 42)).unwrap();
        board.submit(&player("Linus"), &encode(2, 15)).unwrap();
        assert!(board.submit(&player("Mallory"), &encode(1, 999)).is_err());

        let top = board.top_scores(10).unwrap();
        let names: Vec<&str> = top.iter().map(|e| e.player.label()).collect();
        assert_eq!(names, vec!["Grace", "Ada", "Linus"]);
        assert_eq!(board.top_score(), Some(42));
    }

    #[test]
    fn test_top_scores_capped_at_ten() {
        let mut board = InMemoryHighscores::new();
        for score in 0..15u32 {
            board
                .submit(&player("P"), &encode(score / 10 + 1, score))
                .unwrap();
        }
        let top = board.top_scores(50).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 14);
        assert_eq!(top[9].score, 5);
        // Only the leaderboard is kept, not every submission
        assert_eq!(board.entries.len(), 10);
        assert_eq!(board.top_scores(3).unwrap().len(), 3);
    }

    #[test]
    fn test_board_serializes() {
        let mut board = InMemoryHighscores::new();
        board.submit(&player("Ada"), &encode(1, 3)).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: InMemoryHighscores = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, board.entries);
    }
}
