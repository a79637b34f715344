//! Score token obfuscation
//!
//! The highscore validator expects `((level * 362) << 5) + "." + ((score * 672) << 4)`
//! computed in 32-bit signed integers. This only deters casual tampering: anyone
//! reading the client can forge a token. It is NOT integrity protection, and
//! changing it breaks the validator's wire format.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LEVEL_SCALE: i32 = 362;
pub const LEVEL_SHIFT: u32 = 5;
pub const SCORE_SCALE: i32 = 672;
pub const SCORE_SHIFT: u32 = 4;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    #[error("token has no '.' separator")]
    MissingSeparator,
    #[error("token part {0:?} is not an integer")]
    NotAnInteger(String),
    #[error("token part {0} does not decode to a whole non-negative value")]
    NotEncoded(i32),
}

/// Opaque level/score submission token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreToken(String);

impl ScoreToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScoreToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ScoreToken> for String {
    fn from(token: ScoreToken) -> Self {
        token.0
    }
}

#[inline]
fn scramble(value: u32, scale: i32, shift: u32) -> i32 {
    (value as i32).wrapping_mul(scale).wrapping_shl(shift)
}

#[inline]
fn unscramble(part: &str, scale: i32, shift: u32) -> Result<u32, CodecError> {
    let raw: i32 = part
        .trim()
        .parse()
        .map_err(|_| CodecError::NotAnInteger(part.to_string()))?;
    let shifted = raw >> shift;
    if shifted < 0 || shifted % scale != 0 {
        return Err(CodecError::NotEncoded(raw));
    }
    Ok((shifted / scale) as u32)
}

/// Pack level and score into a submission token
pub fn encode(level: u32, score: u32) -> ScoreToken {
    ScoreToken(format!(
        "{}.{}",
        scramble(level, LEVEL_SCALE, LEVEL_SHIFT),
        scramble(score, SCORE_SCALE, SCORE_SHIFT)
    ))
}

/// Recover `(level, score)` from a token (validator side)
pub fn decode(token: &str) -> Result<(u32, u32), CodecError> {
    let (level, score) = token.split_once('.').ok_or(CodecError::MissingSeparator)?;
    Ok((
        unscramble(level, LEVEL_SCALE, LEVEL_SHIFT)?,
        unscramble(score, SCORE_SCALE, SCORE_SHIFT)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_values() {
        // (1 * 362) << 5 = 11584, (10 * 672) << 4 = 107520
        assert_eq!(encode(1, 10).as_str(), "11584.107520");
        assert_eq!(encode(1, 0).as_str(), "11584.0");
        assert_eq!(encode(100, 999).as_str(), "1158400.10741248");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode("11584"), Err(CodecError::MissingSeparator));
        assert!(matches!(decode("abc.0"), Err(CodecError::NotAnInteger(_))));
        // 11585 >> 5 = 362 still decodes (low bits are discarded), 11616 >> 5 = 363 does not
        assert_eq!(decode("11585.0"), Ok((1, 0)));
        assert_eq!(decode("11616.0"), Err(CodecError::NotEncoded(11616)));
        assert_eq!(decode("-11584.0"), Err(CodecError::NotEncoded(-11584)));
    }

    proptest! {
        #[test]
        fn test_round_trip(level in 1u32..=100, score in 0u32..=999) {
            let token = encode(level, score);
            prop_assert_eq!(decode(token.as_str()), Ok((level, score)));
        }
    }
}
