//! Player identity
//!
//! Highscores are attributed to a logged-in player. The first login of a new
//! player also pulls their display name from the social graph and stores it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: String,
    pub display_name: Option<String>,
}

impl PlayerIdentity {
    /// Name shown on the leaderboard
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous")
    }
}

/// Result of a social login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub player: PlayerIdentity,
    /// False for a player logging in for the first time
    pub existed: bool,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdentityError {
    #[error("login failed: {0}")]
    Login(String),
    #[error("social graph request failed: {0}")]
    SocialGraph(String),
    #[error("could not save player: {0}")]
    Save(String),
}

/// Social login collaborator
pub trait IdentityProvider {
    /// Player already logged in on this device
    fn current(&self) -> Option<PlayerIdentity>;

    fn log_in(&mut self) -> Result<Login, IdentityError>;

    /// Display name from the social graph
    fn fetch_display_name(&mut self) -> Result<String, IdentityError>;

    fn save_player(&mut self, player: &PlayerIdentity) -> Result<(), IdentityError>;
}

/// Logged-in player, logging in (and naming a new player) first if needed
pub fn ensure_identity<P: IdentityProvider + ?Sized>(
    provider: &mut P,
) -> Result<PlayerIdentity, IdentityError> {
    if let Some(player) = provider.current() {
        return Ok(player);
    }

    let Login { mut player, existed } = provider.log_in()?;
    if !existed {
        player.display_name = Some(provider.fetch_display_name()?);
        provider.save_player(&player)?;
        log::info!("New player {} saved as {}", player.id, player.label());
    }
    Ok(player)
}

/// Local provider: a fixed player, logged in on first use
#[derive(Debug, Clone)]
pub struct LocalIdentity {
    player: PlayerIdentity,
    logged_in: bool,
    known: bool,
}

impl LocalIdentity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            player: PlayerIdentity {
                id: id.into(),
                display_name: Some(display_name.into()),
            },
            logged_in: false,
            known: false,
        }
    }
}

impl IdentityProvider for LocalIdentity {
    fn current(&self) -> Option<PlayerIdentity> {
        self.logged_in.then(|| self.player.clone())
    }

    fn log_in(&mut self) -> Result<Login, IdentityError> {
        self.logged_in = true;
        Ok(Login {
            player: PlayerIdentity {
                id: self.player.id.clone(),
                display_name: None,
            },
            existed: self.known,
        })
    }

    fn fetch_display_name(&mut self) -> Result<String, IdentityError> {
        self.player
            .display_name
            .clone()
            .ok_or_else(|| IdentityError::SocialGraph("no display name".to_string()))
    }

    fn save_player(&mut self, player: &PlayerIdentity) -> Result<(), IdentityError> {
        self.player = player.clone();
        self.known = true;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Scripted provider for failure paths
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedIdentity {
        pub current: Option<PlayerIdentity>,
        pub login: Option<Result<Login, IdentityError>>,
        pub name: Option<Result<String, IdentityError>>,
        pub saved: Vec<PlayerIdentity>,
        pub logins: usize,
    }

    impl IdentityProvider for ScriptedIdentity {
        fn current(&self) -> Option<PlayerIdentity> {
            self.current.clone()
        }

        fn log_in(&mut self) -> Result<Login, IdentityError> {
            self.logins += 1;
            self.login
                .clone()
                .unwrap_or_else(|| Err(IdentityError::Login("no script".to_string())))
        }

        fn fetch_display_name(&mut self) -> Result<String, IdentityError> {
            self.name
                .clone()
                .unwrap_or_else(|| Err(IdentityError::SocialGraph("no script".to_string())))
        }

        fn save_player(&mut self, player: &PlayerIdentity) -> Result<(), IdentityError> {
            self.saved.push(player.clone());
            Ok(())
        }
    }

    fn player(id: &str, name: Option<&str>) -> PlayerIdentity {
        PlayerIdentity {
            id: id.to_string(),
            display_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_current_player_skips_login() {
        let mut provider = ScriptedIdentity {
            current: Some(player("p1", Some("Ada"))),
            ..Default::default()
        };
        assert_eq!(ensure_identity(&mut provider).unwrap().id, "p1");
        assert_eq!(provider.logins, 0);
    }

    #[test]
    fn test_new_player_gets_named() {
        let mut provider = ScriptedIdentity {
            login: Some(Ok(Login {
                player: player("p2", None),
                existed: false,
            })),
            name: Some(Ok("Grace".to_string())),
            ..Default::default()
        };
        let who = ensure_identity(&mut provider).unwrap();
        assert_eq!(who.label(), "Grace");
        assert_eq!(provider.saved, vec![who]);
    }

    #[test]
    fn test_returning_player_not_renamed() {
        let mut provider = ScriptedIdentity {
            login: Some(Ok(Login {
                player: player("p3", Some("Linus")),
                existed: true,
            })),
            ..Default::default()
        };
        assert_eq!(ensure_identity(&mut provider).unwrap().label(), "Linus");
        assert!(provider.saved.is_empty());
    }

    #[test]
    fn test_social_graph_failure_propagates() {
        let mut provider = ScriptedIdentity {
            login: Some(Ok(Login {
                player: player("p4", None),
                existed: false,
            })),
            ..Default::default()
        };
        assert!(matches!(
            ensure_identity(&mut provider),
            Err(IdentityError::SocialGraph(_))
        ));
        assert!(provider.saved.is_empty());
    }

    #[test]
    fn test_local_identity_names_once() {
        let mut local = LocalIdentity::new("local", "Player One");
        assert!(local.current().is_none());
        let who = ensure_identity(&mut local).unwrap();
        assert_eq!(who.label(), "Player One");
        assert_eq!(local.current(), Some(who));
    }
}
