//! Identity of the local session user.

use expensa_core::enums::Role;
use expensa_core::identity::Actor;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActorConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Role claim; unknown claims fold into `requester`.
    #[serde(default)]
    pub role: String,
}

impl ActorConfig {
    /// An actor is configured when it has an id and an email.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.id.is_empty() && !self.email.is_empty()
    }

    /// Build the session actor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when id or email is missing.
    pub fn to_actor(&self) -> Result<Actor, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "actor".into(),
            });
        }
        let name = if self.name.is_empty() {
            self.email.clone()
        } else {
            self.name.clone()
        };
        Ok(Actor::new(
            self.id.clone(),
            name,
            self.email.clone(),
            Role::from_claim(&self.role),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_by_default() {
        assert!(!ActorConfig::default().is_configured());
        assert!(ActorConfig::default().to_actor().is_err());
    }

    #[test]
    fn name_falls_back_to_email() {
        let cfg = ActorConfig {
            id: "usr-1".into(),
            name: String::new(),
            email: "ana@example.gov".into(),
            role: "admin".into(),
        };
        let actor = cfg.to_actor().unwrap();
        assert_eq!(actor.name, "ana@example.gov");
        assert_eq!(actor.role, Role::Admin);
    }
}
