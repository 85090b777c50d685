//! Audit log settings.

use serde::{Deserialize, Serialize};

fn default_system_actor_id() -> String {
    "system".to_string()
}

fn default_system_domain() -> String {
    "expensa.local".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Identity substituted when no actor can be resolved.
    #[serde(default = "default_system_actor_id")]
    pub system_actor_id: String,

    #[serde(default = "default_system_domain")]
    pub system_domain: String,

    /// Client host stamped on every audit entry.
    #[serde(default)]
    pub client_host: Option<String>,

    /// User agent stamped on every audit entry.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            system_actor_id: default_system_actor_id(),
            system_domain: default_system_domain(),
            client_host: None,
            user_agent: None,
        }
    }
}

impl AuditConfig {
    /// `system@<domain>`.
    #[must_use]
    pub fn system_email(&self) -> String {
        format!("{}@{}", self.system_actor_id, self.system_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_email_uses_domain() {
        assert_eq!(AuditConfig::default().system_email(), "system@expensa.local");
    }
}
