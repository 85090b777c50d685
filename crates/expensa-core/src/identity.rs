use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// The authenticated user performing an operation.
///
/// Produced by an `IdentityResolver` in `expensa-db`, or built directly by
/// callers that already hold a session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Actor fields as handed to the audit log. Any of them may be missing, in
/// which case the audit service resolves the current actor itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActorRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ActorRef {
    /// An actor reference is usable as-is when it carries an id and an email.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.id) && present(&self.email)
    }
}

impl From<&Actor> for ActorRef {
    fn from(actor: &Actor) -> Self {
        Self {
            id: Some(actor.id.clone()),
            name: Some(actor.name.clone()),
            email: Some(actor.email.clone()),
        }
    }
}

/// Mutable requester profile as kept by the identity provider.
///
/// Several fields have a user-customised and a platform-provided variant;
/// snapshot capture prefers the former.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActorProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub org_unit: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}
