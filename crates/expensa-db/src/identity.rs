//! Current-actor resolution.

use async_trait::async_trait;
use expensa_core::identity::Actor;

use crate::error::IdentityError;

/// Supplies the acting user's identity, or fails when no session is active.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn current_actor(&self) -> Result<Actor, IdentityError>;
}

/// Resolver over a fixed session, e.g. the `[actor]` config section.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<Actor>);

impl StaticIdentity {
    #[must_use]
    pub const fn new(actor: Actor) -> Self {
        Self(Some(actor))
    }

    /// A resolver with no active session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn current_actor(&self) -> Result<Actor, IdentityError> {
        self.0.clone().ok_or(IdentityError::NoSession)
    }
}
