use std::sync::Arc;

use anyhow::Context;
use expensa_config::ExpensaConfig;
use expensa_core::identity::Actor;
use expensa_db::identity::StaticIdentity;
use expensa_db::service::ExpensaService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: ExpensaService,
    pub config: ExpensaConfig,
    /// Session actor from the `actor` config section, if any.
    pub actor: Option<Actor>,
}

impl AppContext {
    /// Open the configured store and upload backend and resolve the
    /// session actor.
    pub async fn init(config: ExpensaConfig) -> anyhow::Result<Self> {
        let actor = if config.actor.is_configured() {
            Some(config.actor.to_actor()?)
        } else {
            tracing::debug!("no session actor configured");
            None
        };

        let identity = actor
            .clone()
            .map_or_else(StaticIdentity::anonymous, StaticIdentity::new);
        let service = ExpensaService::from_config(&config, Arc::new(identity))
            .await
            .context("failed to initialize expensa-db service")?;

        Ok(Self {
            service,
            config,
            actor,
        })
    }

    /// The session actor, required by every mutating command.
    pub fn require_actor(&self) -> anyhow::Result<&Actor> {
        self.actor.as_ref().context(
            "no active session: set actor.id and actor.email \
             (EXPENSA_ACTOR__ID, EXPENSA_ACTOR__EMAIL)",
        )
    }

    /// Result limit: global flag, then configured default.
    pub fn limit(&self, flag: Option<u32>) -> u32 {
        flag.unwrap_or(self.config.general.default_limit)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{actor_config, context};

    #[tokio::test]
    async fn missing_actor_means_no_session() {
        let ctx = context(None).await;
        let err = ctx.require_actor().unwrap_err();
        assert!(err.to_string().contains("no active session"));
    }

    #[tokio::test]
    async fn configured_actor_is_resolved() {
        let ctx = context(Some(actor_config("usr-adm", "admin"))).await;
        let actor = ctx.require_actor().unwrap();
        assert!(actor.is_admin());
        assert_eq!(actor.email, "usr-adm@prefeitura.example.gov");
    }

    #[tokio::test]
    async fn limit_falls_back_to_config() {
        let ctx = context(None).await;
        assert_eq!(ctx.limit(None), 50);
        assert_eq!(ctx.limit(Some(3)), 3);
    }
}
