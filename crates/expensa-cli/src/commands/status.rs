use expensa_core::enums::{EntityType, Role};
use expensa_core::transitions::{Lifecycle, LifecycleStatus};
use expensa_db::repos::transition::StatusChange;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StatusCommands;
use crate::commands::shared::input::read_profile;
use crate::commands::shared::lifecycle::with_lifecycle;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Moves open to the session actor from a record's current status.
#[derive(Debug, Serialize)]
pub struct TransitionsView {
    pub entity_type: EntityType,
    pub id: String,
    pub status: &'static str,
    pub role: Role,
    pub available: Vec<&'static str>,
}

/// Handle `xp status`.
pub async fn handle(
    action: &StatusCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        StatusCommands::Transitions { kind, id } => {
            with_lifecycle!(*kind, L => output(&transitions::<L>(ctx, id).await?, flags.format))
        }
        StatusCommands::Change {
            kind,
            id,
            to,
            note,
            profile,
        } => {
            let profile = match profile {
                Some(path) => Some(read_profile(path).await?),
                None => None,
            };
            with_lifecycle!(*kind, L => {
                let updated = change::<L>(ctx, id, to, note.as_deref(), profile.as_ref()).await?;
                output(&updated, flags.format)
            })
        }
    }
}

pub async fn transitions<L: Lifecycle>(ctx: &AppContext, id: &str) -> anyhow::Result<TransitionsView> {
    let actor = ctx.require_actor()?;
    let record = ctx.service.get_record::<L>(id).await?;
    let status = record.status();
    let available = ctx
        .service
        .status_engine::<L>()
        .available_transitions(status, actor.role)
        .iter()
        .map(|s| s.as_str())
        .collect();

    Ok(TransitionsView {
        entity_type: L::ENTITY_TYPE,
        id: record.id().to_string(),
        status: status.as_str(),
        role: actor.role,
        available,
    })
}

pub async fn change<L: Lifecycle>(
    ctx: &AppContext,
    id: &str,
    to: &str,
    note: Option<&str>,
    profile: Option<&expensa_core::identity::ActorProfile>,
) -> anyhow::Result<L> {
    let actor = ctx.require_actor()?;
    let target = parse_enum::<L::Status>(to, "status")?;
    let updated = ctx
        .service
        .status_engine::<L>()
        .change_status(StatusChange {
            entity_id: id,
            target,
            note,
            actor,
            profile,
        })
        .await?;
    Ok(updated)
}
