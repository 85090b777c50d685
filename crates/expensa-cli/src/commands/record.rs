use expensa_core::transitions::Lifecycle;
use expensa_db::repos::lifecycle::RecordFilter;
use serde_json::{Map, Value};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RecordCommands;
use crate::commands::shared::input::read_fields;
use crate::commands::shared::lifecycle::with_lifecycle;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xp record`.
pub async fn handle(
    action: &RecordCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RecordCommands::Create { kind, data, file } => {
            let fields = read_fields(data.as_deref(), file.as_deref()).await?;
            with_lifecycle!(*kind, L => output(&create::<L>(ctx, fields).await?, flags.format))
        }
        RecordCommands::Get { kind, id } => {
            with_lifecycle!(*kind, L => output(&ctx.service.get_record::<L>(id).await?, flags.format))
        }
        RecordCommands::List {
            kind,
            status,
            created_by,
            mine,
        } => {
            let created_by = if *mine {
                Some(ctx.require_actor()?.id.clone())
            } else {
                created_by.clone()
            };
            let limit = ctx.limit(flags.limit);
            with_lifecycle!(*kind, L => {
                let records = list::<L>(ctx, status.as_deref(), created_by, limit).await?;
                output(&records, flags.format)
            })
        }
        RecordCommands::Update {
            kind,
            id,
            data,
            file,
        } => {
            let patch = read_fields(data.as_deref(), file.as_deref()).await?;
            with_lifecycle!(*kind, L => output(&update::<L>(ctx, id, patch).await?, flags.format))
        }
    }
}

pub async fn create<L: Lifecycle>(ctx: &AppContext, fields: Map<String, Value>) -> anyhow::Result<L> {
    let actor = ctx.require_actor()?;
    Ok(ctx.service.create_record::<L>(fields, actor).await?)
}

pub async fn list<L: Lifecycle>(
    ctx: &AppContext,
    status: Option<&str>,
    created_by: Option<String>,
    limit: u32,
) -> anyhow::Result<Vec<L>> {
    let filter = RecordFilter {
        status: status
            .map(|value| parse_enum::<L::Status>(value, "status"))
            .transpose()?,
        created_by,
        limit: Some(limit),
    };
    Ok(ctx.service.list_records::<L>(&filter).await?)
}

pub async fn update<L: Lifecycle>(
    ctx: &AppContext,
    id: &str,
    patch: Map<String, Value>,
) -> anyhow::Result<L> {
    let actor = ctx.require_actor()?;
    Ok(ctx.service.update_record::<L>(id, patch, actor).await?)
}
