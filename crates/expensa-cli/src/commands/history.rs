use expensa_core::entities::StatusHistoryEntry;
use expensa_core::enums::EntityType;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xp history`.
pub async fn handle(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = fetch(args, ctx).await?;
    output(&entries, flags.format)
}

pub async fn fetch(args: &HistoryArgs, ctx: &AppContext) -> anyhow::Result<Vec<StatusHistoryEntry>> {
    let entity_type = parse_enum::<EntityType>(&args.entity_type, "entity-type")?;
    Ok(ctx.service.list_history(entity_type, &args.entity_id).await?)
}
