use expensa_core::entities::Attachment;
use expensa_core::enums::{AttachmentOrigin, OwnerType};
use expensa_db::repos::attachment::{ListOptions, UploadRequest};
use expensa_db::updates::attachment::AttachmentPatchBuilder;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AttachCommands;
use crate::commands::shared::input::read_upload;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Changed<'a> {
    id: &'a str,
    changed: bool,
}

#[derive(Debug, Serialize)]
pub struct DownloadView {
    pub id: String,
    pub original_name: String,
    pub version: u32,
    pub url: String,
}

/// Handle `xp attach`.
pub async fn handle(
    action: &AttachCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AttachCommands::Upload {
            path,
            owner_type,
            owner_id,
            origin,
            category,
            description,
            hidden,
            line_item,
            content_type,
        } => {
            let actor = ctx.require_actor()?;
            let request = UploadRequest {
                file: read_upload(path, content_type.as_deref()).await?,
                owner_type: parse_enum::<OwnerType>(owner_type, "owner-type")?,
                owner_id: owner_id.clone(),
                origin: parse_enum::<AttachmentOrigin>(origin, "origin")?,
                category: category.clone(),
                description: description.clone(),
                visible_to_submitter: hidden.then_some(false),
                line_item_id: line_item.clone(),
            };
            let attachment = ctx.service.upload_attachment(request, actor).await?;
            output(&attachment, flags.format)
        }
        AttachCommands::List {
            owner_type,
            owner_id,
            origin,
            category,
            all,
            include_deleted,
        } => {
            let options = ListOptions {
                include_invisible: *all,
                origin: origin
                    .as_deref()
                    .map(|value| parse_enum::<AttachmentOrigin>(value, "origin"))
                    .transpose()?,
                category: category.clone(),
                active_only: !include_deleted,
                viewer: ctx.actor.as_ref().map(|a| a.role),
            };
            let owner_type = parse_enum::<OwnerType>(owner_type, "owner-type")?;
            let mut attachments = ctx
                .service
                .list_attachments(owner_type, owner_id, &options)
                .await?;
            if let Some(limit) = flags.limit {
                attachments.truncate(limit as usize);
            }
            output(&attachments, flags.format)
        }
        AttachCommands::Get { id } => output(&get(ctx, id).await?, flags.format),
        AttachCommands::Replace { id, path } => {
            let actor = ctx.require_actor()?;
            let file = read_upload(path, None).await?;
            let attachment = ctx.service.replace_attachment(id, &file, actor).await?;
            output(&attachment, flags.format)
        }
        AttachCommands::Edit {
            id,
            category,
            description,
            clear_description,
            line_item,
            clear_line_item,
        } => {
            let actor = ctx.require_actor()?;
            let mut builder = AttachmentPatchBuilder::new();
            if let Some(category) = category {
                builder = builder.category(category.clone());
            }
            if description.is_some() || *clear_description {
                builder = builder.description(description.clone());
            }
            if line_item.is_some() || *clear_line_item {
                builder = builder.line_item_id(line_item.clone());
            }
            let attachment = ctx
                .service
                .update_attachment_metadata(id, builder.build(), actor)
                .await?;
            output(&attachment, flags.format)
        }
        AttachCommands::Delete { id } => {
            let actor = ctx.require_actor()?;
            let changed = ctx.service.soft_delete_attachment(id, actor).await?;
            output(&Changed { id, changed }, flags.format)
        }
        AttachCommands::Visibility { id, visible } => {
            let actor = ctx.require_actor()?;
            let changed = ctx
                .service
                .set_attachment_visibility(id, *visible, actor)
                .await?;
            output(&Changed { id, changed }, flags.format)
        }
        AttachCommands::Download { id } => output(&download(ctx, id).await?, flags.format),
    }
}

/// One attachment as the session actor may see it.
pub async fn get(ctx: &AppContext, id: &str) -> anyhow::Result<Attachment> {
    let actor = ctx.require_actor()?;
    Ok(ctx.service.get_visible_attachment(id, actor.role).await?)
}

/// Audit the download and hand back the retrievable URL.
pub async fn download(ctx: &AppContext, id: &str) -> anyhow::Result<DownloadView> {
    let actor = ctx.require_actor()?;
    let attachment = ctx.service.get_visible_attachment(id, actor.role).await?;
    ctx.service.record_download(id, actor).await?;
    Ok(DownloadView {
        id: attachment.id,
        original_name: attachment.original_name,
        version: attachment.version,
        url: attachment.signed_url,
    })
}

#[cfg(test)]
mod tests {
    use expensa_core::enums::AuditAction;
    use expensa_db::repos::audit::AuditFilter;
    use expensa_db::upload::UploadFile;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::test_support::{actor_config, context};

    #[tokio::test]
    async fn download_is_audited() {
        let ctx = context(Some(actor_config("usr-req", "requester"))).await;
        let actor = ctx.require_actor().unwrap().clone();
        let att = ctx
            .service
            .upload_attachment(
                UploadRequest {
                    file: UploadFile::new("taxi.pdf", "application/pdf", b"%PDF".to_vec()),
                    owner_type: OwnerType::ReimbursementClaim,
                    owner_id: "rc-1".into(),
                    origin: AttachmentOrigin::Submitter,
                    category: "receipt".into(),
                    description: None,
                    visible_to_submitter: None,
                    line_item_id: None,
                },
                &actor,
            )
            .await
            .unwrap();

        let view = download(&ctx, &att.id).await.unwrap();
        assert_eq!(view.url, att.signed_url);
        assert_eq!(view.version, 1);

        let downloads = ctx
            .service
            .query_audit(&AuditFilter {
                action: Some(AuditAction::Download),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].entity_id, att.id);
    }

    #[tokio::test]
    async fn download_of_missing_attachment_fails() {
        let ctx = context(Some(actor_config("usr-req", "requester"))).await;
        assert!(download(&ctx, "att-missing").await.is_err());
    }

    #[tokio::test]
    async fn hidden_attachment_never_reaches_submitter() {
        let admin_ctx = context(Some(actor_config("usr-adm", "admin"))).await;
        let adm = admin_ctx.require_actor().unwrap().clone();
        let att = admin_ctx
            .service
            .upload_attachment(
                UploadRequest {
                    file: UploadFile::new("opinion.pdf", "application/pdf", b"%PDF".to_vec()),
                    owner_type: OwnerType::FundingRequest,
                    owner_id: "fr-1".into(),
                    origin: AttachmentOrigin::Admin,
                    category: "opinion".into(),
                    description: None,
                    visible_to_submitter: Some(false),
                    line_item_id: None,
                },
                &adm,
            )
            .await
            .unwrap();

        // Same store, now acting as the requester.
        let mut req_ctx = admin_ctx;
        req_ctx.actor = Some(actor_config("usr-req", "requester").to_actor().unwrap());

        let err = get(&req_ctx, &att.id).await.unwrap_err();
        assert!(err.to_string().contains("not visible"), "{err}");
        let err = download(&req_ctx, &att.id).await.unwrap_err();
        assert!(err.to_string().contains("not visible"), "{err}");

        let downloads = req_ctx
            .service
            .query_audit(&AuditFilter {
                action: Some(AuditAction::Download),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert!(downloads.is_empty());
    }
}
