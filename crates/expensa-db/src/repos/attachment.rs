//! Attachment store.
//!
//! One row per logical file slot on an owner. Uploading a file whose name
//! matches an active attachment on the same owner replaces that row
//! (version + 1) instead of adding a sibling. The match is query-then-branch,
//! so two concurrent same-name uploads can both create a version-1 row.
//!
//! Rows are never physically removed: soft delete moves
//! [`AttachmentState`] to `Deleted`. Reads through [`ExpensaService::list_attachments`]
//! apply the liveness and visibility gates on every call; single-row reads
//! for a caller go through [`ExpensaService::get_visible_attachment`].

use chrono::Utc;
use expensa_core::entities::{Attachment, AttachmentState};
use expensa_core::enums::{AttachmentOrigin, EntityType, OwnerType, Role};
use expensa_core::identity::Actor;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ServiceError, StoreError};
use crate::helpers::to_object;
use crate::service::ExpensaService;
use crate::store::Filter;
use crate::updates::attachment::AttachmentPatch;
use crate::upload::UploadFile;

/// Read filters for [`ExpensaService::list_attachments`].
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Bypass the visibility gate. Callers decide who may set this.
    pub include_invisible: bool,
    pub origin: Option<AttachmentOrigin>,
    pub category: Option<String>,
    /// Exclude soft-deleted rows.
    pub active_only: bool,
    /// Role of the reader; admins always see invisible rows.
    pub viewer: Option<Role>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            include_invisible: false,
            origin: None,
            category: None,
            active_only: true,
            viewer: None,
        }
    }
}

impl ListOptions {
    fn sees_invisible(&self) -> bool {
        self.include_invisible || self.viewer.is_some_and(Role::is_admin)
    }
}

/// Input for [`ExpensaService::upload_attachment`].
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: UploadFile,
    pub owner_type: OwnerType,
    pub owner_id: String,
    pub origin: AttachmentOrigin,
    pub category: String,
    pub description: Option<String>,
    /// Defaults to `true`. Only admins may upload hidden files.
    pub visible_to_submitter: Option<bool>,
    pub line_item_id: Option<String>,
}

#[derive(Serialize)]
struct NewAttachment<'a> {
    owner_type: OwnerType,
    owner_id: &'a str,
    origin: AttachmentOrigin,
    category: &'a str,
    original_name: &'a str,
    signed_url: &'a str,
    content_type: &'a str,
    size_bytes: u64,
    version: u32,
    visible_to_submitter: bool,
    state: AttachmentState,
    description: Option<&'a str>,
    line_item_id: Option<&'a str>,
    uploaded_by: &'a str,
}

#[derive(Serialize)]
struct PayloadPatch<'a> {
    original_name: &'a str,
    signed_url: &'a str,
    content_type: &'a str,
    size_bytes: u64,
    version: u32,
    uploaded_by: &'a str,
}

fn admin_only(actor: &Actor, what: &str) -> Result<(), ServiceError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "only administrators may {what} (acting role: {})",
            actor.role
        )))
    }
}

impl ExpensaService {
    /// Fetch one attachment, soft-deleted or not.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Core(NotFound)` if no attachment has this id.
    pub async fn get_attachment(&self, id: &str) -> Result<Attachment, ServiceError> {
        Ok(self
            .store()
            .get(EntityType::Attachment, id)
            .await?
            .decode()?)
    }

    /// Fetch one attachment as `viewer` would see it.
    ///
    /// Soft-deleted rows are still returned. Hidden rows are only
    /// returned to admins.
    ///
    /// # Errors
    ///
    /// - `Core(NotFound)` if no attachment has this id.
    /// - `Forbidden` if the row is hidden and `viewer` is not an admin.
    pub async fn get_visible_attachment(
        &self,
        id: &str,
        viewer: Role,
    ) -> Result<Attachment, ServiceError> {
        let attachment = self.get_attachment(id).await?;
        if !attachment.visible_to_submitter && !viewer.is_admin() {
            tracing::debug!(id, role = %viewer, "hidden attachment withheld");
            return Err(ServiceError::Forbidden(format!(
                "attachment {id} is not visible to the {viewer} role"
            )));
        }
        Ok(attachment)
    }

    /// Attachments of one owner, newest first, after the liveness and
    /// visibility gates in `options`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the query fails.
    pub async fn list_attachments(
        &self,
        owner_type: OwnerType,
        owner_id: &str,
        options: &ListOptions,
    ) -> Result<Vec<Attachment>, ServiceError> {
        let mut query = Filter::new()
            .eq("owner_type", owner_type.as_str())
            .eq("owner_id", owner_id)
            .sort_desc("created_at");
        if let Some(origin) = options.origin {
            query = query.eq("origin", origin.as_str());
        }
        if let Some(ref category) = options.category {
            query = query.eq("category", category.as_str());
        }

        let rows = self.store().filter(EntityType::Attachment, &query).await?;
        let sees_invisible = options.sees_invisible();
        let mut attachments = Vec::with_capacity(rows.len());
        for row in &rows {
            let att: Attachment = row.decode()?;
            if options.active_only && !att.is_active() {
                continue;
            }
            if !sees_invisible && !att.visible_to_submitter {
                continue;
            }
            attachments.push(att);
        }
        Ok(attachments)
    }

    /// Upload a file onto an owner.
    ///
    /// If an active attachment with the same name already exists on the
    /// owner, the most recent one is replaced and its version bumped.
    /// Otherwise a new row is created at version 1.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a non-admin asks for a hidden upload.
    /// - `Upload` if the delegate fails; nothing is written then.
    pub async fn upload_attachment(
        &self,
        req: UploadRequest,
        actor: &Actor,
    ) -> Result<Attachment, ServiceError> {
        let visible = req.visible_to_submitter.unwrap_or(true);
        if !visible {
            admin_only(actor, "upload hidden attachments")?;
        }

        let same_name = Filter::new()
            .eq("owner_type", req.owner_type.as_str())
            .eq("owner_id", req.owner_id.as_str())
            .eq("original_name", req.file.name.as_str())
            .sort_desc("created_at");
        let candidates = self
            .store()
            .filter(EntityType::Attachment, &same_name)
            .await?;
        for row in &candidates {
            let existing: Attachment = row.decode()?;
            if existing.is_active() {
                tracing::debug!(
                    id = %existing.id,
                    name = %existing.original_name,
                    "same-name upload; replacing existing attachment"
                );
                return self.replace_active(existing, &req.file, actor).await;
            }
        }

        let url = self.uploads().upload(&req.file).await?;
        let new = NewAttachment {
            owner_type: req.owner_type,
            owner_id: &req.owner_id,
            origin: req.origin,
            category: &req.category,
            original_name: &req.file.name,
            signed_url: &url,
            content_type: &req.file.content_type,
            size_bytes: req.file.size_bytes(),
            version: 1,
            visible_to_submitter: visible,
            state: AttachmentState::Active,
            description: req.description.as_deref(),
            line_item_id: req.line_item_id.as_deref(),
            uploaded_by: &actor.id,
        };
        let created: Attachment = self
            .store()
            .create(EntityType::Attachment, to_object(&new)?)
            .await?
            .decode()?;

        tracing::info!(
            id = %created.id,
            owner_type = %created.owner_type,
            owner_id = %created.owner_id,
            name = %created.original_name,
            "attachment uploaded"
        );
        self.audit_upload(&created, actor).await;
        Ok(created)
    }

    /// Upload a new payload for an existing attachment and bump its version.
    ///
    /// # Errors
    ///
    /// - `Core(NotFound)` if the attachment does not exist.
    /// - `Core(Validation)` if it is soft-deleted.
    /// - `Upload` if the delegate fails; the row is left untouched.
    pub async fn replace_attachment(
        &self,
        id: &str,
        file: &UploadFile,
        actor: &Actor,
    ) -> Result<Attachment, ServiceError> {
        let current = self.get_attachment(id).await?;
        if !current.is_active() {
            return Err(ServiceError::validation(format!(
                "attachment {id} is deleted and cannot be replaced"
            )));
        }
        self.replace_active(current, file, actor).await
    }

    async fn replace_active(
        &self,
        current: Attachment,
        file: &UploadFile,
        actor: &Actor,
    ) -> Result<Attachment, ServiceError> {
        let url = self.uploads().upload(file).await?;
        let patch = PayloadPatch {
            original_name: &file.name,
            signed_url: &url,
            content_type: &file.content_type,
            size_bytes: file.size_bytes(),
            version: current.version + 1,
            uploaded_by: &actor.id,
        };
        let updated: Attachment = self
            .store()
            .update(EntityType::Attachment, &current.id, to_object(&patch)?)
            .await?
            .decode()?;

        tracing::info!(
            id = %updated.id,
            from_version = current.version,
            to_version = updated.version,
            "attachment replaced"
        );
        self.audit_replace(&current, &updated, actor).await;
        Ok(updated)
    }

    /// Mark an attachment deleted. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Core(NotFound)` if the attachment does not exist.
    pub async fn soft_delete_attachment(
        &self,
        id: &str,
        actor: &Actor,
    ) -> Result<bool, ServiceError> {
        let current = self.get_attachment(id).await?;
        if !current.is_active() {
            tracing::debug!(id, "attachment already deleted");
            return Ok(false);
        }

        let state = AttachmentState::Deleted {
            deleted_at: Utc::now(),
            deleted_by: actor.id.clone(),
        };
        let mut patch = Map::new();
        patch.insert(
            "state".into(),
            serde_json::to_value(&state).map_err(StoreError::from)?,
        );
        self.store()
            .update(EntityType::Attachment, id, patch)
            .await?;

        tracing::info!(id, actor = %actor.id, "attachment soft-deleted");
        self.audit_delete(&current, actor).await;
        Ok(true)
    }

    /// Edit category, description, or line-item link.
    ///
    /// # Errors
    ///
    /// - `Core(NotFound)` if the attachment does not exist.
    /// - `Core(Validation)` if it is soft-deleted.
    pub async fn update_attachment_metadata(
        &self,
        id: &str,
        patch: AttachmentPatch,
        actor: &Actor,
    ) -> Result<Attachment, ServiceError> {
        let before = self.store().get(EntityType::Attachment, id).await?;
        let current: Attachment = before.decode()?;
        if !current.is_active() {
            return Err(ServiceError::validation(format!(
                "attachment {id} is deleted and cannot be edited"
            )));
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let after = self
            .store()
            .update(EntityType::Attachment, id, to_object(&patch)?)
            .await?;
        let updated: Attachment = after.decode()?;

        tracing::info!(id, "attachment metadata updated");
        self.audit_update(EntityType::Attachment, id, &before.data, &after.data, actor)
            .await;
        Ok(updated)
    }

    /// Show or hide an attachment from submitters. Admin only.
    ///
    /// Returns whether the stored flag changed.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if `actor` is not an admin.
    /// - `Core(NotFound)` if the attachment does not exist.
    pub async fn set_attachment_visibility(
        &self,
        id: &str,
        visible: bool,
        actor: &Actor,
    ) -> Result<bool, ServiceError> {
        admin_only(actor, "change attachment visibility")?;

        let before = self.store().get(EntityType::Attachment, id).await?;
        let current: Attachment = before.decode()?;
        if current.visible_to_submitter == visible {
            return Ok(false);
        }

        let mut patch = Map::new();
        patch.insert("visible_to_submitter".into(), Value::Bool(visible));
        let after = self
            .store()
            .update(EntityType::Attachment, id, patch)
            .await?;

        tracing::info!(id, visible, "attachment visibility changed");
        self.audit_update(EntityType::Attachment, id, &before.data, &after.data, actor)
            .await;
        Ok(true)
    }

    /// Audit that `actor` fetched an attachment.
    ///
    /// # Errors
    ///
    /// - `Core(NotFound)` if the attachment does not exist.
    /// - `Forbidden` if it is hidden and `actor` is not an admin. Nothing
    ///   is audited then.
    pub async fn record_download(&self, id: &str, actor: &Actor) -> Result<(), ServiceError> {
        let attachment = self.get_visible_attachment(id, actor.role).await?;
        self.audit_download(&attachment, actor).await;
        Ok(())
    }
}
