//! Attachment metadata patch builder.

use serde::Serialize;

/// Editable attachment metadata. Visibility and payload fields are not
/// here; they have dedicated operations.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AttachmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_item_id: Option<Option<String>>,
}

impl AttachmentPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.description.is_none() && self.line_item_id.is_none()
    }
}

#[derive(Default)]
pub struct AttachmentPatchBuilder(AttachmentPatch);

impl AttachmentPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.0.category = Some(category.into());
        self
    }

    /// `None` clears the description.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    /// `None` unlinks the line item.
    #[must_use]
    pub fn line_item_id(mut self, line_item_id: Option<String>) -> Self {
        self.0.line_item_id = Some(line_item_id);
        self
    }

    #[must_use]
    pub fn build(self) -> AttachmentPatch {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_set_fields_serialize() {
        let patch = AttachmentPatchBuilder::new()
            .category("receipt")
            .description(None)
            .build();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"category": "receipt", "description": null})
        );
        assert!(AttachmentPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
