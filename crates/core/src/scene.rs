//! Scene templates, environments, and the sparse per-scene override record.
//!
//! Templates and environments are read-only catalog entries. A
//! [`SceneQueueItem`] is an independently editable instantiation of a
//! template; its [`SceneOverrides`] only carry the fields the user changed.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::SceneId;

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// A reusable scene definition from the library catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SceneTemplate {
    /// Unique key within the catalog.
    #[validate(length(min = 1))]
    pub name: String,
    pub display_name: String,
    pub positive_prompt: String,
    pub negative_prompt: String,
    #[validate(range(min = 1))]
    pub batch_size: u32,
    pub preview_image_url: Option<String>,
}

/// A shooting environment whose prompt is injected into every scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Environment {
    #[validate(length(min = 1))]
    pub name: String,
    pub display_name: String,
    pub environment_prompt: String,
    pub thumbnail_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Sparse per-scene overrides. `None` means "inherit from the template".
///
/// Absent fields are omitted on the wire, never sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
}

impl SceneOverrides {
    /// Returns `true` when no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.positive_prompt.is_none()
            && self.negative_prompt.is_none()
            && self.batch_size.is_none()
    }

    /// Copy with `name` set, or removed when `value` is empty.
    pub fn with_name(&self, value: &str) -> Self {
        Self {
            name: non_empty(value),
            ..self.clone()
        }
    }

    /// Copy with `positive_prompt` set, or removed when `value` is empty.
    pub fn with_positive_prompt(&self, value: &str) -> Self {
        Self {
            positive_prompt: non_empty(value),
            ..self.clone()
        }
    }

    /// Copy with `negative_prompt` set, or removed when `value` is empty.
    pub fn with_negative_prompt(&self, value: &str) -> Self {
        Self {
            negative_prompt: non_empty(value),
            ..self.clone()
        }
    }

    /// Copy with `batch_size` set, or removed when `value` is `None` or 0.
    pub fn with_batch_size(&self, value: Option<u32>) -> Self {
        Self {
            batch_size: value.filter(|&n| n >= 1),
            ..self.clone()
        }
    }
}

/// Empty editor input unsets the field instead of storing `""`.
fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Queue items
// ---------------------------------------------------------------------------

/// A queued instantiation of a template awaiting submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneQueueItem {
    pub id: SceneId,
    /// Back-reference to the originating template by key.
    pub template_name: String,
    /// Snapshot of the template's display name at add time.
    pub display_name: String,
    pub overrides: SceneOverrides,
}

impl SceneQueueItem {
    /// Instantiate `template` under `id` with no overrides.
    pub fn from_template(id: SceneId, template: &SceneTemplate) -> Self {
        Self {
            id,
            template_name: template.name.clone(),
            display_name: template.display_name.clone(),
            overrides: SceneOverrides::default(),
        }
    }

    /// The name shown for this item: the override name if set, otherwise the
    /// display name captured when the item was queued.
    pub fn effective_display_name(&self) -> &str {
        self.overrides.name.as_deref().unwrap_or(&self.display_name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn template() -> SceneTemplate {
        SceneTemplate {
            name: "beach_walk".to_string(),
            display_name: "Beach walk".to_string(),
            positive_prompt: "walking on the beach".to_string(),
            negative_prompt: "blurry".to_string(),
            batch_size: 2,
            preview_image_url: None,
        }
    }

    // -- Override editing --

    #[test]
    fn setting_value_stores_it() {
        let overrides = SceneOverrides::default().with_positive_prompt("sunset");
        assert_eq!(overrides.positive_prompt.as_deref(), Some("sunset"));
    }

    #[test]
    fn empty_string_removes_field() {
        let overrides = SceneOverrides::default()
            .with_name("Custom")
            .with_name("");
        assert!(overrides.name.is_none());
        assert!(overrides.is_empty());
    }

    #[test]
    fn zero_batch_size_removes_field() {
        let overrides = SceneOverrides::default()
            .with_batch_size(Some(3))
            .with_batch_size(Some(0));
        assert!(overrides.batch_size.is_none());
        assert!(overrides.is_empty());
    }

    #[test]
    fn unset_batch_size_removes_field() {
        let overrides = SceneOverrides::default()
            .with_batch_size(Some(3))
            .with_batch_size(None);
        assert!(overrides.batch_size.is_none());
    }

    #[test]
    fn editing_one_field_keeps_the_others() {
        let overrides = SceneOverrides::default()
            .with_name("Custom")
            .with_batch_size(Some(4))
            .with_negative_prompt("");
        assert_eq!(overrides.name.as_deref(), Some("Custom"));
        assert_eq!(overrides.batch_size, Some(4));
        assert!(overrides.negative_prompt.is_none());
    }

    #[test]
    fn whitespace_is_kept_as_a_value() {
        let overrides = SceneOverrides::default().with_name(" ");
        assert_eq!(overrides.name.as_deref(), Some(" "));
    }

    // -- Wire format --

    #[test]
    fn absent_overrides_are_omitted_when_serialized() {
        let overrides = SceneOverrides::default().with_batch_size(Some(3));
        let json = serde_json::to_value(&overrides).unwrap();
        assert_eq!(json, serde_json::json!({ "batch_size": 3 }));
    }

    #[test]
    fn missing_override_keys_deserialize_as_none() {
        let overrides: SceneOverrides =
            serde_json::from_value(serde_json::json!({ "name": "Alt" })).unwrap();
        assert_eq!(overrides.name.as_deref(), Some("Alt"));
        assert!(overrides.positive_prompt.is_none());
        assert!(overrides.batch_size.is_none());
    }

    #[test]
    fn template_uses_snake_case_keys() {
        let json = serde_json::to_value(template()).unwrap();
        assert_eq!(json["display_name"], "Beach walk");
        assert_eq!(json["batch_size"], 2);
        assert!(json["preview_image_url"].is_null());
    }

    // -- Queue items --

    #[test]
    fn queue_item_snapshots_template() {
        let id = SceneId::new_v4();
        let item = SceneQueueItem::from_template(id, &template());
        assert_eq!(item.id, id);
        assert_eq!(item.template_name, "beach_walk");
        assert_eq!(item.display_name, "Beach walk");
        assert!(item.overrides.is_empty());
    }

    #[test]
    fn effective_display_name_prefers_override() {
        let mut item = SceneQueueItem::from_template(SceneId::new_v4(), &template());
        assert_eq!(item.effective_display_name(), "Beach walk");
        item.overrides = item.overrides.with_name("Evening walk");
        assert_eq!(item.effective_display_name(), "Evening walk");
    }

    // -- Catalog checks --

    #[test]
    fn zero_batch_size_template_fails_validation() {
        let mut bad = template();
        bad.batch_size = 0;
        assert!(bad.validate().is_err());
        assert!(template().validate().is_ok());
    }

    #[test]
    fn unnamed_environment_fails_validation() {
        let env = Environment {
            name: String::new(),
            display_name: "Studio".to_string(),
            environment_prompt: "white studio".to_string(),
            thumbnail_url: None,
        };
        assert!(env.validate().is_err());
    }
}
