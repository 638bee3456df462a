//! Pre-submit validation of a generate request.
//!
//! Decides whether the current queue and technical settings are complete
//! enough to submit, and names every required field that has no effective
//! value. Never fails: callers always receive a full [`ValidationResult`].

use serde::Serialize;

use crate::settings::{FieldKind, TechDefaults, TechField, TechSettingsOverrides};
use crate::types::NodeId;

/// Inline message shown when Generate is pressed with an empty queue.
pub const EMPTY_QUEUE_MESSAGE: &str = "シーンをキューに追加してください";

/// Prefix of the inline message listing missing technical settings.
pub const MISSING_FIELDS_MESSAGE: &str = "以下の技術設定が未入力です";

/// Outcome of [`validate_generate_request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub empty_queue_error: bool,
    /// Fields without an effective value, in [`TechField::ALL`] order.
    pub missing_tech_fields: Vec<TechField>,
}

impl ValidationResult {
    /// User-facing labels of the missing fields, in report order.
    pub fn missing_labels(&self) -> Vec<&'static str> {
        self.missing_tech_fields.iter().map(|f| f.label()).collect()
    }

    /// Inline messages to display. Empty when the request is valid.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.empty_queue_error {
            messages.push(EMPTY_QUEUE_MESSAGE.to_string());
        }
        if !self.missing_tech_fields.is_empty() {
            messages.push(format!(
                "{MISSING_FIELDS_MESSAGE}: {}",
                self.missing_labels().join("、")
            ));
        }
        messages
    }
}

/// Validate a request before it is built and submitted.
///
/// Only the length of `queue` matters. A `None` for `defaults` behaves as if
/// every default were absent, so each field must then come from `overrides`.
pub fn validate_generate_request<T>(
    queue: &[T],
    defaults: Option<&TechDefaults>,
    overrides: &TechSettingsOverrides,
) -> ValidationResult {
    let empty_queue_error = queue.is_empty();
    let missing_tech_fields = missing_tech_fields(defaults, overrides);

    ValidationResult {
        is_valid: !empty_queue_error && missing_tech_fields.is_empty(),
        empty_queue_error,
        missing_tech_fields,
    }
}

/// Required fields whose merged value would be the sentinel.
fn missing_tech_fields(
    defaults: Option<&TechDefaults>,
    overrides: &TechSettingsOverrides,
) -> Vec<TechField> {
    TechField::ALL
        .into_iter()
        .filter(|&field| !has_effective_value(field, defaults, overrides))
        .collect()
}

/// Checks the value the request builder will send. A set override is the
/// effective value even when it is blank or not positive; the default is
/// only consulted when the override is unset (or an empty string).
fn has_effective_value(
    field: TechField,
    defaults: Option<&TechDefaults>,
    overrides: &TechSettingsOverrides,
) -> bool {
    match field.kind() {
        FieldKind::Text => match overrides.text(field).filter(|v| !v.is_empty()) {
            Some(value) => has_text(Some(value)),
            None => has_text(defaults.and_then(|d| d.text(field))),
        },
        FieldKind::NodeId => match overrides.node_id(field) {
            Some(id) => has_node_id(Some(id)),
            None => has_node_id(defaults.and_then(|d| d.node_id(field))),
        },
    }
}

/// Whitespace-only text counts as absent.
fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Zero and negative ids count as absent.
fn has_node_id(value: Option<NodeId>) -> bool {
    value.is_some_and(|v| v > 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ComfyUIConfig, DefaultPrompts, WorkflowConfigParams};

    fn full_defaults() -> TechDefaults {
        TechDefaults {
            comfyui_config: ComfyUIConfig {
                server_address: "127.0.0.1:8188".to_string(),
                client_id: "client-1".to_string(),
            },
            workflow_config: WorkflowConfigParams {
                workflow_json_path: "/workflows/base.json".to_string(),
                image_output_path: "/output".to_string(),
                library_file_path: "/library.yaml".to_string(),
                seed_node_id: 3,
                batch_size_node_id: 5,
                negative_prompt_node_id: 7,
                positive_prompt_node_id: 6,
                environment_prompt_node_id: 8,
                default_prompts: DefaultPrompts::default(),
            },
        }
    }

    // -- Queue --

    #[test]
    fn empty_queue_is_invalid_even_with_full_defaults() {
        let result =
            validate_generate_request::<u8>(&[], Some(&full_defaults()), &Default::default());
        assert!(!result.is_valid);
        assert!(result.empty_queue_error);
        assert!(result.missing_tech_fields.is_empty());
    }

    #[test]
    fn queue_contents_do_not_matter() {
        let result =
            validate_generate_request(&["x", "y"], Some(&full_defaults()), &Default::default());
        assert!(result.is_valid);
        assert!(!result.empty_queue_error);
    }

    // -- Missing fields --

    #[test]
    fn no_defaults_and_no_overrides_reports_every_field_in_order() {
        let result = validate_generate_request(&[1], None, &Default::default());
        assert!(!result.is_valid);
        assert_eq!(result.missing_tech_fields, TechField::ALL.to_vec());
    }

    #[test]
    fn missing_labels_are_human_readable() {
        let result = validate_generate_request(&[1], None, &Default::default());
        let labels = result.missing_labels();
        assert_eq!(labels[0], "サーバーアドレス");
        assert_eq!(labels[9], "環境プロンプトノードID");
    }

    #[test]
    fn override_fills_empty_default() {
        let mut defaults = full_defaults();
        defaults.comfyui_config.server_address = String::new();
        let overrides = TechSettingsOverrides::default()
            .with_text(TechField::ServerAddress, "192.168.1.1:8188");

        let result = validate_generate_request(&[1], Some(&defaults), &overrides);
        assert!(result.is_valid);
        assert!(!result.missing_tech_fields.contains(&TechField::ServerAddress));
    }

    #[test]
    fn blank_override_hides_default() {
        let overrides = TechSettingsOverrides::default().with_text(TechField::ClientId, "   ");

        let result = validate_generate_request(&[1], Some(&full_defaults()), &overrides);
        assert!(!result.is_valid);
        assert_eq!(result.missing_tech_fields, vec![TechField::ClientId]);
    }

    #[test]
    fn empty_string_override_uses_default() {
        let mut overrides = TechSettingsOverrides::default();
        overrides.comfyui_config.client_id = Some(String::new());

        let result = validate_generate_request(&[1], Some(&full_defaults()), &overrides);
        assert!(result.is_valid);
    }

    #[test]
    fn whitespace_default_counts_as_missing() {
        let mut defaults = full_defaults();
        defaults.workflow_config.image_output_path = "  ".to_string();

        let result = validate_generate_request(&[1], Some(&defaults), &Default::default());
        assert_eq!(result.missing_tech_fields, vec![TechField::ImageOutputPath]);
    }

    #[test]
    fn zero_node_id_counts_as_missing() {
        let mut defaults = full_defaults();
        defaults.workflow_config.seed_node_id = 0;

        let result = validate_generate_request(&[1], Some(&defaults), &Default::default());
        assert_eq!(result.missing_tech_fields, vec![TechField::SeedNodeId]);

        let mut overrides = TechSettingsOverrides::default();
        overrides.workflow_config.seed_node_id = Some(0);
        let result = validate_generate_request(&[1], Some(&defaults), &overrides);
        assert_eq!(result.missing_tech_fields, vec![TechField::SeedNodeId]);
    }

    #[test]
    fn zero_override_hides_positive_default() {
        let overrides = TechSettingsOverrides::default()
            .with_node_id(TechField::BatchSizeNodeId, "0")
            .with_node_id(TechField::SeedNodeId, "-2");

        let result = validate_generate_request(&[1], Some(&full_defaults()), &overrides);
        assert!(!result.is_valid);
        assert_eq!(
            result.missing_tech_fields,
            vec![TechField::SeedNodeId, TechField::BatchSizeNodeId]
        );
    }

    #[test]
    fn negative_node_id_counts_as_missing() {
        let mut defaults = full_defaults();
        defaults.workflow_config.positive_prompt_node_id = -4;

        let result = validate_generate_request(&[1], Some(&defaults), &Default::default());
        assert_eq!(result.missing_tech_fields, vec![TechField::PositivePromptNodeId]);
    }

    #[test]
    fn overrides_alone_can_satisfy_everything() {
        let mut overrides = TechSettingsOverrides::default();
        for field in TechField::ALL {
            overrides = match field.kind() {
                FieldKind::Text => overrides.with_text(field, "value"),
                FieldKind::NodeId => overrides.with_node_id(field, "1"),
            };
        }
        let result = validate_generate_request(&[1], None, &overrides);
        assert!(result.is_valid);
    }

    #[test]
    fn default_prompts_are_not_checked() {
        let mut defaults = full_defaults();
        defaults.workflow_config.default_prompts.base_positive_prompt = String::new();
        defaults.workflow_config.default_prompts.batch_size = 0;

        let result = validate_generate_request(&[1], Some(&defaults), &Default::default());
        assert!(result.is_valid);
    }

    // -- Messages --

    #[test]
    fn valid_result_has_no_messages() {
        let result = validate_generate_request(&[1], Some(&full_defaults()), &Default::default());
        assert!(result.messages().is_empty());
    }

    #[test]
    fn messages_cover_queue_and_fields() {
        let mut defaults = full_defaults();
        defaults.comfyui_config.client_id = String::new();
        defaults.workflow_config.seed_node_id = 0;

        let result = validate_generate_request::<u8>(&[], Some(&defaults), &Default::default());
        let messages = result.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], EMPTY_QUEUE_MESSAGE);
        assert!(messages[1].contains("クライアントID"));
        assert!(messages[1].contains("シードノードID"));
    }

    // -- Purity --

    #[test]
    fn repeated_calls_are_equal() {
        let overrides = TechSettingsOverrides::default().with_text(TechField::ClientId, "c");
        let a = validate_generate_request(&[1, 2], None, &overrides);
        let b = validate_generate_request(&[1, 2], None, &overrides);
        assert_eq!(a, b);
    }
}
