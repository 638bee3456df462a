//! Builds the outbound generate request from the session state.
//!
//! Each technical field resolves as `override -> default -> sentinel`, with
//! `""` as the text sentinel and `0` as the node-id sentinel. The builder
//! does not validate; run the validator first.

use serde::{Deserialize, Serialize};

use crate::scene::SceneOverrides;
use crate::settings::{ComfyUIConfig, WorkflowConfigParams};
use crate::state::AppState;
use crate::types::NodeId;

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettingsPayload {
    pub character_name: String,
    pub environment_name: String,
    pub environment_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSettingsPayload {
    pub comfyui_config: ComfyUIConfig,
    pub workflow_config: WorkflowConfigParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSceneItem {
    pub template_name: String,
    pub overrides: SceneOverrides,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub global_settings: GlobalSettingsPayload,
    pub tech_settings: TechSettingsPayload,
    pub scenes: Vec<GenerateSceneItem>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Merge defaults and overrides and map the queue into a [`GenerateRequest`].
pub fn build_generate_request(state: &AppState) -> GenerateRequest {
    let defaults = state.tech_defaults.as_deref();
    let overrides = &state.tech_settings_overrides;

    let comfy_over = &overrides.comfyui_config;
    let comfy_def = defaults.map(|d| &d.comfyui_config);
    let comfyui_config = ComfyUIConfig {
        server_address: merge_text(
            &comfy_over.server_address,
            comfy_def.map(|d| &d.server_address),
        ),
        client_id: merge_text(&comfy_over.client_id, comfy_def.map(|d| &d.client_id)),
    };

    let wf_over = &overrides.workflow_config;
    let wf_def = defaults.map(|d| &d.workflow_config);
    let workflow_config = WorkflowConfigParams {
        workflow_json_path: merge_text(
            &wf_over.workflow_json_path,
            wf_def.map(|d| &d.workflow_json_path),
        ),
        image_output_path: merge_text(
            &wf_over.image_output_path,
            wf_def.map(|d| &d.image_output_path),
        ),
        library_file_path: merge_text(
            &wf_over.library_file_path,
            wf_def.map(|d| &d.library_file_path),
        ),
        seed_node_id: merge_node_id(wf_over.seed_node_id, wf_def.map(|d| d.seed_node_id)),
        batch_size_node_id: merge_node_id(
            wf_over.batch_size_node_id,
            wf_def.map(|d| d.batch_size_node_id),
        ),
        negative_prompt_node_id: merge_node_id(
            wf_over.negative_prompt_node_id,
            wf_def.map(|d| d.negative_prompt_node_id),
        ),
        positive_prompt_node_id: merge_node_id(
            wf_over.positive_prompt_node_id,
            wf_def.map(|d| d.positive_prompt_node_id),
        ),
        environment_prompt_node_id: merge_node_id(
            wf_over.environment_prompt_node_id,
            wf_def.map(|d| d.environment_prompt_node_id),
        ),
        // Taken as-is; prompts are never merged with overrides.
        default_prompts: wf_def
            .map(|d| d.default_prompts.clone())
            .unwrap_or_default(),
    };

    let global = &state.global_settings;
    let environment = global.selected_environment.as_ref();
    let global_settings = GlobalSettingsPayload {
        character_name: global.character_name.clone(),
        environment_name: environment.map(|e| e.name.clone()).unwrap_or_default(),
        environment_prompt: environment
            .map(|e| e.environment_prompt.clone())
            .unwrap_or_default(),
    };

    let scenes = state
        .scene_queue
        .iter()
        .map(|item| GenerateSceneItem {
            template_name: item.template_name.clone(),
            overrides: item.overrides.clone(),
        })
        .collect();

    GenerateRequest {
        global_settings,
        tech_settings: TechSettingsPayload {
            comfyui_config,
            workflow_config,
        },
        scenes,
    }
}

/// A set, non-empty override wins even when it is only whitespace; the
/// validator is what rejects blank values.
fn merge_text(over: &Option<String>, default: Option<&String>) -> String {
    over.as_ref()
        .filter(|v| !v.is_empty())
        .or(default)
        .cloned()
        .unwrap_or_default()
}

fn merge_node_id(over: Option<NodeId>, default: Option<NodeId>) -> NodeId {
    over.or(default).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
