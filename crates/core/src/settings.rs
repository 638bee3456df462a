//! Technical settings: full default records, sparse user overrides, and the
//! global (character / environment) settings.
//!
//! Defaults come from the library catalog once per session. Overrides mirror
//! the default groups with every member optional; a `None` falls through to
//! the default value.

use serde::{Deserialize, Serialize};

use crate::scene::Environment;
use crate::types::NodeId;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Connection settings for the ComfyUI server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComfyUIConfig {
    pub server_address: String,
    pub client_id: String,
}

/// Prompt bundle applied to scenes that do not override it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPrompts {
    pub base_positive_prompt: String,
    pub environment_prompt: String,
    pub positive_prompt: String,
    pub negative_prompt: String,
    pub batch_size: u32,
}

impl Default for DefaultPrompts {
    /// All prompts empty, batch size 1.
    fn default() -> Self {
        Self {
            base_positive_prompt: String::new(),
            environment_prompt: String::new(),
            positive_prompt: String::new(),
            negative_prompt: String::new(),
            batch_size: 1,
        }
    }
}

/// Workflow file locations and the node ids the generator writes into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfigParams {
    pub workflow_json_path: String,
    pub image_output_path: String,
    pub library_file_path: String,
    pub seed_node_id: NodeId,
    pub batch_size_node_id: NodeId,
    pub negative_prompt_node_id: NodeId,
    pub positive_prompt_node_id: NodeId,
    pub environment_prompt_node_id: NodeId,
    pub default_prompts: DefaultPrompts,
}

/// Library-supplied technical defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechDefaults {
    pub comfyui_config: ComfyUIConfig,
    pub workflow_config: WorkflowConfigParams,
}

impl TechDefaults {
    /// Default value of a text field. `None` for node-id fields.
    pub fn text(&self, field: TechField) -> Option<&str> {
        let comfy = &self.comfyui_config;
        let wf = &self.workflow_config;
        match field {
            TechField::ServerAddress => Some(comfy.server_address.as_str()),
            TechField::ClientId => Some(comfy.client_id.as_str()),
            TechField::WorkflowJsonPath => Some(wf.workflow_json_path.as_str()),
            TechField::ImageOutputPath => Some(wf.image_output_path.as_str()),
            TechField::LibraryFilePath => Some(wf.library_file_path.as_str()),
            _ => None,
        }
    }

    /// Default value of a node-id field. `None` for text fields.
    pub fn node_id(&self, field: TechField) -> Option<NodeId> {
        let wf = &self.workflow_config;
        match field {
            TechField::SeedNodeId => Some(wf.seed_node_id),
            TechField::BatchSizeNodeId => Some(wf.batch_size_node_id),
            TechField::NegativePromptNodeId => Some(wf.negative_prompt_node_id),
            TechField::PositivePromptNodeId => Some(wf.positive_prompt_node_id),
            TechField::EnvironmentPromptNodeId => Some(wf.environment_prompt_node_id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComfyUIConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Workflow overrides. `default_prompts` has no override counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_prompt_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_prompt_node_id: Option<NodeId>,
}

/// User edits layered on top of [`TechDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSettingsOverrides {
    #[serde(default)]
    pub comfyui_config: ComfyUIConfigOverrides,
    #[serde(default)]
    pub workflow_config: WorkflowConfigOverrides,
}

impl TechSettingsOverrides {
    /// Override value of a text field, if set.
    pub fn text(&self, field: TechField) -> Option<&str> {
        let comfy = &self.comfyui_config;
        let wf = &self.workflow_config;
        match field {
            TechField::ServerAddress => comfy.server_address.as_deref(),
            TechField::ClientId => comfy.client_id.as_deref(),
            TechField::WorkflowJsonPath => wf.workflow_json_path.as_deref(),
            TechField::ImageOutputPath => wf.image_output_path.as_deref(),
            TechField::LibraryFilePath => wf.library_file_path.as_deref(),
            _ => None,
        }
    }

    /// Override value of a node-id field, if set.
    pub fn node_id(&self, field: TechField) -> Option<NodeId> {
        let wf = &self.workflow_config;
        match field {
            TechField::SeedNodeId => wf.seed_node_id,
            TechField::BatchSizeNodeId => wf.batch_size_node_id,
            TechField::NegativePromptNodeId => wf.negative_prompt_node_id,
            TechField::PositivePromptNodeId => wf.positive_prompt_node_id,
            TechField::EnvironmentPromptNodeId => wf.environment_prompt_node_id,
            _ => None,
        }
    }

    /// Copy with a text field set from editor input. Empty input unsets the
    /// field. Node-id fields are left untouched.
    pub fn with_text(&self, field: TechField, value: &str) -> Self {
        let mut next = self.clone();
        let value = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        let slot = match field {
            TechField::ServerAddress => &mut next.comfyui_config.server_address,
            TechField::ClientId => &mut next.comfyui_config.client_id,
            TechField::WorkflowJsonPath => &mut next.workflow_config.workflow_json_path,
            TechField::ImageOutputPath => &mut next.workflow_config.image_output_path,
            TechField::LibraryFilePath => &mut next.workflow_config.library_file_path,
            _ => return next,
        };
        *slot = value;
        next
    }

    /// Copy with a node-id field set from raw editor input. Input that does
    /// not parse as an integer unsets the field. Text fields are left
    /// untouched.
    pub fn with_node_id(&self, field: TechField, raw: &str) -> Self {
        let mut next = self.clone();
        let value = raw.trim().parse::<NodeId>().ok();
        let slot = match field {
            TechField::SeedNodeId => &mut next.workflow_config.seed_node_id,
            TechField::BatchSizeNodeId => &mut next.workflow_config.batch_size_node_id,
            TechField::NegativePromptNodeId => &mut next.workflow_config.negative_prompt_node_id,
            TechField::PositivePromptNodeId => &mut next.workflow_config.positive_prompt_node_id,
            TechField::EnvironmentPromptNodeId => {
                &mut next.workflow_config.environment_prompt_node_id
            }
            _ => return next,
        };
        *slot = value;
        next
    }
}

// ---------------------------------------------------------------------------
// Required technical fields
// ---------------------------------------------------------------------------

/// Value shape of a [`TechField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    NodeId,
}

/// The technical settings that must have an effective value before a
/// request can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechField {
    ServerAddress,
    ClientId,
    WorkflowJsonPath,
    ImageOutputPath,
    LibraryFilePath,
    SeedNodeId,
    BatchSizeNodeId,
    NegativePromptNodeId,
    PositivePromptNodeId,
    EnvironmentPromptNodeId,
}

impl TechField {
    /// Every required field, in the order missing fields are reported.
    pub const ALL: [TechField; 10] = [
        TechField::ServerAddress,
        TechField::ClientId,
        TechField::WorkflowJsonPath,
        TechField::ImageOutputPath,
        TechField::LibraryFilePath,
        TechField::SeedNodeId,
        TechField::BatchSizeNodeId,
        TechField::NegativePromptNodeId,
        TechField::PositivePromptNodeId,
        TechField::EnvironmentPromptNodeId,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            TechField::ServerAddress
            | TechField::ClientId
            | TechField::WorkflowJsonPath
            | TechField::ImageOutputPath
            | TechField::LibraryFilePath => FieldKind::Text,
            TechField::SeedNodeId
            | TechField::BatchSizeNodeId
            | TechField::NegativePromptNodeId
            | TechField::PositivePromptNodeId
            | TechField::EnvironmentPromptNodeId => FieldKind::NodeId,
        }
    }

    /// User-facing label shown in the settings panel and in error messages.
    pub fn label(self) -> &'static str {
        match self {
            TechField::ServerAddress => "サーバーアドレス",
            TechField::ClientId => "クライアントID",
            TechField::WorkflowJsonPath => "ワークフロー JSON パス",
            TechField::ImageOutputPath => "画像出力パス",
            TechField::LibraryFilePath => "ライブラリファイルパス",
            TechField::SeedNodeId => "シードノードID",
            TechField::BatchSizeNodeId => "バッチサイズノードID",
            TechField::NegativePromptNodeId => "ネガティブプロンプトノードID",
            TechField::PositivePromptNodeId => "ポジティブプロンプトノードID",
            TechField::EnvironmentPromptNodeId => "環境プロンプトノードID",
        }
    }
}

// ---------------------------------------------------------------------------
// Global settings
// ---------------------------------------------------------------------------

/// Settings shared by every scene in the generated config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub character_name: String,
    /// Held by value; the catalog entry it came from is never mutated.
    pub selected_environment: Option<Environment>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
