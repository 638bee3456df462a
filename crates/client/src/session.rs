//! Session controller: owns the single [`AppState`] and runs the two async
//! flows the panels trigger, the initial library load and Generate.
//!
//! Failures at the transport boundary are always caught here and turned
//! into state (`error`) or a user-facing message; they never leave the
//! application state half-updated.

use scenegen_core::error::CoreError;
use scenegen_core::request::build_generate_request;
use scenegen_core::scene::SceneOverrides;
use scenegen_core::state::{reduce, AppAction, AppState, LoadingPatch};
use scenegen_core::types::SceneId;
use scenegen_core::validation::ValidationResult;

use crate::sink::{ArtifactSink, SinkError};
use crate::transport::{Transport, TransportError};

/// File name suggested for the downloaded config.
pub const CONFIG_FILE_NAME: &str = "workflow_config.yaml";

/// Shown in `AppState::error` when the initial load fails.
pub const LOAD_FAILED_MESSAGE: &str = "初期データの取得に失敗しました";

/// Prefix of every generate failure message.
pub const GENERATE_FAILED_MESSAGE: &str = "コンフィグの生成に失敗しました";

/// Why a submitted generation did not produce a saved file.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl GenerateError {
    /// The single message shown to the user. Backend status failures include
    /// their detail; anything else gets the bare failure message.
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::Transport(err) => match err.status_detail() {
                Some(detail) => format!("{GENERATE_FAILED_MESSAGE}: {detail}"),
                None => GENERATE_FAILED_MESSAGE.to_string(),
            },
            GenerateError::Sink(_) => GENERATE_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Result of [`Session::generate`].
#[derive(Debug)]
pub enum GenerateOutcome {
    /// The config was generated and handed to the sink.
    Saved { bytes: usize },
    /// Validation failed; nothing was submitted.
    Rejected(ValidationResult),
    /// A generation is already in flight; nothing was submitted.
    AlreadyGenerating,
    /// Submission or saving failed.
    Failed { message: String, error: GenerateError },
}

/// One configuration session.
pub struct Session<T, S> {
    state: AppState,
    transport: T,
    sink: S,
}

impl<T: Transport, S: ArtifactSink> Session<T, S> {
    pub fn new(transport: T, sink: S) -> Self {
        Self {
            state: AppState::default(),
            transport,
            sink,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one transition to the session state.
    pub fn dispatch(&mut self, action: AppAction) {
        self.state = reduce(&self.state, action);
    }

    /// Edit the overrides of one queue item starting from its current
    /// overrides, as the scene drawer does. Unlike dispatching
    /// `UpdateSceneOverride` directly, an unknown id is reported.
    pub fn edit_scene_overrides(
        &mut self,
        id: SceneId,
        edit: impl FnOnce(&SceneOverrides) -> SceneOverrides,
    ) -> Result<(), CoreError> {
        let overrides = edit(&self.state.require_queue_item(id)?.overrides);
        self.dispatch(AppAction::UpdateSceneOverride { id, overrides });
        Ok(())
    }

    /// Fetch the library catalog into state. The `library` flag is set for
    /// the duration and always cleared afterwards; a failure is recorded in
    /// `error` and the previous catalog is kept.
    pub async fn load_library(&mut self) {
        self.dispatch(AppAction::SetLoading(LoadingPatch::library(true)));

        match self.transport.fetch_catalog().await {
            Ok(catalog) => {
                tracing::info!(scenes = catalog.scenes.len(), "Library loaded");
                self.dispatch(AppAction::SetLibraryData(catalog));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load library");
                self.dispatch(AppAction::SetError(Some(LOAD_FAILED_MESSAGE.to_string())));
            }
        }

        self.dispatch(AppAction::SetLoading(LoadingPatch::library(false)));
    }

    /// Validate, build, submit and save. The `generating` flag guards
    /// against starting a second generation and is always cleared once
    /// submission has finished.
    pub async fn generate(&mut self) -> GenerateOutcome {
        if self.state.loading_state.generating {
            tracing::warn!("Generate requested while a generation is in flight");
            return GenerateOutcome::AlreadyGenerating;
        }

        let validation = self.state.validate();
        if !validation.is_valid {
            tracing::info!(
                empty_queue = validation.empty_queue_error,
                missing = validation.missing_tech_fields.len(),
                "Generate request rejected by validation",
            );
            return GenerateOutcome::Rejected(validation);
        }

        self.dispatch(AppAction::SetLoading(LoadingPatch::generating(true)));
        let result = self.submit().await;
        self.dispatch(AppAction::SetLoading(LoadingPatch::generating(false)));

        match result {
            Ok(bytes) => GenerateOutcome::Saved { bytes },
            Err(error) => {
                let message = error.user_message();
                tracing::error!(error = %error, "Config generation failed");
                GenerateOutcome::Failed { message, error }
            }
        }
    }

    async fn submit(&self) -> Result<usize, GenerateError> {
        let request = build_generate_request(&self.state);
        let bytes = self.transport.generate_config(&request).await?;
        self.sink.save(&bytes, CONFIG_FILE_NAME).await?;
        Ok(bytes.len())
    }
}
