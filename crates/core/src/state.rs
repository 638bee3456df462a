//! Application state container.
//!
//! A single [`AppState`] holds everything a session edits. It is only ever
//! changed by feeding an [`AppAction`] through [`reduce`], which returns a
//! new state and leaves the input untouched. Catalog data and the queue sit
//! behind `Arc`, so subtrees an action does not touch are shared with the
//! previous state rather than copied.
//!
//! Actions that name an unknown queue id are silent no-ops.

use std::sync::Arc;

use crate::catalog::CatalogData;
use crate::error::CoreError;
use crate::scene::{Environment, SceneOverrides, SceneQueueItem, SceneTemplate};
use crate::settings::{GlobalSettings, TechDefaults, TechSettingsOverrides};
use crate::types::SceneId;
use crate::validation::{validate_generate_request, ValidationResult};

// ---------------------------------------------------------------------------
// UI flags
// ---------------------------------------------------------------------------

/// Scene edit drawer. Open always carries the id of the item being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawerState {
    #[default]
    Closed,
    Open(SceneId),
}

impl DrawerState {
    pub fn is_open(&self) -> bool {
        matches!(self, DrawerState::Open(_))
    }

    pub fn scene_id(&self) -> Option<SceneId> {
        match self {
            DrawerState::Open(id) => Some(*id),
            DrawerState::Closed => None,
        }
    }
}

/// Independent progress flags for the two async operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub library: bool,
    pub generating: bool,
}

/// Partial update for [`LoadingState`]; `None` leaves a flag as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingPatch {
    pub library: Option<bool>,
    pub generating: Option<bool>,
}

impl LoadingPatch {
    pub fn library(value: bool) -> Self {
        Self {
            library: Some(value),
            generating: None,
        }
    }

    pub fn generating(value: bool) -> Self {
        Self {
            library: None,
            generating: Some(value),
        }
    }

    fn apply(self, state: LoadingState) -> LoadingState {
        LoadingState {
            library: self.library.unwrap_or(state.library),
            generating: self.generating.unwrap_or(state.generating),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything one configuration session holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub scenes: Arc<Vec<SceneTemplate>>,
    pub environments: Arc<Vec<Environment>>,
    pub tech_defaults: Option<Arc<TechDefaults>>,
    pub global_settings: GlobalSettings,
    pub tech_settings_overrides: TechSettingsOverrides,
    /// Insertion order is display order and request order.
    pub scene_queue: Arc<Vec<SceneQueueItem>>,
    pub drawer_state: DrawerState,
    pub loading_state: LoadingState,
    pub error: Option<String>,
}

impl AppState {
    pub fn find_queue_item(&self, id: SceneId) -> Option<&SceneQueueItem> {
        self.scene_queue.iter().find(|item| item.id == id)
    }

    /// Like [`find_queue_item`](Self::find_queue_item) but reports a missing
    /// id as an error.
    pub fn require_queue_item(&self, id: SceneId) -> Result<&SceneQueueItem, CoreError> {
        self.find_queue_item(id).ok_or(CoreError::NotFound {
            entity: "scene_queue_item",
            id,
        })
    }

    /// The queue item the drawer is editing, if the drawer is open and the
    /// item still exists.
    pub fn drawer_item(&self) -> Option<&SceneQueueItem> {
        self.drawer_state
            .scene_id()
            .and_then(|id| self.find_queue_item(id))
    }

    /// Run the pre-submit validator against this state.
    pub fn validate(&self) -> ValidationResult {
        validate_generate_request(
            self.scene_queue.as_slice(),
            self.tech_defaults.as_deref(),
            &self.tech_settings_overrides,
        )
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The closed set of state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    SetLibraryData(CatalogData),
    SetCharacterName(String),
    SelectEnvironment(Option<Environment>),
    /// Replaces the overrides wholesale.
    UpdateTechOverride(TechSettingsOverrides),
    AddSceneToQueue(SceneTemplate),
    RemoveSceneFromQueue(SceneId),
    UpdateSceneOverride {
        id: SceneId,
        overrides: SceneOverrides,
    },
    OpenDrawer(SceneId),
    CloseDrawer,
    SetLoading(LoadingPatch),
    SetError(Option<String>),
}

impl AppAction {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            AppAction::SetLibraryData(_) => "set_library_data",
            AppAction::SetCharacterName(_) => "set_character_name",
            AppAction::SelectEnvironment(_) => "select_environment",
            AppAction::UpdateTechOverride(_) => "update_tech_override",
            AppAction::AddSceneToQueue(_) => "add_scene_to_queue",
            AppAction::RemoveSceneFromQueue(_) => "remove_scene_from_queue",
            AppAction::UpdateSceneOverride { .. } => "update_scene_override",
            AppAction::OpenDrawer(_) => "open_drawer",
            AppAction::CloseDrawer => "close_drawer",
            AppAction::SetLoading(_) => "set_loading",
            AppAction::SetError(_) => "set_error",
        }
    }
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Apply `action` to `state`, producing the next state. New queue items get
/// a random UUID v4.
pub fn reduce(state: &AppState, action: AppAction) -> AppState {
    reduce_with(state, action, SceneId::new_v4)
}

/// [`reduce`] with a caller-supplied id generator for new queue items.
pub fn reduce_with(
    state: &AppState,
    action: AppAction,
    next_id: impl FnOnce() -> SceneId,
) -> AppState {
    tracing::debug!(action = action.name(), "Applying state transition");

    let mut next = state.clone();
    match action {
        AppAction::SetLibraryData(catalog) => {
            next.scenes = Arc::new(catalog.scenes);
            next.environments = Arc::new(catalog.environments);
            next.tech_defaults = catalog.tech_defaults.map(Arc::new);
        }
        AppAction::SetCharacterName(name) => {
            next.global_settings.character_name = name;
        }
        AppAction::SelectEnvironment(environment) => {
            next.global_settings.selected_environment = environment;
        }
        AppAction::UpdateTechOverride(overrides) => {
            next.tech_settings_overrides = overrides;
        }
        AppAction::AddSceneToQueue(template) => {
            let item = SceneQueueItem::from_template(next_id(), &template);
            let mut queue = Vec::with_capacity(state.scene_queue.len() + 1);
            queue.extend(state.scene_queue.iter().cloned());
            queue.push(item);
            next.scene_queue = Arc::new(queue);
        }
        AppAction::RemoveSceneFromQueue(id) => {
            if state.find_queue_item(id).is_none() {
                tracing::debug!(%id, "Remove ignored, id not in queue");
                return next;
            }
            let queue: Vec<_> = state
                .scene_queue
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect();
            next.scene_queue = Arc::new(queue);
        }
        AppAction::UpdateSceneOverride { id, overrides } => {
            if state.find_queue_item(id).is_none() {
                tracing::debug!(%id, "Override update ignored, id not in queue");
                return next;
            }
            let queue: Vec<_> = state
                .scene_queue
                .iter()
                .map(|item| {
                    if item.id == id {
                        SceneQueueItem {
                            overrides: overrides.clone(),
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect();
            next.scene_queue = Arc::new(queue);
        }
        AppAction::OpenDrawer(id) => {
            next.drawer_state = DrawerState::Open(id);
        }
        AppAction::CloseDrawer => {
            next.drawer_state = DrawerState::Closed;
        }
        AppAction::SetLoading(patch) => {
            next.loading_state = patch.apply(state.loading_state);
        }
        AppAction::SetError(error) => {
            next.error = error;
        }
    }
    next
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
