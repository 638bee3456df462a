//! The library catalog as delivered by the initial load.

use validator::Validate;

use crate::error::CoreError;
use crate::scene::{Environment, SceneTemplate};
use crate::settings::TechDefaults;

/// Scenes, environments and (optionally) technical defaults fetched once at
/// session start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogData {
    pub scenes: Vec<SceneTemplate>,
    pub environments: Vec<Environment>,
    /// `None` when the library has no default technical settings configured.
    pub tech_defaults: Option<TechDefaults>,
}

impl CatalogData {
    /// Reject catalogs with unnamed entries, zero batch sizes, or duplicate
    /// scene keys.
    pub fn validate(&self) -> Result<(), CoreError> {
        for scene in &self.scenes {
            scene.validate().map_err(|e| {
                CoreError::Validation(format!("Invalid scene template '{}': {e}", scene.name))
            })?;
        }
        for env in &self.environments {
            env.validate().map_err(|e| {
                CoreError::Validation(format!("Invalid environment '{}': {e}", env.name))
            })?;
        }

        let mut seen = std::collections::HashSet::new();
        for scene in &self.scenes {
            if !seen.insert(scene.name.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate scene template name '{}'",
                    scene.name
                )));
            }
        }
        Ok(())
    }
}
