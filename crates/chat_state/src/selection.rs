//! Model and prompt-fragment selection, persisted across runs

use std::collections::BTreeSet;
use std::path::Path;

use chat_core::paths::{load_json, preferences_json_path, save_json};
use chat_core::{Branch, Config, ConfigError, ModelId, SystemPrompt, UserPrompt};
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    left: ModelId,
    right: ModelId,
}

impl ModelSelection {
    pub fn new(left: ModelId, right: ModelId) -> Result<Self, SelectionError> {
        let selection = Self { left, right };
        selection.validate()?;
        Ok(selection)
    }

    pub fn from_config(config: &Config) -> Result<Self, SelectionError> {
        Self::new(
            ModelId::from(config.left_model.as_str()),
            ModelId::from(config.right_model.as_str()),
        )
    }

    pub fn get(&self, branch: Branch) -> &ModelId {
        match branch {
            Branch::Left => &self.left,
            Branch::Right => &self.right,
        }
    }

    pub fn set(&mut self, branch: Branch, model: ModelId) -> Result<(), SelectionError> {
        if self.get(branch.other()) == &model {
            return Err(SelectionError::SameModel(model));
        }
        match branch {
            Branch::Left => self.left = model,
            Branch::Right => self.right = model,
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.left == self.right {
            return Err(SelectionError::SameModel(self.right.clone()));
        }
        Ok(())
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            left: ModelId::from(chat_core::DEFAULT_LEFT_MODEL),
            right: ModelId::from(chat_core::DEFAULT_RIGHT_MODEL),
        }
    }
}

/// Selected library prompt IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSelection {
    #[serde(default)]
    system: BTreeSet<String>,
    #[serde(default)]
    user: BTreeSet<String>,
}

impl PromptSelection {
    /// Flip a system prompt; returns whether it is now selected.
    pub fn toggle_system(&mut self, prompt_id: &str) -> bool {
        toggle(&mut self.system, prompt_id)
    }

    /// Flip a user prompt; returns whether it is now selected.
    pub fn toggle_user(&mut self, prompt_id: &str) -> bool {
        toggle(&mut self.user, prompt_id)
    }

    pub fn is_selected(&self, prompt_id: &str) -> bool {
        self.system.contains(prompt_id) || self.user.contains(prompt_id)
    }

    pub fn clear(&mut self) {
        self.system.clear();
        self.user.clear();
    }

    pub fn len(&self) -> usize {
        self.system.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Texts of the selected prompts: system prompts first, each group in
    /// library order. Unknown IDs are skipped.
    pub fn context_fragments(&self, system: &[SystemPrompt], user: &[UserPrompt]) -> Vec<String> {
        system
            .iter()
            .filter(|prompt| self.system.contains(&prompt.prompt_id))
            .map(|prompt| prompt.prompt_text.clone())
            .chain(
                user.iter()
                    .filter(|prompt| self.user.contains(&prompt.prompt_id))
                    .map(|prompt| prompt.prompt_text.clone()),
            )
            .collect()
    }
}

fn toggle(set: &mut BTreeSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

/// What the user picked last time, stored in `preferences.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub models: Option<ModelSelection>,
    #[serde(default)]
    pub prompts: PromptSelection,
}

impl Preferences {
    /// Load from the app directory. Missing or unreadable files give defaults.
    pub fn load() -> Self {
        Self::load_from(&preferences_json_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match load_json::<Preferences>(path) {
            Ok(mut prefs) => {
                if prefs.models.as_ref().is_some_and(|m| m.validate().is_err()) {
                    tracing::warn!("Discarding model preferences with equal models");
                    prefs.models = None;
                }
                prefs
            }
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(err) => {
                tracing::warn!("Ignoring unreadable preferences at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> chat_core::Result<()> {
        self.save_to(&preferences_json_path())
    }

    pub fn save_to(&self, path: &Path) -> chat_core::Result<()> {
        save_json(path, self)
    }

    /// Stored models if present, otherwise the configured ones.
    pub fn model_selection(&self, config: &Config) -> Result<ModelSelection, SelectionError> {
        match &self.models {
            Some(models) => Ok(models.clone()),
            None => ModelSelection::from_config(config),
        }
    }
}
