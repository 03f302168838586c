use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::plant::{PlantData, ScannedPlant};

/// The single durable record mirroring the store's state:
/// scan history (newest first) plus favorited plant ids.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedPlantState {
    pub history: Vec<ScannedPlant>,
    pub favorite_ids: Vec<String>,
}

/// Port the store calls to mirror its state to durable storage.
pub trait StatePersistence: Send + Sync {
    fn load(&self) -> AppResult<Option<PersistedPlantState>>;
    fn save(&self, state: &PersistedPlantState) -> AppResult<()>;
}

/// Process-wide scan history and favorites.
///
/// In-memory state is the source of truth for the session. Every mutation
/// is flushed through the persistence port afterwards; a failed flush is
/// logged and never rolls the mutation back.
pub struct PlantStore {
    state: RwLock<PersistedPlantState>,
    persistence: Arc<dyn StatePersistence>,
}

impl PlantStore {
    pub fn new(persistence: Arc<dyn StatePersistence>) -> AppResult<Self> {
        let state = persistence.load()?.unwrap_or_default();
        debug!(
            target: "app::store",
            history = state.history.len(),
            favorites = state.favorite_ids.len(),
            "plant store loaded"
        );

        Ok(Self {
            state: RwLock::new(state),
            persistence,
        })
    }

    /// Record a successful identification. Stamps `scannedAt`, drops any
    /// earlier entry with the same id, and inserts at the front, so a
    /// re-scan replaces its old entry and becomes the newest.
    pub fn add_to_history(&self, plant: PlantData) {
        let scanned = ScannedPlant {
            plant,
            scanned_at: Utc::now().to_rfc3339(),
        };

        self.mutate(|state| {
            let id = scanned.plant.id.clone();
            state.history.retain(|entry| entry.plant.id != id);
            state.history.insert(0, scanned);
        });
    }

    /// Flip the favorite marker for `plant_id`. Two toggles cancel out.
    pub fn toggle_favorite(&self, plant_id: &str) {
        self.mutate(|state| {
            if let Some(position) = state.favorite_ids.iter().position(|id| id == plant_id) {
                state.favorite_ids.remove(position);
            } else {
                state.favorite_ids.push(plant_id.to_string());
            }
        });
    }

    pub fn is_favorite(&self, plant_id: &str) -> bool {
        let state = self.state.read().expect("store lock poisoned");
        state.favorite_ids.iter().any(|id| id == plant_id)
    }

    /// Scan history, newest first.
    pub fn history(&self) -> Vec<ScannedPlant> {
        let state = self.state.read().expect("store lock poisoned");
        state.history.clone()
    }

    /// The favorited subset of history, in history order. Favorite ids
    /// with no matching history entry are skipped, not cleaned up.
    pub fn collection(&self) -> Vec<ScannedPlant> {
        let state = self.state.read().expect("store lock poisoned");
        state
            .history
            .iter()
            .filter(|entry| state.favorite_ids.iter().any(|id| *id == entry.plant.id))
            .cloned()
            .collect()
    }

    /// Reset both history and favorites. Not part of the normal scan flow.
    pub fn clear_history(&self) {
        self.mutate(|state| {
            state.history.clear();
            state.favorite_ids.clear();
        });
    }

    fn mutate<F>(&self, op: F)
    where
        F: FnOnce(&mut PersistedPlantState),
    {
        let snapshot = {
            let mut state = self.state.write().expect("store lock poisoned");
            op(&mut state);
            state.clone()
        };

        if let Err(error) = self.persistence.save(&snapshot) {
            warn!(
                target: "app::store",
                error = %error,
                "failed to persist plant store state, keeping in-memory state"
            );
        }
    }
}
