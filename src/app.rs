use std::sync::Arc;

use crate::db::{DbPool, SqlitePlantStateStore};
use crate::error::AppResult;
use crate::models::plant::{PlantData, ScannedPlant};
use crate::services::identification_service::{IdentificationService, PlantIdConfig};
use crate::services::plant_store::PlantStore;

/// Wired application core handed to the presentation layer.
///
/// Owns the identification client and the durable plant store; everything
/// the UI does goes through the operations below.
#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    identification_service: Arc<IdentificationService>,
    store: Arc<PlantStore>,
}

impl AppState {
    /// Wire the core against a database file, sourcing the Plant.id
    /// credential from the environment.
    pub fn new(db_pool: DbPool) -> AppResult<Self> {
        Self::with_config(db_pool, PlantIdConfig::from_env())
    }

    pub fn with_config(db_pool: DbPool, config: PlantIdConfig) -> AppResult<Self> {
        let identification_service = Arc::new(IdentificationService::new(config)?);
        let persistence = Arc::new(SqlitePlantStateStore::new(db_pool.clone()));
        let store = Arc::new(PlantStore::new(persistence)?);

        Ok(Self {
            db_pool,
            identification_service,
            store,
        })
    }

    /// Identify a captured photo. `captured_image_uri` is the caller's
    /// local reference to the photo and is stamped onto the result; the
    /// client itself returns it empty.
    pub async fn identify(
        &self,
        image: &[u8],
        captured_image_uri: &str,
    ) -> AppResult<PlantData> {
        let mut plant = self.identification_service.identify(image).await?;
        plant.captured_image_uri = captured_image_uri.to_string();
        Ok(plant)
    }

    pub fn add_to_history(&self, plant: PlantData) {
        self.store.add_to_history(plant);
    }

    pub fn toggle_favorite(&self, plant_id: &str) {
        self.store.toggle_favorite(plant_id);
    }

    pub fn is_favorite(&self, plant_id: &str) -> bool {
        self.store.is_favorite(plant_id)
    }

    pub fn history(&self) -> Vec<ScannedPlant> {
        self.store.history()
    }

    pub fn collection(&self) -> Vec<ScannedPlant> {
        self.store.collection()
    }

    pub fn clear_history(&self) {
        self.store.clear_history()
    }

    pub fn db_pool(&self) -> &DbPool {
        &self.db_pool
    }
}
