pub mod identification_service;
pub mod normalizer;
pub mod plant_store;
