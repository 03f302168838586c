pub mod plant_state_repository;
