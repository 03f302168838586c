use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;

/// Key of the single durable record holding the serialized store state.
const STATE_KEY: &str = "plant_store";

#[derive(Debug, Clone)]
pub struct PlantStateRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for PlantStateRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.get("key")?,
            value: row.get("value")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct PlantStateRepository;

impl PlantStateRepository {
    pub fn get(conn: &Connection) -> AppResult<Option<PlantStateRow>> {
        let mut stmt =
            conn.prepare("SELECT key, value, updated_at FROM plant_state WHERE key = ?1")?;

        let row = stmt
            .query_row([STATE_KEY], |row| PlantStateRow::try_from(row))
            .optional()?;

        Ok(row)
    }

    pub fn upsert(conn: &Connection, value: &str) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO plant_state (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {":key": STATE_KEY, ":value": value},
        )?;

        Ok(())
    }
}
