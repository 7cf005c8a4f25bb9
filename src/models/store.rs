//! SQLite-backed model table, upserted by model id

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::warn;

use crate::error::AppError;
use crate::pricing::TokenPricing;

use super::listing::ModelRecord;
use super::types::ModelMetadata;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS models (
    id             TEXT PRIMARY KEY,
    display_name   TEXT NOT NULL,
    owner          TEXT NOT NULL,
    model_type     TEXT NOT NULL,
    context_window INTEGER NOT NULL,
    created        INTEGER,
    active         INTEGER NOT NULL,
    input_price    REAL NOT NULL,
    output_price   REAL NOT NULL,
    metadata       TEXT NOT NULL,
    updated_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)";

const UPSERT: &str = "
INSERT INTO models (id, display_name, owner, model_type, context_window, created,
                    active, input_price, output_price, metadata)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
ON CONFLICT(id) DO UPDATE SET
    display_name = excluded.display_name,
    owner = excluded.owner,
    model_type = excluded.model_type,
    context_window = excluded.context_window,
    created = excluded.created,
    active = excluded.active,
    input_price = excluded.input_price,
    output_price = excluded.output_price,
    metadata = excluded.metadata,
    updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')";

const SELECT_COLUMNS: &str = "SELECT id, display_name, context_window, created, active, \
     input_price, output_price, metadata FROM models";

/// Persistent cache of detected model metadata
pub struct ModelStore {
    conn: Connection,
}

impl ModelStore {
    /// Open (creating if needed) the store at `path` and its parent directory
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| AppError::StoreDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self::init(Connection::open(path)?)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert or refresh a model row
    pub fn upsert(&self, record: &ModelRecord) -> rusqlite::Result<()> {
        upsert_record(&self.conn, record)
    }

    /// Upsert many records in one transaction, returning how many were written
    pub fn upsert_all(&mut self, records: &[ModelRecord]) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;
        for record in records {
            upsert_record(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    pub fn get(&self, id: &str) -> rusqlite::Result<Option<ModelRecord>> {
        self.conn
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], read_record)
            .optional()
            .map(Option::flatten)
    }

    /// All stored models ordered by id. Rows with unreadable metadata are skipped.
    pub fn list(&self) -> rusqlite::Result<Vec<ModelRecord>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt.query_map([], read_record)?;

        let mut records = Vec::new();
        for row in rows {
            if let Some(record) = row? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn upsert_record(conn: &Connection, record: &ModelRecord) -> rusqlite::Result<()> {
    let metadata = serde_json::to_string(&record.metadata)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    conn.execute(
        UPSERT,
        params![
            record.id,
            record.display_name,
            record.metadata.owner,
            record.metadata.model_type.as_str(),
            i64::try_from(record.context_window).unwrap_or(i64::MAX),
            record.created,
            record.active,
            record.pricing.input,
            record.pricing.output,
            metadata,
        ],
    )?;
    Ok(())
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<Option<ModelRecord>> {
    let id: String = row.get(0)?;
    let metadata_json: String = row.get(7)?;
    let metadata: ModelMetadata = match serde_json::from_str(&metadata_json) {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!("Ignoring stored model \"{id}\" with unreadable metadata: {err}");
            return Ok(None);
        }
    };

    Ok(Some(ModelRecord {
        id,
        display_name: row.get(1)?,
        context_window: u64::try_from(row.get::<_, i64>(2)?).unwrap_or(0),
        created: row.get(3)?,
        active: row.get(4)?,
        pricing: TokenPricing {
            input: row.get(5)?,
            output: row.get(6)?,
        },
        metadata,
    }))
}
