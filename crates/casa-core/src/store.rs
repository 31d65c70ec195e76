use crate::model::{Property, PropertySummary};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local store has not been initialized")]
    Uninitialized,
    #[error("local store I/O failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create store directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable mirror of the property collection, backed by SQLite.
///
/// The connection is an explicitly owned resource with an
/// `initialize`/`close` lifecycle; every operation before `initialize`
/// completes fails with [`StoreError::Uninitialized`].
pub struct LocalStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl LocalStore {
    /// Create a handle for the database at `path`. No I/O happens until
    /// [`initialize`](Self::initialize) is called.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: None,
        }
    }

    /// Open the backing file and ensure the schema exists. Idempotent:
    /// repeat calls re-assert the journal pragma and leave the schema alone.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        if let Some(conn) = &self.conn {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS properties (
                id INTEGER PRIMARY KEY,
                date TEXT,
                type TEXT,
                address TEXT,
                bedrooms INTEGER,
                bathrooms INTEGER,
                price REAL,
                area REAL,
                notes TEXT
            );",
        )?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Drop the connection. Subsequent operations fail until the store is
    /// initialized again.
    pub fn close(&mut self) {
        self.conn = None;
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Uninitialized)
    }

    /// Every cached row, order unspecified.
    pub fn get_all(&self) -> Result<Vec<Property>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, type, address, bedrooms, bathrooms, price, area, notes
             FROM properties",
        )?;
        let rows = stmt.query_map([], row_to_property)?;
        let mut properties = Vec::new();
        for row in rows {
            properties.push(row?);
        }
        Ok(properties)
    }

    /// Point lookup by id. Absent is `Ok(None)`, not an error.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Property>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, type, address, bedrooms, bathrooms, price, area, notes
             FROM properties WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], row_to_property)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Destructive full resync: delete every row, then insert each given
    /// record, all inside one transaction so concurrent readers never see a
    /// half-cleared table.
    pub fn replace_all(&mut self, records: &[Property]) -> Result<(), StoreError> {
        let conn = self.conn.as_mut().ok_or(StoreError::Uninitialized)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM properties", [])?;
        for p in records {
            tx.execute(
                "INSERT INTO properties (id, date, type, address, bedrooms, bathrooms, price, area, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    p.id, p.date, p.kind, p.address, p.bedrooms, p.bathrooms, p.price, p.area,
                    p.notes
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Destructive resync from summaries only: detail columns are left NULL.
    /// A previously cached full row for the same id is gone afterwards.
    pub fn replace_with_summaries(
        &mut self,
        summaries: &[PropertySummary],
    ) -> Result<(), StoreError> {
        let conn = self.conn.as_mut().ok_or(StoreError::Uninitialized)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM properties", [])?;
        for s in summaries {
            tx.execute(
                "INSERT INTO properties (id, address) VALUES (?1, ?2)",
                params![s.id, s.address],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert-or-update keyed by id; an update replaces every column.
    pub fn upsert(&self, p: &Property) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO properties (id, date, type, address, bedrooms, bathrooms, price, area, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                type = excluded.type,
                address = excluded.address,
                bedrooms = excluded.bedrooms,
                bathrooms = excluded.bathrooms,
                price = excluded.price,
                area = excluded.area,
                notes = excluded.notes",
            params![
                p.id, p.date, p.kind, p.address, p.bedrooms, p.bathrooms, p.price, p.area, p.notes
            ],
        )?;
        Ok(())
    }
}

/// Summary-only rows carry NULL detail columns; they hydrate with neutral
/// defaults so list content is interchangeable with full records.
fn row_to_property(row: &Row<'_>) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(0)?,
        date: row
            .get::<_, Option<NaiveDate>>(1)?
            .unwrap_or_default(),
        kind: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        address: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        bedrooms: row.get::<_, Option<u32>>(4)?.unwrap_or_default(),
        bathrooms: row.get::<_, Option<u32>>(5)?.unwrap_or_default(),
        price: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
        area: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
        notes: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
    })
}
