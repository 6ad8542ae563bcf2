//! A bill store backed by SQLite, with proof files saved to a directory on disk.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{Connection, Row};

use crate::{database_id::BillId, endpoints};

use super::{
    core::{BillRecord, BillStatus, BillUpdate, NewProof},
    store::{BillStore, StoreError},
};

const BILL_COLUMNS: &str =
    "id, email, type, name, date, amount, vat, pct, commentary, file_url, file_name, status";

/// Stores bills in the `bill` table and proof files in `proof_dir`.
///
/// Proof files are saved as `<bill id>-<file name>` and are expected to be
/// served under [endpoints::PROOFS].
#[derive(Debug, Clone)]
pub struct SqliteBillStore {
    connection: Arc<Mutex<Connection>>,
    proof_dir: PathBuf,
}

impl SqliteBillStore {
    /// Create a store using `connection`, saving proof files to `proof_dir`.
    ///
    /// The `bill` table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>, proof_dir: impl Into<PathBuf>) -> Self {
        Self {
            connection,
            proof_dir: proof_dir.into(),
        }
    }

    /// The directory proof files are saved to.
    pub fn proof_dir(&self) -> &Path {
        &self.proof_dir
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StoreError::Internal("could not acquire the database lock".to_owned())
        })
    }
}

#[async_trait]
impl BillStore for SqliteBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let connection = self.lock()?;

        connection
            .prepare(&format!("SELECT {BILL_COLUMNS} FROM bill ORDER BY id"))?
            .query_map([], map_bill_row)?
            .map(|maybe_bill| maybe_bill.map_err(StoreError::from))
            .collect()
    }

    async fn create(&self, proof: NewProof) -> Result<BillRecord, StoreError> {
        let connection = self.lock()?;
        // Dropping the transaction without committing rolls back the insert.
        let tx = connection.unchecked_transaction()?;

        let id: BillId = tx.query_row(
            "INSERT INTO bill (email, status) VALUES (?1, ?2) RETURNING id",
            (&proof.email, BillStatus::Pending.as_str()),
            |row| row.get(0),
        )?;

        let file_name = sanitize_file_name(&proof.file.file_name);
        let stored_name = format!("{id}-{file_name}");
        let proof_path = self.proof_dir.join(&stored_name);
        let file_url = format!("{}/{stored_name}", endpoints::PROOFS);

        let saved = fs::create_dir_all(&self.proof_dir)
            .and_then(|()| fs::write(&proof_path, &proof.file.bytes))
            .map_err(StoreError::from)
            .and_then(|()| {
                tracing::debug!(
                    "Saved proof '{}' for bill {id} ({} bytes)",
                    stored_name,
                    proof.file.bytes.len()
                );

                let bill = tx.query_row(
                    &format!(
                        "UPDATE bill SET file_url = ?1, file_name = ?2 WHERE id = ?3 RETURNING {BILL_COLUMNS}"
                    ),
                    (file_url, file_name, id),
                    map_bill_row,
                )?;

                tx.commit()?;

                Ok(bill)
            });

        if saved.is_err() {
            remove_orphaned_proof(&proof_path);
        }

        saved
    }

    async fn update(&self, id: BillId, update: BillUpdate) -> Result<BillRecord, StoreError> {
        let connection = self.lock()?;

        let bill = connection.query_row(
            &format!(
                "UPDATE bill
                 SET type = ?1, name = ?2, date = ?3, amount = ?4, vat = ?5, pct = ?6,
                     commentary = ?7, status = ?8
                 WHERE id = ?9
                 RETURNING {BILL_COLUMNS}"
            ),
            (
                update.bill_type.as_str(),
                &update.name,
                update.date,
                update.amount,
                update.vat,
                update.pct,
                &update.commentary,
                update.status.as_str(),
                id,
            ),
            map_bill_row,
        )?;

        Ok(bill)
    }
}

/// Delete a proof file whose bill was rolled back.
fn remove_orphaned_proof(proof_path: &Path) {
    match fs::remove_file(proof_path) {
        Ok(()) => tracing::debug!("Removed orphaned proof {}", proof_path.display()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => tracing::error!(
            "could not remove orphaned proof {}: {error}",
            proof_path.display()
        ),
    }
}

/// Reduce a browser-supplied file name to a name that is safe to use on disk and in a URL.
///
/// Directory components are dropped and any character other than ASCII
/// letters, digits, '.', '-' and '_' is replaced with '_'.
fn sanitize_file_name(file_name: &str) -> String {
    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let sanitized: String = base_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        "proof".to_owned()
    } else {
        sanitized
    }
}

/// Create the bill table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_bill_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bill (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                type TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL DEFAULT '',
                amount REAL NOT NULL DEFAULT 0,
                vat REAL,
                pct INTEGER NOT NULL DEFAULT 20,
                commentary TEXT NOT NULL DEFAULT '',
                file_url TEXT,
                file_name TEXT,
                status TEXT NOT NULL DEFAULT 'pending'
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_bill_email ON bill(email);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [BillRecord].
fn map_bill_row(row: &Row) -> Result<BillRecord, rusqlite::Error> {
    Ok(BillRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        bill_type: row.get(2)?,
        name: row.get(3)?,
        date: row.get(4)?,
        amount: row.get(5)?,
        vat: row.get(6)?,
        pct: row.get(7)?,
        commentary: row.get(8)?,
        file_url: row.get(9)?,
        file_name: row.get(10)?,
        status: row.get(11)?,
    })
}
