mod schema;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, ValidationError};
use crate::models::Transaction;

const COLUMNS: &str = "id, date, description, amount, type, category";

/// Durable storage for the transaction ledger.
///
/// One connection is opened per process and held until the value is dropped.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Opens (or creates) the database file and makes sure the
    /// `transactions` table is usable. Every failure here is
    /// [`Error::StorageUnavailable`].
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::StorageUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        let conn = Connection::open(path).map_err(|e| unavailable(e.to_string()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| unavailable(format!("failed to set database pragmas: {e}")))?;
        let repo = Self { conn };
        repo.initialize().map_err(unavailable)?;
        info!(path = %path.display(), "transaction store opened");
        Ok(repo)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::StorageUnavailable {
            path: ":memory:".into(),
            reason: e.to_string(),
        })?;
        let repo = Self { conn };
        repo.initialize().map_err(|reason| Error::StorageUnavailable {
            path: ":memory:".into(),
            reason,
        })?;
        Ok(repo)
    }

    fn initialize(&self) -> std::result::Result<(), String> {
        self.conn
            .execute_batch(schema::CREATE_TABLE)
            .map_err(|e| format!("failed to create the transactions table: {e}"))?;

        let columns = self
            .table_columns()
            .map_err(|e| format!("failed to inspect the transactions table: {e}"))?;
        let missing: Vec<&str> = schema::REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !columns.iter().any(|have| have == c))
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "the transactions table is missing column(s): {}",
                missing.join(", ")
            ));
        }

        self.conn
            .execute_batch(schema::CREATE_INDEXES)
            .map_err(|e| format!("failed to create indexes: {e}"))
    }

    fn table_columns(&self) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(transactions)")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
        rows.collect()
    }

    // ── Writes ────────────────────────────────────────────────

    /// Stores a new transaction and returns it with its assigned ID. Any ID
    /// already on `txn` is ignored.
    pub fn create(&self, txn: &Transaction) -> Result<Transaction> {
        txn.validate()?;
        let real = amount_to_real(txn.amount)?;
        self.conn.execute(
            "INSERT INTO transactions (date, description, amount, type, category)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.date,
                txn.description,
                real,
                txn.kind,
                txn.category,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, description = %txn.description, "transaction created");
        // The amount as it reads back from the REAL column.
        Ok(Transaction {
            id: Some(id),
            amount: real_to_amount(real, 3)?,
            ..txn.clone()
        })
    }

    /// Overwrites every field of the row with `txn.id`.
    pub fn update(&self, txn: &Transaction) -> Result<()> {
        let id = txn.id.ok_or(ValidationError::MissingId)?;
        txn.validate()?;
        let changed = self.conn.execute(
            "UPDATE transactions
             SET date = ?1, description = ?2, amount = ?3, type = ?4, category = ?5
             WHERE id = ?6",
            params![
                txn.date,
                txn.description,
                amount_to_real(txn.amount)?,
                txn.kind,
                txn.category,
                id,
            ],
        )?;
        if changed == 0 {
            warn!(id, "update for unknown transaction");
            return Err(Error::NotFound(id));
        }
        info!(id, "transaction updated");
        Ok(())
    }

    /// Removes the row with `id`. Deleting an unknown ID is not an error.
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if changed == 0 {
            debug!(id, "delete matched no transaction");
        } else {
            info!(id, "transaction deleted");
        }
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────

    /// Every transaction, most recent date first. Rows sharing a date keep
    /// insertion order.
    ///
    /// A row whose date, amount or type cannot be read is skipped with a
    /// warning so one bad row does not hide the rest of the ledger.
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM transactions ORDER BY date DESC, id ASC"
        ))?;
        let rows = stmt.query_map([], row_to_transaction)?;
        let mut txns = Vec::new();
        for row in rows {
            match row {
                Ok(txn) => txns.push(txn),
                Err(
                    e @ (rusqlite::Error::FromSqlConversionFailure(..)
                    | rusqlite::Error::InvalidColumnType(..)),
                ) => warn!(error = %e, "skipping unreadable transaction row"),
                Err(e) => return Err(e.into()),
            }
        }
        debug!(count = txns.len(), "listed transactions");
        Ok(txns)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let txn = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM transactions WHERE id = ?1"),
                params![id],
                row_to_transaction,
            )
            .optional()?;
        debug!(id, found = txn.is_some(), "looked up transaction by ID");
        Ok(txn)
    }

    /// The most recent transaction whose description is exactly `description`,
    /// used to pre-fill a new entry from history.
    pub fn get_latest_by_description(&self, description: &str) -> Result<Option<Transaction>> {
        let txn = self
            .conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM transactions WHERE description = ?1
                     ORDER BY date DESC, id DESC LIMIT 1"
                ),
                params![description],
                row_to_transaction,
            )
            .optional()?;
        debug!(description, found = txn.is_some(), "looked up transaction by description");
        Ok(txn)
    }

    /// Distinct descriptions in ascending order.
    pub fn list_unique_descriptions(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT description FROM transactions ORDER BY description ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let real: f64 = row.get(3)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        description: row.get(2)?,
        amount: real_to_amount(real, 3)?,
        kind: row.get(4)?,
        category: row.get(5)?,
    })
}

fn real_to_amount(real: f64, column: usize) -> rusqlite::Result<Decimal> {
    Decimal::from_f64(real).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Real,
            format!("amount {real} is not a finite number").into(),
        )
    })
}

fn amount_to_real(amount: Decimal) -> rusqlite::Result<f64> {
    amount.to_f64().ok_or_else(|| {
        rusqlite::Error::ToSqlConversionFailure(
            format!("amount {amount} cannot be stored as REAL").into(),
        )
    })
}

#[cfg(test)]
mod tests;
