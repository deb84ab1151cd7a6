//! Correction-history queries.
//!
//! Writes go through [`upsert_history`]: one row per (patient, sequence)
//! pair, updated in place with a refreshed timestamp when the pair already
//! exists. The UNIQUE constraint on the pair is a backstop; the upsert never
//! relies on constraint rejection.

use chrono::Utc;
use rusqlite::Connection;

use lus_core::{Error, Result};

use crate::models::HistoryEntry;

const COLUMNS: &str =
    "id, patient_id, sequence_id, previous_label, updated_label, annotator, timestamp";

/// List history entries, newest first, optionally filtered by annotator.
pub fn list_history(conn: &Connection, annotator: Option<&str>) -> Result<Vec<HistoryEntry>> {
    match annotator {
        Some(annotator) => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM history_entries
                     WHERE annotator = ?1
                     ORDER BY timestamp DESC, id DESC"
                ))
                .map_err(|e| Error::database(e.to_string()))?;
            let rows = stmt
                .query_map([annotator], HistoryEntry::from_row)
                .map_err(|e| Error::database(e.to_string()))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::database(e.to_string()))?;
            Ok(rows)
        }
        None => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM history_entries ORDER BY timestamp DESC, id DESC"
                ))
                .map_err(|e| Error::database(e.to_string()))?;
            let rows = stmt
                .query_map([], HistoryEntry::from_row)
                .map_err(|e| Error::database(e.to_string()))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::database(e.to_string()))?;
            Ok(rows)
        }
    }
}

/// Insert a correction, or update the existing row for the same
/// (patient, sequence) pair. The timestamp is refreshed either way.
///
/// Runs select-then-write inside a single transaction so the uniqueness
/// invariant holds without depending on the constraint to reject.
pub fn upsert_history(
    conn: &Connection,
    patient_id: &str,
    sequence_id: &str,
    previous_label: &str,
    updated_label: &str,
    annotator: &str,
) -> Result<HistoryEntry> {
    let timestamp = Utc::now().to_rfc3339();

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    let existing: Option<i64> = match tx.query_row(
        "SELECT id FROM history_entries WHERE patient_id = ?1 AND sequence_id = ?2",
        rusqlite::params![patient_id, sequence_id],
        |row| row.get(0),
    ) {
        Ok(id) => Some(id),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(Error::database(e.to_string())),
    };

    let id = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE history_entries
                 SET previous_label = ?1, updated_label = ?2, annotator = ?3, timestamp = ?4
                 WHERE id = ?5",
                rusqlite::params![previous_label, updated_label, annotator, timestamp, id],
            )
            .map_err(|e| Error::database(e.to_string()))?;
            id
        }
        None => {
            tx.execute(
                "INSERT INTO history_entries
                 (patient_id, sequence_id, previous_label, updated_label, annotator, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    patient_id,
                    sequence_id,
                    previous_label,
                    updated_label,
                    annotator,
                    timestamp
                ],
            )
            .map_err(|e| Error::database(e.to_string()))?;
            tx.last_insert_rowid()
        }
    };

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(HistoryEntry {
        id,
        patient_id: patient_id.to_string(),
        sequence_id: sequence_id.to_string(),
        previous_label: previous_label.to_string(),
        updated_label: updated_label.to_string(),
        annotator: annotator.to_string(),
        timestamp,
    })
}

/// Delete a history entry by id. Returns true if a row was deleted.
pub fn delete_history(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM history_entries WHERE id = ?1", [id])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
