//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

/// A registered annotator account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl User {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })
    }
}

/// A label correction recorded against one video sequence.
///
/// `timestamp` is an RFC 3339 UTC string; it is refreshed on every upsert of
/// the same (patient, sequence) pair.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub patient_id: String,
    pub sequence_id: String,
    pub previous_label: String,
    pub updated_label: String,
    pub annotator: String,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            sequence_id: row.get(2)?,
            previous_label: row.get(3)?,
            updated_label: row.get(4)?,
            annotator: row.get(5)?,
            timestamp: row.get(6)?,
        })
    }
}
