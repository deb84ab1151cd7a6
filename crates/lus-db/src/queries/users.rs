//! User CRUD operations.

use rusqlite::Connection;

use lus_core::{Error, Result};

use crate::models::User;

/// Create a new user and return it.
pub fn create_user(conn: &Connection, username: &str, password_hash: &str) -> Result<User> {
    conn.execute(
        "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
        rusqlite::params![username, password_hash],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Conflict(format!("Username '{username}' already exists"))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(User {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
    })
}

/// Get a user by username.
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, username, password_hash FROM users WHERE username = ?1",
        [username],
        User::from_row,
    );
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all users ordered by id.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare("SELECT id, username, password_hash FROM users ORDER BY id ASC")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Update a user's password hash. Returns true if a row was updated.
pub fn update_password(conn: &Connection, id: i64, password_hash: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            rusqlite::params![password_hash, id],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a user by id. Returns true if a row was deleted.
pub fn delete_user(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM users WHERE id = ?1", [id])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, "alice", "hash").unwrap();
        assert_eq!(u.username, "alice");
        assert!(u.id > 0);

        let found = get_user_by_username(&conn, "alice").unwrap().unwrap();
        assert_eq!(found.id, u.id);
        assert_eq!(found.password_hash, "hash");
    }

    #[test]
    fn get_missing_user() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(get_user_by_username(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_user(&conn, "dup", "h1").unwrap();
        let err = create_user(&conn, "dup", "h2").unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn list_ordered_by_id() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_user(&conn, "first", "h").unwrap();
        create_user(&conn, "second", "h").unwrap();

        let users = list_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "first");
        assert_eq!(users[1].username, "second");
    }

    #[test]
    fn update_password_hash() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, "chg", "old").unwrap();
        assert!(update_password(&conn, u.id, "new").unwrap());

        let found = get_user_by_username(&conn, "chg").unwrap().unwrap();
        assert_eq!(found.password_hash, "new");
    }

    #[test]
    fn update_password_missing_user() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(!update_password(&conn, 999, "new").unwrap());
    }

    #[test]
    fn delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, "del", "h").unwrap();
        assert!(delete_user(&conn, u.id).unwrap());
        assert!(get_user_by_username(&conn, "del").unwrap().is_none());
        assert!(!delete_user(&conn, u.id).unwrap());
    }
}
