use crate::storage::CacheStorage;
use crate::{CacheError, Result};
use hypernet_core::{Request, Response, ResponseKind};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Cache storage on SQLite
///
/// Survives restarts, which is the whole point of an offline cache.
pub struct SqliteCacheStorage {
    conn: Mutex<Connection>,
}

impl SqliteCacheStorage {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS caches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                cache_name TEXT NOT NULL,
                request_key TEXT NOT NULL,
                status INTEGER NOT NULL,
                status_text TEXT NOT NULL,
                headers TEXT NOT NULL,
                body BLOB NOT NULL,
                kind TEXT NOT NULL,
                cached_at INTEGER NOT NULL,
                PRIMARY KEY (cache_name, request_key)
            )",
            [],
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Unavailable("sqlite cache lock poisoned".into()))
    }

    fn ensure_cache(conn: &Connection, name: &str) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
            params![name, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

impl CacheStorage for SqliteCacheStorage {
    fn open(&self, name: &str) -> Result<()> {
        let conn = self.conn()?;
        Self::ensure_cache(&conn, name)
    }

    fn has(&self, name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row("SELECT id FROM caches WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM cache_entries WHERE cache_name = ?1", params![name])?;
        let removed = tx.execute("DELETE FROM caches WHERE name = ?1", params![name])?;
        tx.commit()?;

        if removed > 0 {
            debug!("Deleted cache {}", name);
        }
        Ok(removed > 0)
    }

    fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT status, status_text, headers, body, kind FROM cache_entries
                 WHERE cache_name = ?1 AND request_key = ?2",
                params![name, request.cache_key()],
                |row| {
                    Ok((
                        row.get::<_, u16>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Vec<u8>>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((status, status_text, headers, body, kind)) = row else {
            return Ok(None);
        };

        let headers: Vec<(String, String)> = serde_json::from_str(&headers)?;
        let kind = ResponseKind::parse(&kind)
            .ok_or_else(|| CacheError::Corrupt(format!("unknown response kind '{}'", kind)))?;

        Ok(Some(Response {
            status,
            status_text,
            headers,
            body,
            kind,
        }))
    }

    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<()> {
        let conn = self.conn()?;
        Self::ensure_cache(&conn, name)?;

        conn.execute(
            "INSERT OR REPLACE INTO cache_entries
                (cache_name, request_key, status, status_text, headers, body, kind, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                name,
                request.cache_key(),
                response.status,
                response.status_text,
                serde_json::to_string(&response.headers)?,
                response.body,
                response.kind.as_str(),
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }

    fn entries(&self, name: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT request_key FROM cache_entries WHERE cache_name = ?1 ORDER BY request_key",
        )?;
        let keys = stmt
            .query_map(params![name], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn get(path: &str) -> Request {
        Request::get(Url::parse("https://hypernet.unity").unwrap().join(path).unwrap())
    }

    #[test]
    fn test_round_trip_keeps_headers_and_kind() {
        let storage = SqliteCacheStorage::in_memory().unwrap();
        let response = Response::new(200, b"\x89PNG".to_vec())
            .with_header("Content-Type", "image/png")
            .with_kind(ResponseKind::Basic);

        storage.put("hypernet-v1", &get("/assets/icon.png"), &response).unwrap();
        let hit = storage
            .match_request("hypernet-v1", &get("/assets/icon.png"))
            .unwrap()
            .unwrap();

        assert_eq!(hit, response);
        assert_eq!(hit.header("content-type"), Some("image/png"));
    }

    #[test]
    fn test_delete_drops_entries() {
        let storage = SqliteCacheStorage::in_memory().unwrap();
        storage.put("old", &get("/"), &Response::new(200, "old")).unwrap();
        storage.put("new", &get("/"), &Response::new(200, "new")).unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["old", "new"]);
        assert!(storage.delete("old").unwrap());
        assert!(storage.match_request("old", &get("/")).unwrap().is_none());
        assert!(storage.entries("old").unwrap().is_empty());
        assert_eq!(storage.match_request("new", &get("/")).unwrap().unwrap().text(), "new");

        // re-creating a dropped cache starts empty
        storage.open("old").unwrap();
        assert!(storage.match_request("old", &get("/")).unwrap().is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        SqliteCacheStorage::new(&path)
            .unwrap()
            .put("hypernet-v1", &get("/index.html"), &Response::new(200, "<html>"))
            .unwrap();

        let reopened = SqliteCacheStorage::new(&path).unwrap();
        assert!(reopened.has("hypernet-v1").unwrap());
        assert_eq!(
            reopened.entries("hypernet-v1").unwrap(),
            vec!["GET https://hypernet.unity/index.html"]
        );
    }
}
