use rusqlite::params;

use crate::Db;
use crate::error::Result;

const VISITOR_SALT_KEY: &str = "visitor_salt";

impl Db {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    /// Returns the stored visitor salt, storing `candidate` if none exists yet.
    /// The first writer wins, so concurrent callers agree on one salt.
    pub fn visitor_salt_or_insert(&self, candidate: &str) -> Result<String> {
        self.conn.execute(
            "INSERT OR IGNORE INTO app_setting (key, value) VALUES (?1, ?2)",
            params![VISITOR_SALT_KEY, candidate],
        )?;
        Ok(self
            .get_setting(VISITOR_SALT_KEY)?
            .unwrap_or_else(|| candidate.to_string()))
    }
}
