use portfolio_core::ReactionType;
use rusqlite::params;

use crate::error::Result;
use crate::{Db, now_rfc3339};

const DEFAULT_ANALYTICS: &[(&str, i64, i64)] = &[("monte-carlo", 58, 42), ("BondTracker", 23, 18)];

const DEFAULT_REACTIONS: &[(&str, ReactionType, i64)] = &[
    ("monte-carlo", ReactionType::Like, 12),
    ("monte-carlo", ReactionType::Helpful, 8),
    ("monte-carlo", ReactionType::Insightful, 5),
    ("BondTracker", ReactionType::Like, 6),
    ("BondTracker", ReactionType::Helpful, 4),
];

impl Db {
    /// Inserts the demo counters. Existing rows are left untouched.
    pub fn seed_defaults(&mut self) -> Result<usize> {
        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        for (project_id, view_count, unique_visitors) in DEFAULT_ANALYTICS {
            inserted += tx.execute(
                r#"
                INSERT OR IGNORE INTO analytics
                  (project_id, view_count, unique_visitors, created_at, last_updated)
                VALUES (?1, ?2, ?3, ?4, ?4)
                "#,
                params![project_id, view_count, unique_visitors, now],
            )?;
        }
        for (project_id, reaction, count) in DEFAULT_REACTIONS {
            inserted += tx.execute(
                r#"
                INSERT OR IGNORE INTO reaction
                  (project_id, reaction_type, count, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?4)
                "#,
                params![project_id, reaction.as_str(), count, now],
            )?;
        }
        tx.commit()?;
        Ok(inserted)
    }
}
