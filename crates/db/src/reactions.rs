use portfolio_core::{ReactionTally, ReactionType};
use rusqlite::{OptionalExtension, params};

use crate::error::{DbError, Result};
use crate::{Db, now_rfc3339, to_u64};

impl Db {
    pub fn add_reaction(&self, project_id: &str, reaction: ReactionType) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            r#"
            INSERT INTO reaction (project_id, reaction_type, count, created_at, updated_at)
            VALUES (?1, ?2, 1, ?3, ?3)
            ON CONFLICT(project_id, reaction_type) DO UPDATE SET
              count = count + 1,
              updated_at = excluded.updated_at
            RETURNING count
            "#,
            params![project_id, reaction.as_str(), now_rfc3339()],
            |row| row.get(0),
        )?;
        to_u64(count, "reaction count")
    }

    /// Decrements a tally, never below zero. Missing tallies stay missing.
    pub fn remove_reaction(&self, project_id: &str, reaction: ReactionType) -> Result<u64> {
        let count: Option<i64> = self
            .conn
            .query_row(
                r#"
                UPDATE reaction
                SET count = CASE WHEN count > 0 THEN count - 1 ELSE 0 END,
                    updated_at = ?3
                WHERE project_id = ?1 AND reaction_type = ?2
                RETURNING count
                "#,
                params![project_id, reaction.as_str(), now_rfc3339()],
                |row| row.get(0),
            )
            .optional()?;
        count.map_or(Ok(0), |value| to_u64(value, "reaction count"))
    }

    pub fn reaction_count(&self, project_id: &str, reaction: ReactionType) -> Result<Option<u64>> {
        let count: Option<i64> = self
            .conn
            .query_row(
                "SELECT count FROM reaction WHERE project_id = ?1 AND reaction_type = ?2",
                params![project_id, reaction.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        count.map(|value| to_u64(value, "reaction count")).transpose()
    }

    pub fn project_reactions(&self, project_id: &str) -> Result<Vec<ReactionTally>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT project_id, reaction_type, count
            FROM reaction
            WHERE project_id = ?1
            ORDER BY count DESC, reaction_type ASC
            "#,
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;
        let mut tallies = Vec::new();
        for row in rows {
            let (project_id, reaction_type, count) = row?;
            tallies.push(to_tally(project_id, &reaction_type, count)?);
        }
        Ok(tallies)
    }

    pub fn all_reactions(&self) -> Result<Vec<ReactionTally>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT project_id, reaction_type, count
            FROM reaction
            ORDER BY project_id ASC, count DESC, reaction_type ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;
        let mut tallies = Vec::new();
        for row in rows {
            let (project_id, reaction_type, count) = row?;
            tallies.push(to_tally(project_id, &reaction_type, count)?);
        }
        Ok(tallies)
    }
}

fn to_tally(project_id: String, reaction_type: &str, count: i64) -> Result<ReactionTally> {
    let reaction_type = reaction_type
        .parse::<ReactionType>()
        .map_err(|err| DbError::Corrupt(err.to_string()))?;
    Ok(ReactionTally {
        project_id,
        reaction_type,
        count: to_u64(count, "reaction count")?,
    })
}
