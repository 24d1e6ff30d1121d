use portfolio_core::{AnalyticsRecord, ViewCounts};
use rusqlite::{OptionalExtension, Row, TransactionBehavior, params};

use crate::error::Result;
use crate::types::NewPageView;
use crate::{Db, to_u64};

impl Db {
    /// Counters for a project; zeros when nothing was recorded yet.
    pub fn view_counts(&self, project_id: &str) -> Result<ViewCounts> {
        Ok(self
            .analytics_record(project_id)?
            .map(|record| record.counts())
            .unwrap_or_default())
    }

    pub fn analytics_record(&self, project_id: &str) -> Result<Option<AnalyticsRecord>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT project_id, view_count, unique_visitors, last_updated
                FROM analytics
                WHERE project_id = ?1
                "#,
                params![project_id],
                read_raw_record,
            )
            .optional()?;
        row.map(RawRecord::into_record).transpose()
    }

    /// All tracked projects, most viewed first.
    pub fn analytics_summary(&self) -> Result<Vec<AnalyticsRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT project_id, view_count, unique_visitors, last_updated
            FROM analytics
            ORDER BY view_count DESC, project_id ASC
            "#,
        )?;
        let rows = stmt.query_map([], read_raw_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    /// Appends a page view and bumps the project's counters in one
    /// IMMEDIATE transaction, so the uniqueness check sees every committed
    /// insert for the same `(project_id, ip_hash)` pair.
    pub fn record_view(&mut self, view: &NewPageView) -> Result<ViewCounts> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            r#"
            INSERT INTO page_view (project_id, ip_hash, user_agent, referrer, ts)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                view.project_id,
                view.ip_hash,
                view.user_agent,
                view.referrer,
                view.ts
            ],
        )?;
        let seen: i64 = tx.query_row(
            "SELECT COUNT(*) FROM page_view WHERE project_id = ?1 AND ip_hash = ?2",
            params![view.project_id, view.ip_hash],
            |row| row.get(0),
        )?;
        let unique_increment = i64::from(seen == 1);
        tx.execute(
            r#"
            INSERT INTO analytics (project_id, view_count, unique_visitors, created_at, last_updated)
            VALUES (?1, 1, ?2, ?3, ?3)
            ON CONFLICT(project_id) DO UPDATE SET
              view_count = view_count + 1,
              unique_visitors = unique_visitors + excluded.unique_visitors,
              last_updated = excluded.last_updated
            "#,
            params![view.project_id, unique_increment, view.ts],
        )?;
        let (view_count, unique_visitors): (i64, i64) = tx.query_row(
            "SELECT view_count, unique_visitors FROM analytics WHERE project_id = ?1",
            params![view.project_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        tx.commit()?;
        Ok(ViewCounts {
            view_count: to_u64(view_count, "view_count")?,
            unique_visitors: to_u64(unique_visitors, "unique_visitors")?,
        })
    }

    pub fn page_view_count(&self, project_id: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM page_view WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        to_u64(count, "page_view count")
    }
}

struct RawRecord {
    project_id: String,
    view_count: i64,
    unique_visitors: i64,
    last_updated: String,
}

impl RawRecord {
    fn into_record(self) -> Result<AnalyticsRecord> {
        Ok(AnalyticsRecord {
            project_id: self.project_id,
            view_count: to_u64(self.view_count, "view_count")?,
            unique_visitors: to_u64(self.unique_visitors, "unique_visitors")?,
            last_updated: self.last_updated,
        })
    }
}

fn read_raw_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        project_id: row.get(0)?,
        view_count: row.get(1)?,
        unique_visitors: row.get(2)?,
        last_updated: row.get(3)?,
    })
}
