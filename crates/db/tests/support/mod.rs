#![allow(dead_code)]

use std::path::PathBuf;

use portfolio_db::{Db, NewPageView};
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn make_view(project_id: &str, ip_hash: &str, ts: &str) -> NewPageView {
    NewPageView {
        project_id: project_id.to_string(),
        ip_hash: ip_hash.to_string(),
        user_agent: "test-agent".to_string(),
        referrer: String::new(),
        ts: ts.to_string(),
    }
}
