mod support;

use portfolio_core::ReactionType;
use portfolio_db::Db;
use support::setup_db;

#[test]
fn migrate_is_idempotent() {
    let mut test_db = setup_db();
    test_db.db.migrate().expect("second migrate");
    let mut reopened = Db::open(&test_db.path).expect("reopen");
    reopened.migrate().expect("migrate reopened");
}

#[test]
fn seed_defaults_inserts_once() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    assert_eq!(db.seed_defaults().expect("seed"), 7);
    assert_eq!(db.seed_defaults().expect("reseed"), 0);

    let counts = db.view_counts("monte-carlo").expect("counts");
    assert_eq!(counts.view_count, 58);
    assert_eq!(counts.unique_visitors, 42);
    assert_eq!(
        db.reaction_count("BondTracker", ReactionType::Helpful)
            .expect("count"),
        Some(4)
    );
}

#[test]
fn visitor_salt_first_writer_wins() {
    let test_db = setup_db();
    let first = test_db
        .db
        .visitor_salt_or_insert("first")
        .expect("salt");
    let second = test_db
        .db
        .visitor_salt_or_insert("second")
        .expect("salt");
    assert_eq!(first, "first");
    assert_eq!(second, "first");
}

#[test]
fn in_memory_db_migrates() {
    let mut db = Db::open_in_memory().expect("open");
    db.migrate().expect("migrate");
    assert_eq!(db.analytics_summary().expect("summary").len(), 0);
}
