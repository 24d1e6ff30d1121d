mod support;

use portfolio_core::ReactionType;
use portfolio_db::Db;
use support::setup_db;

#[test]
fn add_and_remove_track_counts() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert_eq!(db.add_reaction("demo", ReactionType::Like).expect("add"), 1);
    assert_eq!(db.add_reaction("demo", ReactionType::Like).expect("add"), 2);
    assert_eq!(
        db.remove_reaction("demo", ReactionType::Like)
            .expect("remove"),
        1
    );
}

#[test]
fn remove_never_goes_below_zero() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert_eq!(
        db.remove_reaction("demo", ReactionType::Wow)
            .expect("remove missing"),
        0
    );

    db.add_reaction("demo", ReactionType::Wow).expect("add");
    db.remove_reaction("demo", ReactionType::Wow)
        .expect("remove");
    assert_eq!(
        db.remove_reaction("demo", ReactionType::Wow)
            .expect("remove at zero"),
        0
    );
    assert_eq!(
        db.reaction_count("demo", ReactionType::Wow).expect("count"),
        Some(0)
    );
}

#[test]
fn project_reactions_sorted_by_count() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.add_reaction("demo", ReactionType::Helpful).expect("add");
    for _ in 0..3 {
        db.add_reaction("demo", ReactionType::Love).expect("add");
    }
    db.add_reaction("other", ReactionType::Like).expect("add");

    let tallies = db.project_reactions("demo").expect("tallies");
    let kinds: Vec<ReactionType> = tallies.iter().map(|t| t.reaction_type).collect();
    assert_eq!(kinds, vec![ReactionType::Love, ReactionType::Helpful]);

    let all = db.all_reactions().expect("all");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].project_id, "demo");
    assert_eq!(all[2].project_id, "other");
}

#[test]
fn concurrent_adds_each_report_their_own_count() {
    let test_db = setup_db();
    let path = test_db.path.clone();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            std::thread::spawn(move || {
                let db = Db::open(&path).expect("open db");
                (0..10)
                    .map(|_| db.add_reaction("shared", ReactionType::Like).expect("add"))
                    .collect::<Vec<u64>>()
            })
        })
        .collect();
    let mut reported: Vec<u64> = handles
        .into_iter()
        .flat_map(|handle| handle.join().expect("join"))
        .collect();
    reported.sort_unstable();

    assert_eq!(reported, (1..=40).collect::<Vec<u64>>());
    assert_eq!(
        test_db
            .db
            .reaction_count("shared", ReactionType::Like)
            .expect("count"),
        Some(40)
    );
}
