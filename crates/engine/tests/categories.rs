use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    AddRecordCmd, CategoryUpdateOutcome, Engine, EngineError, EntryKind, NewCategoryCmd,
    UpdateCategoryCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn resolve_creates_user_and_seeds_defaults() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .resolve_user("openid-alice", Some("Alice"), Some("https://cdn/a.png"))
        .await
        .unwrap();
    assert_eq!(user.user_id, "openid-alice");
    assert_eq!(user.nick_name.as_deref(), Some("Alice"));
    assert_eq!(user.currency, "CNY");
    assert_eq!(user.status, 1);

    let categories = engine
        .list_categories("openid-alice", None, true)
        .await
        .unwrap();
    assert_eq!(categories.len(), 6);
    assert!(categories.iter().all(|c| c.is_preset && !c.is_hidden));

    let expense = categories
        .iter()
        .filter(|c| c.kind == EntryKind::Expense)
        .count();
    let income = categories
        .iter()
        .filter(|c| c.kind == EntryKind::Income)
        .count();
    assert_eq!((expense, income), (4, 2));
}

#[tokio::test]
async fn resolve_refreshes_profile_only_with_new_values() {
    let (engine, _db) = engine_with_db().await;

    engine
        .resolve_user("openid-alice", Some("Alice"), None)
        .await
        .unwrap();

    // Empty strings never overwrite, identical values change nothing.
    let user = engine
        .resolve_user("openid-alice", Some(""), Some("https://cdn/new.png"))
        .await
        .unwrap();
    assert_eq!(user.nick_name.as_deref(), Some("Alice"));
    assert_eq!(user.avatar_url.as_deref(), Some("https://cdn/new.png"));

    let user = engine
        .resolve_user("openid-alice", Some("Alicia"), None)
        .await
        .unwrap();
    assert_eq!(user.nick_name.as_deref(), Some("Alicia"));
}

#[tokio::test]
async fn resolve_reseeds_a_user_whose_categories_were_lost() {
    let (engine, db) = engine_with_db().await;

    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM categories WHERE user_id = ?",
        vec!["openid-alice".into()],
    ))
    .await
    .unwrap();

    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let categories = engine
        .list_categories("openid-alice", None, true)
        .await
        .unwrap();
    assert_eq!(categories.len(), 6);
}

#[tokio::test]
async fn hidden_categories_suppress_reseeding() {
    let (engine, _db) = engine_with_db().await;

    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let custom = engine
        .add_category(
            "openid-alice",
            NewCategoryCmd::new(EntryKind::Expense, "Coffee").hidden(true),
        )
        .await
        .unwrap();
    assert!(custom.is_hidden);

    // Hidden rows still count as categories, so no extra seeding happens.
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let categories = engine
        .list_categories("openid-alice", None, true)
        .await
        .unwrap();
    assert_eq!(categories.len(), 7);
}

#[tokio::test]
async fn duplicate_category_yields_conflict() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Expense, "Coffee"))
        .await
        .unwrap();
    let err = engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Expense, "Coffee"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Conflict("Coffee".to_string()));

    // Same name under the other kind is a different bucket.
    engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Income, "Coffee"))
        .await
        .unwrap();

    // The name is trimmed before the uniqueness check.
    let err = engine
        .add_category(
            "openid-alice",
            NewCategoryCmd::new(EntryKind::Expense, "  Coffee  "),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Conflict("Coffee".to_string()));
}

#[tokio::test]
async fn blank_category_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let err = engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Expense, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn seeding_twice_preserves_customizations_and_backfills_blanks() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let categories = engine
        .list_categories("openid-alice", Some(EntryKind::Expense), false)
        .await
        .unwrap();
    let dining = categories.iter().find(|c| c.name == "Dining").unwrap();
    let transport = categories.iter().find(|c| c.name == "Transport").unwrap();

    // Customize one color, blank out one icon.
    engine
        .update_category(
            "openid-alice",
            dining.id,
            UpdateCategoryCmd::new().color("#000000"),
        )
        .await
        .unwrap();
    engine
        .update_category(
            "openid-alice",
            transport.id,
            UpdateCategoryCmd::new().icon(""),
        )
        .await
        .unwrap();

    engine
        .seed_default_categories("openid-alice")
        .await
        .unwrap();
    engine
        .seed_default_categories("openid-alice")
        .await
        .unwrap();

    let categories = engine
        .list_categories("openid-alice", None, true)
        .await
        .unwrap();
    assert_eq!(categories.len(), 6);

    let dining = categories.iter().find(|c| c.name == "Dining").unwrap();
    assert_eq!(dining.color.as_deref(), Some("#000000"));

    let transport = categories.iter().find(|c| c.name == "Transport").unwrap();
    assert_eq!(transport.icon.as_deref(), Some("traffic"));
}

#[tokio::test]
async fn preset_deletion_is_rejected_and_custom_deletion_hides() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let categories = engine
        .list_categories("openid-alice", None, false)
        .await
        .unwrap();
    let preset = categories.iter().find(|c| c.is_preset).unwrap();
    let err = engine
        .delete_category("openid-alice", preset.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    let custom = engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Expense, "Coffee"))
        .await
        .unwrap();
    engine
        .delete_category("openid-alice", custom.id)
        .await
        .unwrap();

    let visible = engine
        .list_categories("openid-alice", None, false)
        .await
        .unwrap();
    assert!(visible.iter().all(|c| c.id != custom.id));

    let all = engine
        .list_categories("openid-alice", None, true)
        .await
        .unwrap();
    let hidden = all.iter().find(|c| c.id == custom.id).unwrap();
    assert!(hidden.is_hidden);
}

#[tokio::test]
async fn listing_orders_by_sort_then_newest_id() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let first = engine
        .add_category(
            "openid-alice",
            NewCategoryCmd::new(EntryKind::Expense, "Books").sort(50),
        )
        .await
        .unwrap();
    let second = engine
        .add_category(
            "openid-alice",
            NewCategoryCmd::new(EntryKind::Expense, "Games").sort(50),
        )
        .await
        .unwrap();

    let categories = engine
        .list_categories("openid-alice", Some(EntryKind::Expense), false)
        .await
        .unwrap();
    let books = categories.iter().position(|c| c.id == first.id).unwrap();
    let games = categories.iter().position(|c| c.id == second.id).unwrap();
    // Same sort weight: the newer id wins the tie.
    assert!(games < books);

    // Seeded Dining (sort 100) still leads.
    assert_eq!(categories[0].name, "Dining");
}

#[tokio::test]
async fn categories_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    engine
        .resolve_user("openid-bob", None, None)
        .await
        .unwrap();

    let category = engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Expense, "Coffee"))
        .await
        .unwrap();

    let err = engine
        .category("openid-bob", category.id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));

    let err = engine
        .update_category("openid-bob", category.id, UpdateCategoryCmd::new().sort(1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));
}

async fn category_with_records(engine: &Engine, user: &str, n: usize) -> i64 {
    let category = engine
        .add_category(user, NewCategoryCmd::new(EntryKind::Expense, "Dining out"))
        .await
        .unwrap();
    for i in 0..n {
        engine
            .add_record(
                user,
                AddRecordCmd::new(
                    EntryKind::Expense,
                    100 + i as i64,
                    category.id,
                    "2026-03-10 12:00:00",
                )
                .snapshot("Dining out"),
            )
            .await
            .unwrap();
    }
    category.id
}

#[tokio::test]
async fn rename_over_live_records_requires_confirmation() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let category_id = category_with_records(&engine, "openid-alice", 2).await;

    let outcome = engine
        .update_category(
            "openid-alice",
            category_id,
            UpdateCategoryCmd::new().name("Restaurants"),
        )
        .await
        .unwrap();

    match outcome {
        CategoryUpdateOutcome::NeedsConfirmation {
            affected_records,
            current,
            proposed,
        } => {
            assert_eq!(affected_records, 2);
            assert_eq!(current.name, "Dining out");
            assert_eq!(proposed.name, "Restaurants");
            assert_eq!(current.kind, EntryKind::Expense);
            assert_eq!(proposed.kind, EntryKind::Expense);
        }
        other => panic!("expected NeedsConfirmation, got {other:?}"),
    }

    // Nothing moved: the category and the snapshots are untouched.
    let category = engine
        .category("openid-alice", category_id)
        .await
        .unwrap();
    assert_eq!(category.name, "Dining out");

    let page = engine
        .list_records("openid-alice", &Default::default())
        .await
        .unwrap();
    assert!(
        page.records
            .iter()
            .all(|row| row.record.category_name_snapshot.as_deref() == Some("Dining out"))
    );
}

#[tokio::test]
async fn confirmed_rename_rewrites_every_snapshot() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let category_id = category_with_records(&engine, "openid-alice", 3).await;

    let outcome = engine
        .update_category(
            "openid-alice",
            category_id,
            UpdateCategoryCmd::new().name("Restaurants").confirm(true),
        )
        .await
        .unwrap();

    let category = match outcome {
        CategoryUpdateOutcome::Updated(category) => category,
        other => panic!("expected Updated, got {other:?}"),
    };
    assert_eq!(category.name, "Restaurants");

    let page = engine
        .list_records("openid-alice", &Default::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert!(
        page.records
            .iter()
            .all(|row| row.record.category_name_snapshot.as_deref() == Some("Restaurants"))
    );
}

#[tokio::test]
async fn confirmed_retype_rewrites_record_kinds() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let category_id = category_with_records(&engine, "openid-alice", 2).await;

    engine
        .update_category(
            "openid-alice",
            category_id,
            UpdateCategoryCmd::new().kind(EntryKind::Income).confirm(true),
        )
        .await
        .unwrap();

    let page = engine
        .list_records("openid-alice", &Default::default())
        .await
        .unwrap();
    assert!(
        page.records
            .iter()
            .all(|row| row.record.kind == EntryKind::Income)
    );
}

#[tokio::test]
async fn rename_without_records_applies_directly() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();

    let category = engine
        .add_category("openid-alice", NewCategoryCmd::new(EntryKind::Expense, "Coffee"))
        .await
        .unwrap();
    let outcome = engine
        .update_category(
            "openid-alice",
            category.id,
            UpdateCategoryCmd::new().name("Tea"),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, CategoryUpdateOutcome::Updated(c) if c.name == "Tea"));
}

#[tokio::test]
async fn non_key_edits_never_ask_for_confirmation() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let category_id = category_with_records(&engine, "openid-alice", 2).await;

    let outcome = engine
        .update_category(
            "openid-alice",
            category_id,
            UpdateCategoryCmd::new().color("#123456").sort(5),
        )
        .await
        .unwrap();

    let category = match outcome {
        CategoryUpdateOutcome::Updated(category) => category,
        other => panic!("expected Updated, got {other:?}"),
    };
    assert_eq!(category.color.as_deref(), Some("#123456"));
    assert_eq!(category.sort, 5);
}
