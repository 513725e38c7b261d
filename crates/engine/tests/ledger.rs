use sea_orm::{Database, DatabaseConnection};

use engine::{
    AddRecordCmd, Engine, EngineError, EntryKind, NewCategoryCmd, NewReceipt, RecordListFilter,
    UpdateRecordCmd,
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

/// Resolves the user and returns a seeded expense category id.
async fn user_with_category(engine: &Engine, user: &str) -> i64 {
    engine.resolve_user(user, None, None).await.unwrap();
    let categories = engine
        .list_categories(user, Some(EntryKind::Expense), false)
        .await
        .unwrap();
    categories[0].id
}

#[tokio::test]
async fn add_and_fetch_a_record() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    let record = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 1250, category_id, "2026-02-13 12:00:00")
                .note("lunch")
                .snapshot("Dining"),
        )
        .await
        .unwrap();

    assert_eq!(record.amount_minor, 1250);
    assert_eq!(record.kind, EntryKind::Expense);
    assert_eq!(record.category_name_snapshot.as_deref(), Some("Dining"));
    assert_eq!(
        record.occur_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2026-02-13 12:00:00"
    );

    let fetched = engine
        .record("openid-alice", record.id, false)
        .await
        .unwrap();
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn occur_at_accepts_every_documented_shape() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    for occur_at in ["2026-02-13 12:00:00", "2026-02-13", "2026-02-13T12:00:00Z"] {
        engine
            .add_record(
                "openid-alice",
                AddRecordCmd::new(EntryKind::Expense, 100, category_id, occur_at),
            )
            .await
            .unwrap();
    }

    let err = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 100, category_id, "13/02/2026"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFormat(_)));
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    let err = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, -1, category_id, "2026-02-13"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn receipts_persist_with_their_record() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    let record = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 4200, category_id, "2026-02-13")
                .receipt(NewReceipt {
                    file_id: "cloud://r1.jpg".to_string(),
                    mime: Some("image/jpeg".to_string()),
                    size_bytes: 48213,
                })
                .receipt(NewReceipt {
                    file_id: "   ".to_string(),
                    mime: None,
                    size_bytes: 0,
                })
                .receipt(NewReceipt {
                    file_id: "cloud://r2.png".to_string(),
                    mime: Some("image/png".to_string()),
                    size_bytes: 1024,
                }),
        )
        .await
        .unwrap();

    // The blank file reference was dropped, the rest landed atomically.
    let receipts = engine
        .record_receipts("openid-alice", record.id)
        .await
        .unwrap();
    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[0].file_id, "cloud://r1.jpg");
    assert_eq!(receipts[1].file_id, "cloud://r2.png");

    // Hiding the record leaves the receipts attached.
    engine
        .delete_record("openid-alice", record.id)
        .await
        .unwrap();
    let receipts = engine
        .record_receipts("openid-alice", record.id)
        .await
        .unwrap();
    assert_eq!(receipts.len(), 2);
}

#[tokio::test]
async fn soft_delete_restore_round_trip() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    let record = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 900, category_id, "2026-02-13 08:30:00")
                .note("breakfast"),
        )
        .await
        .unwrap();

    engine
        .delete_record("openid-alice", record.id)
        .await
        .unwrap();

    // Default scope no longer resolves it, the hidden scope does.
    let err = engine
        .record("openid-alice", record.id, false)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("record".to_string()));
    let hidden = engine
        .record("openid-alice", record.id, true)
        .await
        .unwrap();
    assert!(hidden.is_hidden);

    // Gone from the normal list, present in the trash view.
    let page = engine
        .list_records("openid-alice", &RecordListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    let trash = engine
        .list_records(
            "openid-alice",
            &RecordListFilter {
                only_hidden: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(trash.total, 1);

    engine
        .restore_record("openid-alice", record.id)
        .await
        .unwrap();
    let restored = engine
        .record("openid-alice", record.id, false)
        .await
        .unwrap();

    // Identical to the pre-delete state apart from the hidden flag flip
    // (and the row's own update timestamp).
    assert!(!restored.is_hidden);
    assert_eq!(restored.id, record.id);
    assert_eq!(restored.kind, record.kind);
    assert_eq!(restored.amount_minor, record.amount_minor);
    assert_eq!(restored.category_id, record.category_id);
    assert_eq!(restored.note, record.note);
    assert_eq!(restored.occur_at, record.occur_at);
    assert_eq!(restored.created_at, record.created_at);
}

#[tokio::test]
async fn hidden_records_cannot_be_edited() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    let record = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 900, category_id, "2026-02-13"),
        )
        .await
        .unwrap();
    engine
        .delete_record("openid-alice", record.id)
        .await
        .unwrap();

    let err = engine
        .update_record(
            "openid-alice",
            record.id,
            UpdateRecordCmd::new().amount_minor(1000),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("record".to_string()));

    engine
        .restore_record("openid-alice", record.id)
        .await
        .unwrap();
    let updated = engine
        .update_record(
            "openid-alice",
            record.id,
            UpdateRecordCmd::new().amount_minor(1000),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 1000);
}

#[tokio::test]
async fn updates_touch_only_the_provided_fields() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    let record = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 900, category_id, "2026-02-13 08:30:00")
                .note("breakfast")
                .snapshot("Dining"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_record(
            "openid-alice",
            record.id,
            UpdateRecordCmd::new().note("brunch").occur_at("2026-02-13T10:00:00Z"),
        )
        .await
        .unwrap();

    assert_eq!(updated.note.as_deref(), Some("brunch"));
    assert_eq!(
        updated.occur_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2026-02-13 10:00:00"
    );
    assert_eq!(updated.amount_minor, 900);
    assert_eq!(updated.kind, EntryKind::Expense);
    assert_eq!(updated.category_name_snapshot.as_deref(), Some("Dining"));
}

#[tokio::test]
async fn listing_paginates_with_a_full_set_total() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    for day in 1..=25 {
        engine
            .add_record(
                "openid-alice",
                AddRecordCmd::new(
                    EntryKind::Expense,
                    day,
                    category_id,
                    format!("2026-03-{day:02} 09:00:00"),
                ),
            )
            .await
            .unwrap();
    }

    let filter = RecordListFilter {
        month: Some("2026-03".to_string()),
        ..Default::default()
    };
    let page = engine.list_records("openid-alice", &filter).await.unwrap();
    assert_eq!(page.records.len(), 20);
    assert_eq!(page.total, 25);

    // Newest occurrence first.
    assert_eq!(page.records[0].record.amount_minor, 25);

    let filter = RecordListFilter {
        month: Some("2026-03".to_string()),
        page: 2,
        ..Default::default()
    };
    let page = engine.list_records("openid-alice", &filter).await.unwrap();
    assert_eq!(page.records.len(), 5);
    assert_eq!(page.total, 25);
}

#[tokio::test]
async fn day_filter_wins_over_month() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 1, category_id, "2026-03-10 09:00:00"),
        )
        .await
        .unwrap();
    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 2, category_id, "2026-03-11 09:00:00"),
        )
        .await
        .unwrap();

    let filter = RecordListFilter {
        month: Some("2026-03".to_string()),
        day: Some("2026-03-10".to_string()),
        ..Default::default()
    };
    let page = engine.list_records("openid-alice", &filter).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].record.amount_minor, 1);
}

#[tokio::test]
async fn listing_joins_category_color_without_dropping_rows() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    engine
        .resolve_user("openid-bob", None, None)
        .await
        .unwrap();

    let own = engine
        .add_category(
            "openid-alice",
            NewCategoryCmd::new(EntryKind::Expense, "Coffee").color("#112233"),
        )
        .await
        .unwrap();
    let foreign = engine
        .list_categories("openid-bob", Some(EntryKind::Expense), false)
        .await
        .unwrap()[0]
        .id;

    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 100, own.id, "2026-03-10 09:00:00"),
        )
        .await
        .unwrap();
    // Points at someone else's category: listed anyway, color comes up null.
    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 200, foreign, "2026-03-10 10:00:00"),
        )
        .await
        .unwrap();

    let page = engine
        .list_records("openid-alice", &RecordListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.records[0].category_color, None);
    assert_eq!(page.records[1].category_color.as_deref(), Some("#112233"));
}

#[tokio::test]
async fn day_summary_skips_hidden_records() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let expense_id = engine
        .list_categories("openid-alice", Some(EntryKind::Expense), false)
        .await
        .unwrap()[0]
        .id;
    let income_id = engine
        .list_categories("openid-alice", Some(EntryKind::Income), false)
        .await
        .unwrap()[0]
        .id;

    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Income, 1000, income_id, "2026-02-13 09:00:00"),
        )
        .await
        .unwrap();
    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 300, expense_id, "2026-02-13 12:00:00"),
        )
        .await
        .unwrap();
    let hidden = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Income, 5000, income_id, "2026-02-13 18:00:00"),
        )
        .await
        .unwrap();
    engine
        .delete_record("openid-alice", hidden.id)
        .await
        .unwrap();

    let summary = engine
        .day_summary("openid-alice", "2026-02-13")
        .await
        .unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.income_minor, 1000);
    assert_eq!(summary.expense_minor, 300);
    assert_eq!(summary.net_minor, 700);
}

#[tokio::test]
async fn month_summary_window_is_half_open_and_wraps_december() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;

    for occur_at in [
        "2025-12-01 00:00:00",
        "2025-12-31 23:59:59",
        "2026-01-01 00:00:00",
    ] {
        engine
            .add_record(
                "openid-alice",
                AddRecordCmd::new(EntryKind::Expense, 100, category_id, occur_at),
            )
            .await
            .unwrap();
    }

    let summary = engine
        .month_summary("openid-alice", "2025-12")
        .await
        .unwrap();
    assert_eq!(summary.expense_minor, 200);
    assert_eq!(summary.income_minor, 0);
    assert_eq!(summary.balance_minor, -200);
}

#[tokio::test]
async fn record_kind_is_authoritative_for_sums() {
    let (engine, _db) = engine_with_db().await;
    // An income record filed under an expense category still counts as income.
    let expense_category = user_with_category(&engine, "openid-alice").await;

    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Income, 800, expense_category, "2026-02-13"),
        )
        .await
        .unwrap();

    let summary = engine
        .day_summary("openid-alice", "2026-02-13")
        .await
        .unwrap();
    assert_eq!(summary.income_minor, 800);
    assert_eq!(summary.expense_minor, 0);
}

#[tokio::test]
async fn calendar_summary_groups_by_date_and_omits_empty_days() {
    let (engine, _db) = engine_with_db().await;
    engine
        .resolve_user("openid-alice", None, None)
        .await
        .unwrap();
    let expense_id = engine
        .list_categories("openid-alice", Some(EntryKind::Expense), false)
        .await
        .unwrap()[0]
        .id;
    let income_id = engine
        .list_categories("openid-alice", Some(EntryKind::Income), false)
        .await
        .unwrap()[0]
        .id;

    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 100, expense_id, "2026-03-01 09:00:00"),
        )
        .await
        .unwrap();
    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 200, expense_id, "2026-03-01 18:00:00"),
        )
        .await
        .unwrap();
    engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Income, 5000, income_id, "2026-03-15 09:00:00"),
        )
        .await
        .unwrap();

    let summary = engine
        .calendar_summary("openid-alice", "2026-03")
        .await
        .unwrap();
    assert_eq!(summary.days.len(), 2);

    assert_eq!(summary.days[0].day, "2026-03-01");
    assert_eq!(summary.days[0].count, 2);
    assert_eq!(summary.days[0].expense_minor, 300);
    assert_eq!(summary.days[0].income_minor, 0);

    assert_eq!(summary.days[1].day, "2026-03-15");
    assert_eq!(summary.days[1].count, 1);
    assert_eq!(summary.days[1].income_minor, 5000);
}

#[tokio::test]
async fn records_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_db().await;
    let category_id = user_with_category(&engine, "openid-alice").await;
    engine
        .resolve_user("openid-bob", None, None)
        .await
        .unwrap();

    let record = engine
        .add_record(
            "openid-alice",
            AddRecordCmd::new(EntryKind::Expense, 100, category_id, "2026-02-13"),
        )
        .await
        .unwrap();

    let err = engine
        .record("openid-bob", record.id, false)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("record".to_string()));

    let err = engine
        .delete_record("openid-bob", record.id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("record".to_string()));
}
