//! Live integration tests for fogmap-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/fogmap-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p fogmap-db -- --ignored`

use fogmap_db::{
    create_or_touch_visit, find_visit, list_visits_for_owner, touch_visit, DbError, PgVisitStore,
};
use fogmap_grid::{explored_set, record_visit, GridLayout, VisitStore};

// ---------------------------------------------------------------------------
// Raw queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn create_then_find_returns_same_row(pool: sqlx::PgPool) {
    let (created, is_new) = create_or_touch_visit(&pool, "owner-1", "25.033,121.5654")
        .await
        .expect("create_or_touch_visit failed");
    assert!(is_new);

    let found = find_visit(&pool, "owner-1", "25.033,121.5654")
        .await
        .expect("find_visit failed")
        .expect("row should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.coordinate.as_deref(), Some("25.033,121.5654"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn duplicate_insert_touches_existing_row(pool: sqlx::PgPool) {
    let (first, _) = create_or_touch_visit(&pool, "owner-1", "25.033,121.5654")
        .await
        .expect("first insert");
    let (second, is_new) = create_or_touch_visit(&pool, "owner-1", "25.033,121.5654")
        .await
        .expect("second insert");

    assert!(!is_new);
    assert_eq!(second.id, first.id);
    assert!(second.updated_at >= first.updated_at);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn touch_missing_row_is_not_found(pool: sqlx::PgPool) {
    let err = touch_visit(&pool, 9_999).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn list_skips_null_coordinates_and_other_owners(pool: sqlx::PgPool) {
    sqlx::query("INSERT INTO visit_records (owner_id, coordinate) VALUES ('owner-1', NULL)")
        .execute(&pool)
        .await
        .expect("insert null coordinate");
    create_or_touch_visit(&pool, "owner-1", "25.033,121.5654")
        .await
        .expect("insert owner-1");
    create_or_touch_visit(&pool, "owner-2", "22.6273,120.3014")
        .await
        .expect("insert owner-2");

    let rows = list_visits_for_owner(&pool, "owner-1")
        .await
        .expect("list failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].coordinate.as_deref(), Some("25.033,121.5654"));
}

// ---------------------------------------------------------------------------
// PgVisitStore through the tracker
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn record_visit_creates_then_touches(pool: sqlx::PgPool) {
    let store = PgVisitStore::new(pool);
    let layout = GridLayout::TAIWAN;

    let first = record_visit(&store, &layout, "owner-1", 25.033, 121.565_4)
        .await
        .expect("first visit");
    let second = record_visit(&store, &layout, "owner-1", 25.033, 121.565_4)
        .await
        .expect("second visit");

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.record.id, second.record.id);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn nearby_fixes_collapse_into_one_explored_cell(pool: sqlx::PgPool) {
    let store = PgVisitStore::new(pool);
    let layout = GridLayout::TAIWAN;

    record_visit(&store, &layout, "owner-1", 25.033, 121.565_4)
        .await
        .expect("first visit");
    record_visit(&store, &layout, "owner-1", 25.033_5, 121.565_8)
        .await
        .expect("second visit");

    let visits = store.list_visits("owner-1").await.expect("list");
    assert_eq!(visits.len(), 2);
    assert_eq!(explored_set(&layout, &visits).len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn store_create_reports_conflict_as_not_created(pool: sqlx::PgPool) {
    let store = PgVisitStore::new(pool);

    let (first, first_new) = store
        .create_visit("owner-1", "25.033,121.5654")
        .await
        .expect("first create");
    let (second, second_new) = store
        .create_visit("owner-1", "25.033,121.5654")
        .await
        .expect("second create");

    assert!(first_new);
    assert!(!second_new);
    assert_eq!(second.id, first.id);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn rerunning_migrations_applies_nothing(pool: sqlx::PgPool) {
    let applied = fogmap_db::run_migrations(&pool)
        .await
        .expect("run_migrations failed");
    assert_eq!(applied, 0);
}
