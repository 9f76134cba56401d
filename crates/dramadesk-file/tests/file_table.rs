//! Resource accessor tests over the file-backed table store.
//!
//! Each test gets its own temporary directory, so they can run in parallel.

use chrono::{Duration, TimeZone, Utc};
use dramadesk_core::{
    ActivityStatus, ContentType, Fetched, ListOrder, Movie, MovieDraft, MoviePatch,
    ResourceAccessor, ResourceId, SubscriptionPackage, SubscriptionPackageDraft,
    SubscriptionTier, TableResource, User, UserDraft, UserPatch,
};
use dramadesk_file::FileTable;
use tempfile::TempDir;

fn setup() -> (TempDir, FileTable) {
    let dir = TempDir::new().unwrap();
    let table = FileTable::open(dir.path()).unwrap();
    (dir, table)
}

fn id(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}

// ============================================================================
// Generic accessor properties
// ============================================================================

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let draft = MovieDraft {
        genre: Some("thriller".into()),
        release_year: Some(2024),
        content_type: Some(ContentType::Drama),
        ..MovieDraft::new("X")
    };
    let created = movies.create(&draft).await.unwrap();
    let fetched = movies.get_by_id(&created.id).await.unwrap();

    assert_eq!(fetched, Fetched::Found(created));
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let created = movies
        .create(&MovieDraft {
            description: Some("first cut".into()),
            duration_minutes: Some(95),
            ..MovieDraft::new("X")
        })
        .await
        .unwrap();

    let patch = MoviePatch {
        duration_minutes: Some(102),
        ..Default::default()
    };
    let updated = movies.update(&created.id, &patch).await.unwrap();

    assert_eq!(updated.duration_minutes, Some(102));
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let fetched = movies.get_by_id(&id("does-not-exist")).await.unwrap();
    assert!(fetched.is_not_found());
}

#[tokio::test]
async fn test_delete_is_not_idempotent() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let created = movies.create(&MovieDraft::new("X")).await.unwrap();
    assert!(movies.delete(&created.id).await.unwrap());
    assert!(movies.get_by_id(&created.id).await.unwrap().is_not_found());

    let err = movies.delete(&created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_missing_fails() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let patch = MoviePatch {
        title: Some("Y".into()),
        ..Default::default()
    };
    let err = movies.update(&id("m404"), &patch).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_defaults_to_newest_first() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        ids.push(movies.create(&MovieDraft::new(title)).await.unwrap().id);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let listed: Vec<_> = movies
        .list(None)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(listed, ["third", "second", "first"]);

    let ascending: Vec<_> = movies
        .list(Some(&ListOrder::ascending("title")))
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(ascending, ["first", "second", "third"]);
}

#[tokio::test]
async fn test_movie_scenario() {
    let (_dir, table) = setup();
    let movies: TableResource<Movie, _> = TableResource::new(table);

    let created = movies.create(&MovieDraft::new("X")).await.unwrap();
    assert_eq!(created.title, "X");

    let patch = MoviePatch {
        title: Some("Y".into()),
        ..Default::default()
    };
    let updated = movies.update(&created.id, &patch).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Y");
    assert_eq!(updated.created_at, created.created_at);

    assert!(movies.delete(&created.id).await.unwrap());
    assert!(movies.get_by_id(&created.id).await.unwrap().is_not_found());
}

// ============================================================================
// Users and subscriptions
// ============================================================================

async fn monthly_package(table: &FileTable) -> SubscriptionPackage {
    let packages: TableResource<SubscriptionPackage, _> = TableResource::new(table.clone());
    packages
        .create(&SubscriptionPackageDraft {
            name: "Monthly".into(),
            tier: SubscriptionTier::Premium,
            price: 12.5,
            duration_days: 30,
            features: vec!["4k".into()],
            ..Default::default()
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_assign_subscription_window() {
    let (_dir, table) = setup();
    let package = monthly_package(&table).await;
    let users: TableResource<User, _> = TableResource::new(table);

    let user = users
        .create(&UserDraft {
            email: "viewer@example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(user.subscription.is_none());

    let now = Utc.with_ymd_and_hms(2026, 10, 18, 21, 15, 0).unwrap();
    let assigned = users
        .update_user_subscription_at(&user.id, &package.id, package.duration_days, now)
        .await
        .unwrap();

    let start = assigned.subscription_start.unwrap();
    let end = assigned.subscription_end.unwrap();
    assert_eq!(start, now);
    assert_eq!(end - start, Duration::days(30));
    assert_eq!(assigned.subscription_id.as_ref(), Some(&package.id));
    assert_eq!(assigned.subscription.as_ref().map(|p| &p.name), Some(&package.name));
    assert_eq!(assigned.email, user.email);
}

#[tokio::test]
async fn test_assign_subscription_now() {
    let (_dir, table) = setup();
    let package = monthly_package(&table).await;
    let users: TableResource<User, _> = TableResource::new(table);

    let user = users
        .create(&UserDraft {
            email: "now@example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let assigned = users
        .update_user_subscription(&user.id, &package.id, 30)
        .await
        .unwrap();
    let start = assigned.subscription_start.unwrap();
    let end = assigned.subscription_end.unwrap();
    assert_eq!(end - start, Duration::days(30));
    assert!(assigned.is_subscribed_at(start));
}

#[tokio::test]
async fn test_assign_subscription_to_missing_user_fails() {
    let (_dir, table) = setup();
    let users: TableResource<User, _> = TableResource::new(table);

    let err = users
        .update_user_subscription(&id("nobody"), &id("p1"), 30)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_user_list_embeds_package() {
    let (_dir, table) = setup();
    let package = monthly_package(&table).await;
    let users: TableResource<User, _> = TableResource::new(table);

    let user = users
        .create(&UserDraft {
            email: "embed@example.com".into(),
            status: Some(ActivityStatus::Inactive),
            ..Default::default()
        })
        .await
        .unwrap();
    users
        .update(
            &user.id,
            &UserPatch {
                subscription_id: Some(package.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = users.list(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ActivityStatus::Inactive);
    assert_eq!(listed[0].subscription.as_ref(), Some(&package));
}
