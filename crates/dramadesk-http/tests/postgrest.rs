//! Mock PostgREST tests.
//!
//! These drive `TableResource` over `PostgrestTable` and check the request
//! shape PostgREST expects.

use chrono::{TimeZone, Utc};
use dramadesk_core::{
    BackendUrl, Error, ListOrder, Movie, MovieDraft, MoviePatch, ResourceAccessor, ResourceId,
    TableResource, User,
};
use dramadesk_http::PostgrestTable;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_table(server: &MockServer) -> PostgrestTable {
    let base = BackendUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap();
    PostgrestTable::new(base, Some("anon-key")).unwrap()
}

fn id(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}

fn movie_row(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content_type": "movie",
        "created_at": "2026-10-18T09:30:00+00:00"
    })
}

#[tokio::test]
async fn test_list_orders_newest_first_with_key_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc,id.asc"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([movie_row("m2", "B"), movie_row("m1", "A")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    let listed = movies.list(None).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id.as_str(), "m2");
}

#[tokio::test]
async fn test_list_with_explicit_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(query_param("order", "title.asc,id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    movies
        .list(Some(&ListOrder::ascending("title")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_by_id_maybe_single() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([movie_row("m1", "X")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.m404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    let found = movies.get_by_id(&id("m1")).await.unwrap();
    assert_eq!(found.found().map(|m| m.title), Some("X".to_string()));
    assert!(movies.get_by_id(&id("m404")).await.unwrap().is_not_found());
}

#[tokio::test]
async fn test_users_embed_subscription_package() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("select", "*,subscription_packages(*)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "u1",
            "email": "a@example.com",
            "status": "active",
            "subscription_id": "p1",
            "subscription_start": "2026-10-01T00:00:00",
            "subscription_end": "2026-10-31T00:00:00",
            "created_at": "2026-09-01T00:00:00+00:00",
            "subscription_packages": {
                "id": "p1",
                "name": "Monthly",
                "tier": "Basic",
                "price": 9.99,
                "duration_days": 30,
                "features": ["HD"],
                "created_at": "2026-01-01T00:00:00+00:00"
            }
        }])))
        .mount(&server)
        .await;

    let users: TableResource<User, _> = TableResource::new(mock_table(&server));
    let listed = users.list(None).await.unwrap();
    let package = listed[0].subscription.as_ref().unwrap();
    assert_eq!(package.features, ["HD"]);
}

#[tokio::test]
async fn test_create_returns_representation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/movies"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"title": "X"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([movie_row("m1", "X")])))
        .expect(1)
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    let created = movies.create(&MovieDraft::new("X")).await.unwrap();
    assert_eq!(created.id.as_str(), "m1");
    assert_eq!(
        created.created_at,
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    );
}

#[tokio::test]
async fn test_update_sends_only_patch_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.m1"))
        .and(body_json(json!({"title": "Y"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([movie_row("m1", "Y")])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.m404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    let patch = MoviePatch {
        title: Some("Y".into()),
        ..Default::default()
    };
    assert_eq!(movies.update(&id("m1"), &patch).await.unwrap().title, "Y");
    assert!(movies.update(&id("m404"), &patch).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_counts_returned_rows() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "m1"}])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    assert!(movies.delete(&id("m1")).await.unwrap());
    assert!(movies.delete(&id("m1")).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_postgrest_error_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/movies"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"movies_pkey\"",
            "details": "Key (id)=(m1) already exists.",
            "hint": null
        })))
        .mount(&server)
        .await;

    let movies: TableResource<Movie, _> = TableResource::new(mock_table(&server));
    let err = movies.create(&MovieDraft::new("X")).await.unwrap_err();
    match err {
        Error::Backend(b) => {
            assert_eq!(b.status, Some(409));
            assert_eq!(b.code.as_deref(), Some("23505"));
            assert!(b.to_string().contains("HTTP 409 [23505]"));
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}
