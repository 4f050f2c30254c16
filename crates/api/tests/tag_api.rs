//! HTTP-level tests for the tag endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_tag_by_id(pool: PgPool) {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/tags", json!({ "name": " Cykel " })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get(build_test_app(pool), &format!("/api/v1/tags/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["name"], "cykel");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_tag_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/tags/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Tag with id 999 not found");
}
