//! HTTP-level tests for request validation and error mapping.
//!
//! Every rejected payload must produce a 400 `VALIDATION_ERROR` naming the
//! offending field, and uniqueness violations must produce a 409.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_user, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

fn idea_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "En beskrivning som är lång nog",
        "type": "idea",
        "target_group": "citizens",
        "submitter_email": "anna@kommun.se",
    })
}

fn field_names(json: &Value) -> Vec<String> {
    json["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .map(|f| f["field"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Test: Idea title boundaries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_idea_title_of_four_chars_is_rejected(pool: PgPool) {
    create_user(&pool, "anna@kommun.se").await;

    let response = post_json(build_test_app(pool), "/api/v1/ideas", idea_payload("Park")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(field_names(&json), vec!["title"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_idea_title_of_five_chars_is_accepted(pool: PgPool) {
    create_user(&pool, "anna@kommun.se").await;

    let response = post_json(build_test_app(pool), "/api/v1/ideas", idea_payload("Parks")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_violations_reported_together(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/ideas",
        json!({
            "title": "Kort",
            "description": "för kort",
            "type": "problem",
            "target_group": "businesses",
            "submitter_email": "inte-en-adress",
            "tags": ["x"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        field_names(&json),
        vec!["description", "submitter_email", "title", "tags[0]"]
    );
}

// ---------------------------------------------------------------------------
// Test: Category color
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_color_must_be_hex(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        json!({ "name": "Trafik", "color": "blue" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body_json(response).await), vec!["color"]);

    let response = post_json(
        build_test_app(pool),
        "/api/v1/categories",
        json!({ "name": "Trafik", "color": "#3498db" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: Comments, users, tags, pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comment_content_length(pool: PgPool) {
    let author = create_user(&pool, "anna@kommun.se").await;
    let idea = body_json(
        post_json(build_test_app(pool.clone()), "/api/v1/ideas", idea_payload("Kommentera mig")).await,
    )
    .await;
    let uri = format!("/api/v1/ideas/{}/comments", idea["data"]["id"]);

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "content": "ok", "author_id": author }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let long = "a".repeat(1001);
    let response = post_json(
        build_test_app(pool),
        &uri,
        json!({ "content": long, "author_id": author }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_email_must_be_valid(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/users",
        json!({ "name": "Anna", "email": "anna-at-kommun" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body_json(response).await), vec!["email"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_name_length(pool: PgPool) {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/tags", json!({ "name": " a " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body_json(response).await), vec!["name"]);

    let response = post_json(build_test_app(pool), "/api/v1/tags", json!({ "name": "Park" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["name"], "park");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_limit_out_of_range(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/ideas?limit=101").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(build_test_app(pool.clone()), "/api/v1/ideas?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(build_test_app(pool), "/api/v1/ideas?skip=-1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: Uniqueness conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    create_user(&pool, "anna@kommun.se").await;
    let response = post_json(
        build_test_app(pool),
        "/api/v1/users",
        json!({ "name": "Anna Igen", "email": "anna@kommun.se" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_rename_onto_existing_name_is_conflict(pool: PgPool) {
    post_json(build_test_app(pool.clone()), "/api/v1/categories", json!({ "name": "Miljö" })).await;
    let second = body_json(
        post_json(build_test_app(pool.clone()), "/api/v1/categories", json!({ "name": "Trafik" })).await,
    )
    .await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/categories/{}", second["data"]["id"]),
        json!({ "name": "Miljö" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: Names are trimmed before their length is checked
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_padded_category_name_is_checked_after_trimming(pool: PgPool) {
    for name in ["   ", "  x  "] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/categories",
            json!({ "name": name }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "name {name:?}");
        assert_eq!(field_names(&body_json(response).await), vec!["name"]);
    }

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        json!({ "name": "  Trafik  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/categories/{id}"),
        json!({ "name": "  x  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_padded_user_name_is_checked_after_trimming(pool: PgPool) {
    for name in ["   ", " a "] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/users",
            json!({ "name": name, "email": "anna@kommun.se" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "name {name:?}");
        assert_eq!(field_names(&body_json(response).await), vec!["name"]);
    }

    let response = post_json(
        build_test_app(pool),
        "/api/v1/users",
        json!({ "name": "  Anna  ", "email": " anna@kommun.se " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Anna");
    assert_eq!(json["data"]["email"], "anna@kommun.se");
}
