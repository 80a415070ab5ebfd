mod common;

use axum::http::StatusCode;
use common::{messages, seeded};
use serde_json::json;
use watchlist::StatusCodes;

#[tokio::test]
async fn lists_users_without_passwords() {
    let app = seeded(StatusCodes::Uniform).await;
    let reply = app.get("/users/").await;
    assert_eq!(reply.status, StatusCode::OK);
    let users = reply.json();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "ana");
    assert!(users.iter().all(|u| u.get("password").is_none()));
    assert!(!reply.text.contains("secret"));
}

#[tokio::test]
async fn fetches_one_user_or_404() {
    let app = seeded(StatusCodes::Legacy).await;
    let reply = app.get("/users/1").await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.json()["username"], "ana");

    let reply = app.get("/users/5").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text, "User not found");
}

#[tokio::test]
async fn user_without_watched_shows() {
    let app = seeded(StatusCodes::Uniform).await;
    let reply = app.get("/users/2/shows").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text, "No shows found for ben");

    let reply = app.get("/users/9/shows").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text, "User not found");
}

#[tokio::test]
async fn watching_links_show_once() {
    let app = seeded(StatusCodes::Legacy).await;
    let body = json!({ "rating": 10, "status": "watched" });

    let reply = app.put("/users/1/shows/1", body.clone()).await;
    assert_eq!(reply.status, StatusCode::ACCEPTED);
    let show = reply.json();
    assert_eq!(show["status"], "watched");
    assert_eq!(show["rating"], 10.0);

    let reply = app.get("/users/1/shows").await;
    assert_eq!(reply.status, StatusCode::ACCEPTED);
    let titles: Vec<_> = reply.json().as_array().unwrap().iter().map(|s| s["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Friends")]);

    app.put("/users/1/shows/1", body).await;
    assert_eq!(app.store.link_count().await, 1);
    assert_eq!(app.get("/users/1/shows").await.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_watched_status_updates_without_linking() {
    let app = seeded(StatusCodes::Uniform).await;
    let reply = app.put("/users/1/shows/2", json!({ "rating": 4, "status": "cancelled" })).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "cancelled");
    assert_eq!(app.store.link_count().await, 0);
}

#[tokio::test]
async fn linked_show_leaves_list_when_no_longer_watched() {
    let app = seeded(StatusCodes::Uniform).await;
    app.put("/users/1/shows/3", json!({ "rating": 8, "status": "watched" })).await;
    app.put("/users/1/shows/3", json!({ "rating": 8, "status": "on-going" })).await;
    assert_eq!(app.store.link_count().await, 1);
    let reply = app.get("/users/1/shows").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text, "No shows found for ana");
}

#[tokio::test]
async fn rejects_non_numeric_rating() {
    let app = seeded(StatusCodes::Uniform).await;
    let reply = app.put("/users/1/shows/1", json!({ "rating": "b", "status": "watched" })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let errors = reply.json();
    assert_eq!(errors["errors"][0]["msg"], "Rating must be a number");
    assert_eq!(errors["errors"][0]["path"], "rating");
    assert_eq!(app.store.link_count().await, 0);
}

#[tokio::test]
async fn rejects_short_status() {
    let app = seeded(StatusCodes::Uniform).await;
    let reply = app.put("/users/1/shows/1", json!({ "rating": 10, "status": "hi" })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(messages(&reply).contains(&"Status must be between 5 and 25 characters".to_string()));
}

#[tokio::test]
async fn validation_runs_before_lookup() {
    let app = seeded(StatusCodes::Uniform).await;
    let reply = app.put("/users/99/shows/99", json!({ "rating": 10, "status": "watched 2" })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(messages(&reply), ["Status can only contain letters"]);
}

#[tokio::test]
async fn missing_user_or_show_is_not_found() {
    let app = seeded(StatusCodes::Uniform).await;
    let body = json!({ "rating": 10, "status": "watched" });
    for uri in ["/users/9/shows/1", "/users/1/shows/99", "/users/x/shows/1"] {
        let reply = app.put(uri, body.clone()).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(reply.text, "Not found");
    }
    assert_eq!(app.store.link_count().await, 0);
}

#[tokio::test]
async fn oversized_body_is_rejected_with_413() {
    let app = seeded(StatusCodes::Uniform).await;
    let body = json!({ "rating": 10, "status": "watched", "title": "x".repeat(100 * 1024) });
    let reply = app.put("/users/1/shows/1", body).await;
    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!reply.text.contains("Rating must be a number"));
    assert_eq!(app.store.link_count().await, 0);
}

#[tokio::test]
async fn empty_or_malformed_json_body_reads_as_empty() {
    let app = seeded(StatusCodes::Uniform).await;
    for raw in ["", "{\"rating\": 10,"] {
        let reply = app.put_raw("/users/1/shows/1", raw.to_string()).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{raw:?}");
        assert_eq!(messages(&reply)[0], "Rating must be a number");
    }
}
