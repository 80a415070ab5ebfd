//! Router over a seeded in-memory store, plus request helpers.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use watchlist::{app, AppState, MemoryStore, Settings, StatusCodes};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct Reply {
    pub status: StatusCode,
    pub text: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("response body is JSON")
    }
}

/// Users: 1 ana, 2 ben (no watched shows).
/// Shows: 1 Friends/Comedy/cancelled, 2 The Office/Comedy/on-going,
/// 3 Lost/Drama/watched, 4 Dark/Sci-Fi/watched, 5 Fargo/Crime/watched.
pub async fn seeded(status_codes: StatusCodes) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store.insert_user("ana", "ana-secret").await;
    store.insert_user("ben", "ben-secret").await;
    store.insert_show("Friends", "Comedy", "cancelled", None).await;
    store.insert_show("The Office", "Comedy", "on-going", None).await;
    store.insert_show("Lost", "Drama", "watched", Some(8.0)).await;
    store.insert_show("Dark", "Sci-Fi", "watched", Some(9.0)).await;
    store.insert_show("Fargo", "Crime", "watched", Some(7.0)).await;

    let settings = Settings {
        status_codes,
        ..Settings::default()
    };
    let state = AppState::new(store.clone(), &settings).expect("state");
    TestApp {
        router: app(state, settings.body_limit_bytes),
        store,
    }
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Reply {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.reply(request).await
    }

    async fn reply(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        Reply {
            status,
            text: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.send(Method::GET, uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Reply {
        self.send(Method::PUT, uri, Some(body)).await
    }

    /// PUT with a JSON content type and the body sent verbatim.
    pub async fn put_raw(&self, uri: &str, body: String) -> Reply {
        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request");
        self.reply(request).await
    }

    pub async fn put_empty(&self, uri: &str) -> Reply {
        self.send(Method::PUT, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> Reply {
        self.send(Method::DELETE, uri, None).await
    }
}

pub fn messages(reply: &Reply) -> Vec<String> {
    reply.json()["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["msg"].as_str().unwrap_or_default().to_string())
        .collect()
}
