// ===================================
// tests/integration/file_store_tests.rs
// ===================================
//! Router over the flat-file store, across a simulated restart
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use bankapi_backend::storage::FlatFileAccountStore;
use serde_json::json;
use tempfile::TempDir;

use crate::test_utils::{app_with_store, authed_request, json_request, register, send};

#[tokio::test]
async fn test_accounts_and_tokens_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let (john, token) = {
        let store = FlatFileAccountStore::open(temp_dir.path()).await.unwrap();
        let (app, _) = app_with_store(Arc::new(store));
        register(&app, "John", "Doe", "admin123").await
    };

    let store = FlatFileAccountStore::open(temp_dir.path()).await.unwrap();
    let (app, _) = app_with_store(Arc::new(store));

    // same secret, so the old token is still honoured
    let own = send(
        &app,
        authed_request(Method::GET, &format!("/account/{}", john["id"]), Some(&token)),
    )
    .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body, john);

    let login = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            &json!({ "number": john["number"], "password": "admin123" }),
        ),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);

    let (jane, _) = register(&app, "Jane", "Doe", "admin123").await;
    assert!(jane["id"].as_i64().unwrap() > john["id"].as_i64().unwrap());
}
