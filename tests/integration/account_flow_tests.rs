// =====================================
// tests/integration/account_flow_tests.rs
// =====================================
//! End-to-end account flows through the router
use axum::http::{Method, StatusCode};
use bankapi_backend::auth::{Claims, TokenIssuer};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use std::time::Duration;

use crate::test_utils::{authed_request, json_request, register, send, test_app, TEST_SECRET};

#[tokio::test]
async fn test_register_login_and_fetch_own_account() {
    let (app, _) = test_app();

    let (john, register_token) = register(&app, "John", "Doe", "admin123").await;
    let (jane, _) = register(&app, "Jane", "Doe", "admin123").await;
    assert_eq!(john["firstName"], "John");
    assert_eq!(john["balance"], 0);
    assert!(john.get("password").is_none());
    assert!(john.get("passwordHash").is_none());

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
    let token = login.body["token"].as_str().unwrap().to_string();

    for token in [token.as_str(), register_token.as_str()] {
        let own = send(
            &app,
            authed_request(Method::GET, &format!("/account/{}", john["id"]), Some(token)),
        )
        .await;
        assert_eq!(own.status, StatusCode::OK);
        assert_eq!(own.body, john);
    }

    let other = send(
        &app,
        authed_request(Method::GET, &format!("/account/{}", jane["id"]), Some(&token)),
    )
    .await;
    assert_eq!(other.status, StatusCode::UNAUTHORIZED);
    assert_eq!(other.body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_login_by_id() {
    let (app, _) = test_app();
    let (john, _) = register(&app, "John", "Doe", "admin123").await;

    let login = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            &json!({ "id": john["id"], "password": "admin123" }),
        ),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body["token"].is_string());
}

#[tokio::test]
async fn test_bad_credentials_look_identical() {
    let (app, _) = test_app();
    let (john, _) = register(&app, "John", "Doe", "admin123").await;
    let unknown_number = john["number"].as_i64().unwrap() + 1;

    let wrong_password = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            &json!({ "number": john["number"], "password": "not-the-one" }),
        ),
    )
    .await;
    let unknown_account = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            &json!({ "number": unknown_number, "password": "admin123" }),
        ),
    )
    .await;

    for response in [wrong_password, unknown_account] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, json!({ "error": "Invalid credentials" }));
    }
}

#[tokio::test]
async fn test_gate_rejects_missing_expired_and_tampered_tokens() {
    let (app, _) = test_app();
    let (john, token) = register(&app, "John", "Doe", "admin123").await;
    let uri = format!("/account/{}", john["id"]);

    let now = Utc::now();
    let expired = jsonwebtoken::encode(
        &Header::default(),
        &Claims {
            account_id: john["id"].as_i64().unwrap(),
            iat: (now - ChronoDuration::hours(1)).timestamp(),
            exp: (now - ChronoDuration::minutes(5)).timestamp(),
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    let foreign = TokenIssuer::new("some-other-secret", Duration::from_secs(60))
        .unwrap()
        .issue(john["id"].as_i64().unwrap())
        .unwrap();
    let (head, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{head}.{flipped}{}", &signature[1..]);

    let candidates = [
        None,
        Some(""),
        Some("garbage"),
        Some(expired.as_str()),
        Some(foreign.as_str()),
        Some(tampered.as_str()),
    ];
    for candidate in candidates {
        let response = send(&app, authed_request(Method::GET, &uri, candidate)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "token {candidate:?}");
        assert_eq!(response.body, json!({ "error": "Unauthorized" }));
    }
}

#[tokio::test]
async fn test_non_numeric_path_id_is_unauthorized() {
    let (app, _) = test_app();
    let (_, token) = register(&app, "John", "Doe", "admin123").await;

    let response = send(&app, authed_request(Method::GET, "/account/abc", Some(&token))).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_delete_own_account() {
    let (app, _) = test_app();
    let (john, token) = register(&app, "John", "Doe", "admin123").await;
    let (jane, jane_token) = register(&app, "Jane", "Doe", "admin123").await;
    let uri = format!("/account/{}", john["id"]);

    // someone else's token cannot delete
    let denied = send(&app, authed_request(Method::DELETE, &uri, Some(&jane_token))).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let deleted = send(&app, authed_request(Method::DELETE, &uri, Some(&token))).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "deletedId": john["id"] }));

    // the token outlives its account but no longer opens anything
    let after = send(&app, authed_request(Method::GET, &uri, Some(&token))).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let listed = send(&app, authed_request(Method::GET, "/account", None)).await;
    assert_eq!(listed.body, json!([jane]));
}

#[tokio::test]
async fn test_list_is_stable_and_ordered() {
    let (app, _) = test_app();
    for (first, last) in [("John", "Doe"), ("Jane", "Doe"), ("John", "Smith")] {
        register(&app, first, last, "admin123").await;
    }

    let first = send(&app, authed_request(Method::GET, "/account", None)).await;
    let second = send(&app, authed_request(Method::GET, "/account", None)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);

    let ids: Vec<i64> = first
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_empty_list_is_an_array() {
    let (app, _) = test_app();
    let response = send(&app, authed_request(Method::GET, "/account", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let (app, _) = test_app();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/account")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{ not json"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Invalid request body" }));

    let missing_field = send(
        &app,
        json_request(Method::POST, "/account", &json!({ "firstName": "John" })),
    )
    .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert!(missing_field.body["error"].is_string());
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, _) = test_app();

    for body in [
        json!({ "firstName": "", "lastName": "Doe", "password": "admin123" }),
        json!({ "firstName": "John", "lastName": "   ", "password": "admin123" }),
        json!({ "firstName": "John", "lastName": "Doe", "password": "short" }),
    ] {
        let response = send(&app, json_request(Method::POST, "/account", &body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
        assert!(response.token_header().is_none());
    }

    let listed = send(&app, authed_request(Method::GET, "/account", None)).await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn test_login_requires_exactly_one_identifier() {
    let (app, _) = test_app();

    for body in [
        json!({ "password": "admin123" }),
        json!({ "id": 1, "number": 123456789, "password": "admin123" }),
    ] {
        let response = send(&app, json_request(Method::POST, "/login", &body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
    }
}

#[tokio::test]
async fn test_transfer_echoes_request() {
    let (app, _) = test_app();
    let (jane, _) = register(&app, "Jane", "Doe", "admin123").await;

    let body = json!({ "toAccount": jane["number"], "amount": 100 });
    let response = send(&app, json_request(Method::POST, "/transfer", &body)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, body);

    let rejected = send(
        &app,
        json_request(Method::POST, "/transfer", &json!({ "toAccount": 1, "amount": 0 })),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let response = send(&app, authed_request(Method::GET, "/health", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "ok" }));
}
