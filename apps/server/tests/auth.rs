mod common;

use axum::http::{Method, StatusCode};
use common::{build_test_app, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn login_and_access_protected_route() {
    let app = build_test_app().await;

    let (status, _) = app.send(Method::GET, "/api/v1/funds", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/api/v1/funds", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "root", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "root", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["session"]["activeFund"], "Alpha");
    let token = body["accessToken"].as_str().unwrap();

    let (status, funds) = app
        .send(Method::GET, "/api/v1/funds", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = funds
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = build_test_app().await;
    let (status, _) = app.send(Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = app
        .send(Method::GET, "/api/v1/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/funds/{fund}/summary"].is_object());
}

#[tokio::test]
async fn read_only_user_is_pinned_to_assigned_fund() {
    let app = build_test_app().await;
    let token = app.login("viewer").await;

    let (status, session) = app
        .send(Method::GET, "/api/v1/session", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "readOnly");
    assert_eq!(session["assignedFund"], "Beta");

    let (status, funds) = app
        .send(Method::GET, "/api/v1/funds", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(funds, json!([{ "name": "Beta" }]));

    let (status, _) = app
        .send(Method::GET, "/api/v1/funds/Beta/summary", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, "/api/v1/funds/Alpha/summary", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/funds/Beta/movements",
            Some(&token),
            Some(json!({
                "partner": "X",
                "date": "2024-01-01",
                "kind": "Contribution",
                "amount": 100
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/session/switch-fund",
            Some(&token),
            Some(json!({ "fund": "Alpha" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::GET, "/api/v1/datasets/trades", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_switch_fund_reissues_token() {
    let app = build_test_app().await;
    let token = app.login("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/session/switch-fund",
            Some(&token),
            Some(json!({ "fund": "Beta" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["activeFund"], "Beta");
    assert_eq!(body["session"]["assignedFund"], "Alpha");

    let switched = body["accessToken"].as_str().unwrap();
    let (_, session) = app
        .send(Method::GET, "/api/v1/session", Some(switched), None)
        .await;
    assert_eq!(session["activeFund"], "Beta");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/session/switch-fund",
            Some(&token),
            Some(json!({ "fund": "Nowhere" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
