mod common;

use axum::http::{Method, StatusCode};
use common::build_test_app;
use serde_json::json;

async fn seed_alpha(app: &common::TestApp, token: &str) {
    for (partner, amount) in [("X", 1000), ("Y", 3000)] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/funds/Alpha/movements",
                Some(token),
                Some(json!({
                    "partner": partner,
                    "date": "2024-01-01",
                    "kind": "Contribution",
                    "amount": amount
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, trade) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades",
            Some(token),
            Some(json!({
                "date": "2024-01-05",
                "asset": "BTC",
                "strategy": "Spot",
                "broker": "Binance",
                "positionValue": 4000,
                "takeProfitPct": 10,
                "stopLossPct": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trade["id"], 1);
    assert_eq!(trade["strategy"], "spot");
    assert_eq!(trade["outcome"], "Open");
    assert_eq!(trade["takeProfitAmount"].as_f64(), Some(400.0));
}

#[tokio::test]
async fn two_partner_fund_end_to_end() {
    let app = build_test_app().await;
    let token = app.login("root").await;
    seed_alpha(&app, &token).await;

    let (_, summary) = app
        .send(Method::GET, "/api/v1/funds/Alpha/summary", Some(&token), None)
        .await;
    assert_eq!(summary["realizedPnl"].as_f64(), Some(0.0));
    assert_eq!(summary["openTrades"], 1);

    let (status, closed) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades/1/close",
            Some(&token),
            Some(json!({ "outcome": "Win" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["outcome"], "Win");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades/1/close",
            Some(&token),
            Some(json!({ "outcome": "Loss" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, summary) = app
        .send(Method::GET, "/api/v1/funds/Alpha/summary", Some(&token), None)
        .await;
    assert_eq!(summary["netCapital"].as_f64(), Some(4000.0));
    assert_eq!(summary["realizedPnl"].as_f64(), Some(400.0));
    assert_eq!(summary["totalEquity"].as_f64(), Some(4400.0));
    assert_eq!(summary["returnPct"].as_f64(), Some(10.0));

    let (_, partners) = app
        .send(Method::GET, "/api/v1/funds/Alpha/partners", Some(&token), None)
        .await;
    assert_eq!(partners[0]["partner"], "X");
    assert_eq!(partners[0]["participationPct"].as_f64(), Some(25.0));
    assert_eq!(partners[0]["allocatedPnl"].as_f64(), Some(100.0));
    assert_eq!(partners[1]["allocatedPnl"].as_f64(), Some(300.0));

    let (_, curve) = app
        .send(
            Method::GET,
            "/api/v1/funds/Alpha/equity-curve",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(curve, json!([{ "date": "2024-01-05", "equity": 4400.0 }]));

    let (status, content_type, text) = app
        .send_text(
            Method::GET,
            "/api/v1/funds/Alpha/export/summary.csv",
            &token,
            "",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"));
    assert_eq!(text.lines().nth(1), Some("Alpha,4000,0,4000,400,4400,10,0,1"));
}

#[tokio::test]
async fn trade_filters_apply_to_listing_and_summary() {
    let app = build_test_app().await;
    let token = app.login("root").await;
    seed_alpha(&app, &token).await;

    let (_, trades) = app
        .send(
            Method::GET,
            "/api/v1/funds/Alpha/trades?broker=Bybit",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(trades, json!([]));

    let (_, trades) = app
        .send(
            Method::GET,
            "/api/v1/funds/Alpha/trades?from=2024-01-01&to=2024-01-31&strategy=SPOT",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(trades.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(
            Method::GET,
            "/api/v1/funds/Alpha/trades?from=yesterday",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trade_entry_validation() {
    let app = build_test_app().await;
    let token = app.login("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades",
            Some(&token),
            Some(json!({
                "date": "2024-01-05",
                "asset": "BTC",
                "strategy": "martingale",
                "positionValue": 100,
                "takeProfitPct": 10,
                "stopLossPct": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("martingale"));

    let (status, trade) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades",
            Some(&token),
            Some(json!({
                "date": "2024-01-05",
                "asset": "BTC",
                "strategy": "scalping",
                "positionValue": 100,
                "takeProfitPct": 10,
                "stopLossPct": 5,
                "fee": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trade["takeProfitAmount"].as_f64(), Some(9.0));
    assert_eq!(trade["stopLossAmount"].as_f64(), Some(6.0));

    let (status, _) = app
        .send(Method::GET, "/api/v1/funds/Alpha/trades/99", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/funds/Nowhere/trades",
            Some(&token),
            Some(json!({
                "date": "2024-01-05",
                "asset": "BTC",
                "strategy": "spot",
                "positionValue": 100,
                "takeProfitPct": 10,
                "stopLossPct": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, preview) = app
        .send(
            Method::POST,
            "/api/v1/trades/preview",
            Some(&token),
            Some(json!({ "positionValue": 500, "takeProfitPct": 10, "stopLossPct": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["takeProfitAmount"].as_f64(), Some(50.0));
    assert_eq!(preview["stopLossAmount"].as_f64(), Some(25.0));

    let (_, strategies) = app
        .send(Method::GET, "/api/v1/strategies", Some(&token), None)
        .await;
    let strategies: Vec<&str> = strategies
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert!(strategies.contains(&"spot"));
    assert!(strategies.contains(&"scalping"));
}

#[tokio::test]
async fn movements_are_addressed_by_index() {
    let app = build_test_app().await;
    let token = app.login("root").await;
    seed_alpha(&app, &token).await;

    let (_, movements) = app
        .send(Method::GET, "/api/v1/funds/Alpha/movements", Some(&token), None)
        .await;
    assert_eq!(movements.as_array().unwrap().len(), 2);

    let (status, updated) = app
        .send(
            Method::PUT,
            "/api/v1/funds/Alpha/movements/0",
            Some(&token),
            Some(json!({
                "partner": "X",
                "date": "2024-01-01",
                "kind": "Withdrawal",
                "amount": 200
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["kind"], "Withdrawal");

    let (_, summary) = app
        .send(Method::GET, "/api/v1/funds/Alpha/summary", Some(&token), None)
        .await;
    assert_eq!(summary["netCapital"].as_f64(), Some(2800.0));

    let (status, _) = app
        .send(
            Method::DELETE,
            "/api/v1/funds/Alpha/movements/7",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::DELETE,
            "/api/v1/funds/Alpha/movements/1",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn duplicate_fund_is_a_conflict() {
    let app = build_test_app().await;
    let token = app.login("root").await;

    let (status, fund) = app
        .send(
            Method::POST,
            "/api/v1/funds",
            Some(&token),
            Some(json!({ "name": " Gamma " })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(fund["name"], "Gamma");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/funds",
            Some(&token),
            Some(json!({ "name": "Gamma" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (_, funds) = app
        .send(Method::GET, "/api/v1/funds", Some(&token), None)
        .await;
    assert_eq!(funds.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn dataset_upload_replaces_or_rejects_wholesale() {
    let app = build_test_app().await;
    let token = app.login("root").await;
    seed_alpha(&app, &token).await;

    let upload = "fund,date,asset,strategy,position_value,take_profit_pct,stop_loss_pct,outcome\n\
                  Alpha,2024-02-01,ETH,Spot,1000,10,5,Ganadora\n";
    let (status, _, text) = app
        .send_text(Method::PUT, "/api/v1/datasets/trades", &token, upload)
        .await;
    assert_eq!(status, StatusCode::OK);
    let summary: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(summary["rows"], 1);
    let defaulted: Vec<&str> = summary["defaultedColumns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert!(defaulted.contains(&"fee"));
    assert!(defaulted.contains(&"id"));

    let (_, pnl) = app
        .send(Method::GET, "/api/v1/funds/Alpha/summary", Some(&token), None)
        .await;
    assert_eq!(pnl["realizedPnl"].as_f64(), Some(100.0));

    let foreign = "fund,asset,bogus\nAlpha,BTC,1\n";
    let (status, _, _) = app
        .send_text(Method::PUT, "/api/v1/datasets/trades", &token, foreign)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let broken = "fund,date,asset,strategy,position_value,take_profit_pct,stop_loss_pct\n\
                  Alpha,2024-02-01,ETH,spot,1000,10,5\n\
                  Alpha,not-a-date,ETH,spot,1000,10,5\n";
    let (status, _, _) = app
        .send_text(Method::PUT, "/api/v1/datasets/trades", &token, broken)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, content_type, csv) = app
        .send_text(Method::GET, "/api/v1/datasets/trades.csv", &token, "")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("1,Alpha,2024-02-01,ETH,spot,"));
    assert!(lines[1].ends_with(",Win"));

    let (status, _, _) = app
        .send_text(Method::GET, "/api/v1/datasets/partners", &token, "")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_values_are_rejected_and_writes_continue() {
    let app = build_test_app().await;
    let token = app.login("root").await;
    seed_alpha(&app, &token).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/trades/preview",
            Some(&token),
            Some(json!({ "positionValue": 1e20, "takeProfitPct": 200, "stopLossPct": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades",
            Some(&token),
            Some(json!({
                "date": "2024-03-01",
                "asset": "BTC",
                "strategy": "spot",
                "positionValue": 1e20,
                "takeProfitPct": 200,
                "stopLossPct": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let overflowing = "fund,partner,date,kind,amount\n\
                       Alpha,X,2024-01-05,Contribution,50000000000000000000000000000\n\
                       Alpha,Y,2024-01-05,Contribution,50000000000000000000000000000\n";
    let (status, _, _) = app
        .send_text(Method::PUT, "/api/v1/datasets/movements", &token, overflowing)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, summary) = app
        .send(Method::GET, "/api/v1/funds/Alpha/summary", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["netCapital"].as_f64(), Some(4000.0));

    let (status, created) = app
        .send(
            Method::POST,
            "/api/v1/funds/Alpha/trades",
            Some(&token),
            Some(json!({
                "date": "2024-03-01",
                "asset": "ETH",
                "strategy": "spot",
                "positionValue": 500,
                "takeProfitPct": 10,
                "stopLossPct": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 2);
}
