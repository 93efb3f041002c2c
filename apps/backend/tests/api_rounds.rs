//! Round API tests.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures;
use common::TestContext;

/// Start a round and return its data.
async fn start_round(server: &TestServer, game: &str, config: Value) -> Value {
    let response = server
        .post(&format!("/api/{game}/rounds"))
        .json(&config)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

/// The card of `round` awaiting an answer.
fn current_card(round: &Value) -> Value {
    let current = round["current"].as_str().unwrap();
    round["cards"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == current)
        .cloned()
        .unwrap()
}

/// Test health endpoint.
#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

/// Test starting a round draws distinct cards and a countdown.
#[tokio::test]
async fn test_start_round() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(&server, "times", fixtures::config_all(10)).await;
    let cards = round["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 10);
    assert_eq!(round["answered"], 0);
    assert_eq!(round["current"], cards[0]["id"]);
    assert!(round["timer"].is_u64());
    assert_eq!(round["seconds"], 60.0);

    let current = server.get("/api/times/rounds/current").await;
    current.assert_status_ok();
    assert_eq!(current.json::<Value>()["data"]["id"], round["id"]);
}

/// Test a second round cannot start while one is running.
#[tokio::test]
async fn test_round_in_progress() {
    let ctx = TestContext::new();
    let server = ctx.server();

    start_round(&server, "times", fixtures::config_all(5)).await;
    let response = server
        .post("/api/times/rounds")
        .json(&fixtures::config_all(5))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "round_in_progress");
}

/// Test a selection without cards is reported as an empty state.
#[tokio::test]
async fn test_empty_selection() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/times/rounds")
        .json(&fixtures::config_topics(json!([2]), 10))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "empty_selection");
    assert_eq!(body["message"], "no cards match this selection");
}

/// Test an invalid round size is rejected.
#[tokio::test]
async fn test_invalid_round_size() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/times/rounds")
        .json(&fixtures::config_all(0))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_config");
}

/// Test answering the current card and rejecting a second submission.
#[tokio::test]
async fn test_answer_and_double_submit() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(&server, "times", fixtures::config_all(10)).await;
    let card = current_card(&round);
    let card_id = card["id"].as_str().unwrap();
    let expected = fixtures::expected_answer(&card);

    let response = server
        .post("/api/times/rounds/current/answers")
        .json(&fixtures::typed_answer(card_id, &expected, 3.5))
        .await;
    response.assert_status_ok();
    let outcome = response.json::<Value>()["data"].clone();
    assert_eq!(outcome["correct"], true);
    assert_eq!(outcome["timed_out"], false);
    assert!(outcome["points"].as_u64().unwrap() > 0);
    assert_eq!(outcome["card"]["level"], 2);
    assert_eq!(outcome["card"]["time"], 3.5);
    assert_eq!(outcome["next"], round["cards"][1]["id"]);

    let again = server
        .post("/api/times/rounds/current/answers")
        .json(&fixtures::typed_answer(card_id, &expected, 1.0))
        .await;
    again.assert_status(StatusCode::CONFLICT);
    assert_eq!(again.json::<Value>()["error"], "not_current_card");

    let stored = server.get(&format!("/api/times/cards/{card_id}")).await;
    assert_eq!(stored.json::<Value>()["data"]["level"], 2);
}

/// Test a wrong answer scores nothing and keeps the recorded time.
#[tokio::test]
async fn test_wrong_answer() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(&server, "times", fixtures::config_all(3)).await;
    let card = current_card(&round);

    let response = server
        .post("/api/times/rounds/current/answers")
        .json(&fixtures::typed_answer(card["id"].as_str().unwrap(), "0", 2.0))
        .await;
    response.assert_status_ok();
    let outcome = response.json::<Value>()["data"].clone();
    assert_eq!(outcome["correct"], false);
    assert_eq!(outcome["points"], 0);
    assert_eq!(outcome["card"]["level"], 1);
    assert_eq!(outcome["card"]["time"], 60.0);
    assert_eq!(outcome["expected"], fixtures::expected_answer(&card));
}

/// Test answering without a round.
#[tokio::test]
async fn test_no_active_round() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/times/rounds/current/answers")
        .json(&fixtures::typed_answer("7x3", "21", 1.0))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "no_active_round");

    server
        .post("/api/times/rounds/current/finish")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/times/rounds/current")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Test the countdown expiring answers the card as a timeout.
#[tokio::test]
async fn test_tick_expires_card() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(&server, "times", fixtures::config_all(5)).await;
    let token = round["timer"].clone();

    let running = server
        .post("/api/times/rounds/current/tick")
        .json(&json!({ "token": token, "elapsed": 20.0 }))
        .await;
    running.assert_status_ok();
    let body = running.json::<Value>()["data"].clone();
    assert_eq!(body["status"], "running");
    assert_eq!(body["remaining"], 40.0);

    let expired = server
        .post("/api/times/rounds/current/tick")
        .json(&json!({ "token": token, "elapsed": 40.0 }))
        .await;
    let body = expired.json::<Value>()["data"].clone();
    assert_eq!(body["status"], "expired");
    assert_eq!(body["outcome"]["timed_out"], true);
    assert_eq!(body["outcome"]["correct"], false);
    assert_eq!(body["outcome"]["card_id"], round["current"]);

    let stale = server
        .post("/api/times/rounds/current/tick")
        .json(&json!({ "token": token, "elapsed": 1.0 }))
        .await;
    assert_eq!(stale.json::<Value>()["data"]["status"], "stale");

    let current = server.get("/api/times/rounds/current").await;
    assert_eq!(current.json::<Value>()["data"]["answered"], 1);
}

/// Test finishing a round records history with the daily bonus.
#[tokio::test]
async fn test_finish_round() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let config = fixtures::config_all(4);
    let round = start_round(&server, "times", config.clone()).await;
    let card = current_card(&round);
    let outcome = server
        .post("/api/times/rounds/current/answers")
        .json(&fixtures::typed_answer(
            card["id"].as_str().unwrap(),
            &fixtures::expected_answer(&card),
            5.0,
        ))
        .await
        .json::<Value>()["data"]
        .clone();

    let response = server.post("/api/times/rounds/current/finish").await;
    response.assert_status_ok();
    let result = response.json::<Value>()["data"].clone();
    assert_eq!(result["points"], outcome["points"]);
    assert_eq!(result["bonus"], 10);
    assert_eq!(result["correct"], 1);
    assert_eq!(result["attempted"], 1);

    let history = server.get("/api/times/history").await.json::<Value>();
    assert_eq!(history["data"].as_array().unwrap().len(), 1);

    let last = server.get("/api/times/config").await.json::<Value>();
    assert_eq!(last["data"]["size"], 4);
    assert_eq!(last["data"]["selection"], config["selection"]);

    server
        .get("/api/times/rounds/current")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Test finishing before any answer is refused.
#[tokio::test]
async fn test_finish_without_answers() {
    let ctx = TestContext::new();
    let server = ctx.server();

    start_round(&server, "times", fixtures::config_all(3)).await;
    let response = server.post("/api/times/rounds/current/finish").await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "nothing_answered");
}

/// Test abandoning a round.
#[tokio::test]
async fn test_abandon_round() {
    let ctx = TestContext::new();
    let server = ctx.server();

    start_round(&server, "times", fixtures::config_all(3)).await;
    let response = server.delete("/api/times/rounds/current").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["abandoned"], true);

    let again = server.delete("/api/times/rounds/current").await;
    assert_eq!(again.json::<Value>()["data"]["abandoned"], false);

    let history = server.get("/api/times/history").await.json::<Value>();
    assert_eq!(history["data"], json!([]));
}

/// Test a restarted server resumes the round in progress.
#[tokio::test]
async fn test_round_survives_restart() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(&server, "times", fixtures::config_all(5)).await;
    let card = current_card(&round);
    server
        .post("/api/times/rounds/current/answers")
        .json(&fixtures::typed_answer(
            card["id"].as_str().unwrap(),
            &fixtures::expected_answer(&card),
            2.0,
        ))
        .await
        .assert_status_ok();

    let restarted = TestContext::with_storage(ctx.storage.clone());
    let server = restarted.server();
    let current = server.get("/api/times/rounds/current").await;
    current.assert_status_ok();
    let view = current.json::<Value>()["data"].clone();
    assert_eq!(view["id"], round["id"]);
    assert_eq!(view["answered"], 1);
    assert_eq!(view["current"], round["cards"][1]["id"]);

    let stored = server
        .get(&format!("/api/times/cards/{}", card["id"].as_str().unwrap()))
        .await;
    assert_eq!(stored.json::<Value>()["data"]["level"], 2);
}

/// Test the vocabulary game tolerates a typo and reports it.
#[tokio::test]
async fn test_vocab_near_miss() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(
        &server,
        "vocab",
        fixtures::config_topics(json!(["questions"]), 10),
    )
    .await;
    assert_eq!(round["cards"].as_array().unwrap().len(), 2);

    let card = current_card(&round);
    let expected = fixtures::expected_answer(&card);
    let typo = format!("X{}", &expected[1..]);

    let response = server
        .post("/api/vocab/rounds/current/answers")
        .json(&fixtures::typed_answer(card["id"].as_str().unwrap(), &typo, 4.0))
        .await;
    response.assert_status_ok();
    let outcome = response.json::<Value>()["data"].clone();
    assert_eq!(outcome["correct"], true);
    assert_eq!(outcome["near_miss"], true);
    assert_eq!(outcome["distance"], 1);
    assert_eq!(outcome["expected"], expected);
}

/// Test self-graded vocabulary answers record the blind time.
#[tokio::test]
async fn test_vocab_flip_mode() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let round = start_round(
        &server,
        "vocab",
        json!({
            "selection": { "type": "topics", "topics": ["animals"] },
            "focus": "slow",
            "mode": "flip",
        }),
    )
    .await;
    let card = current_card(&round);

    let response = server
        .post("/api/vocab/rounds/current/answers")
        .json(&json!({
            "card_id": card["id"],
            "response": { "type": "self_graded", "recalled": true },
            "elapsed": 2.5,
        }))
        .await;
    response.assert_status_ok();
    let outcome = response.json::<Value>()["data"].clone();
    assert_eq!(outcome["correct"], true);
    assert_eq!(outcome["card"]["blind_time"], 2.5);
    assert_eq!(outcome["card"]["time"], 60.0);
}
