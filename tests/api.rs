use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;

use footle::api::{AppState, create_router};
use footle::daily::DailySelector;
use footle::ingest::StaticRoster;
use footle::player::Player;
use footle::store::PlayerStore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 20).expect("valid date")
}

fn app_with(store: PlayerStore, daily: DailySelector) -> Router {
    create_router(AppState {
        store: Arc::new(Mutex::new(store)),
        source: Arc::new(StaticRoster),
        daily,
        refresh_days: 7,
        today: Some(today()),
    })
}

fn seeded(on: NaiveDate) -> (PlayerStore, Vec<Player>) {
    let mut store = PlayerStore::open_in_memory().expect("open store");
    let players = store
        .replace_all(&StaticRoster::players(on))
        .expect("seed store");
    (store, players)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request should complete");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_guess(id: i64) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/guess")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "guess": { "id": id } }).to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_player_count() {
    let (store, players) = seeded(today());
    let (status, body) = send(app_with(store, DailySelector::default()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["players"], players.len());
}

#[tokio::test]
async fn search_returns_ranked_summaries() {
    let (store, _) = seeded(today());
    let (status, body) = send(
        app_with(store, DailySelector::default()),
        get("/api/players/search?q=salah"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().expect("array body");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Mohamed Salah");
    assert_eq!(hits[0]["team"], "Liverpool");
    assert_eq!(hits[0]["league"], "Premier League");
    assert!(hits[0]["id"].as_i64().is_some());
}

#[tokio::test]
async fn search_without_query_is_empty() {
    let (store, _) = seeded(today());
    let (status, body) = send(
        app_with(store, DailySelector::default()),
        get("/api/players/search"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn guessing_the_answer_is_correct() {
    let (store, players) = seeded(today());
    let salah = players
        .iter()
        .find(|p| p.name == "Mohamed Salah")
        .expect("salah in roster");
    let daily = DailySelector::new(Some("salah".to_string()));

    let (status, body) = send(app_with(store, daily), post_guess(salah.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["position"]["exact"], true);
    assert_eq!(body["age"]["correct"], true);
    assert_eq!(body["market_value"]["display"], "€55.00m");
}

#[tokio::test]
async fn wrong_guess_gets_directional_feedback() {
    let (store, players) = seeded(today());
    let haaland = players
        .iter()
        .find(|p| p.name == "Erling Haaland")
        .expect("haaland in roster");
    let daily = DailySelector::new(Some("salah".to_string()));

    let (status, body) = send(app_with(store, daily), post_guess(haaland.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], false);
    assert_eq!(body["team"], false);
    assert_eq!(body["league"], true);
    assert_eq!(body["position"]["exact"], false);
    assert_eq!(body["position"]["similar"], true);
    // Haaland is younger than Salah, so the answer is higher.
    assert_eq!(body["age"]["higher"], true);
}

#[tokio::test]
async fn unknown_guess_is_not_found() {
    let (store, _) = seeded(today());
    let (status, body) = send(
        app_with(store, DailySelector::default()),
        post_guess(987_654),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");
}

#[tokio::test]
async fn guess_against_empty_store_is_not_found() {
    let store = PlayerStore::open_in_memory().expect("open store");
    let (status, body) = send(app_with(store, DailySelector::default()), post_guess(1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");
}

#[tokio::test]
async fn update_players_skips_fresh_roster() {
    let seeded_on = today() - chrono::Duration::days(2);
    let (store, _) = seeded(seeded_on);
    let (status, body) = send(
        app_with(store, DailySelector::default()),
        get("/api/update-players"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "skipped");
    assert_eq!(body["days_since"], 2);
    assert_eq!(body["days_remaining"], 5);
    assert_eq!(
        body["message"],
        "Database was updated 2 days ago. Next update in 5 days."
    );
}

#[tokio::test]
async fn forced_update_reloads_roster() {
    let seeded_on = today() - chrono::Duration::days(2);
    let (store, players) = seeded(seeded_on);
    let (status, body) = send(
        app_with(store, DailySelector::default()),
        get("/api/update-players?force=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "refreshed");
    assert_eq!(body["players"], players.len());
    assert_eq!(
        body["message"],
        format!("Updated {} players", players.len())
    );
}

#[tokio::test]
async fn guess_without_id_is_not_found() {
    let (store, _) = seeded(today());
    let request = Request::builder()
        .method("POST")
        .uri("/api/guess")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "guess": {} }).to_string()))
        .expect("request");

    let (status, body) = send(app_with(store, DailySelector::default()), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");
}

#[tokio::test]
async fn malformed_guess_body_gets_json_error() {
    let (store, _) = seeded(today());
    let request = Request::builder()
        .method("POST")
        .uri("/api/guess")
        .header("content-type", "application/json")
        .body(Body::from("{\"guess\": "))
        .expect("request");

    let (status, body) = send(app_with(store, DailySelector::default()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn guess_without_json_content_type_gets_json_error() {
    let (store, _) = seeded(today());
    let request = Request::builder()
        .method("POST")
        .uri("/api/guess")
        .body(Body::from(json!({ "guess": { "id": 1 } }).to_string()))
        .expect("request");

    let (status, body) = send(app_with(store, DailySelector::default()), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());
}
