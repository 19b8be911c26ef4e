use axum::http::{Method, StatusCode};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::json;

use crate::test_utils::{session_from, TestApp};

#[tokio::test]
async fn test_unauthenticated_calls_are_rejected() {
    let app = TestApp::new().await;

    for uri in ["/api/status", "/api/medications", "/api/sleep"] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, json!({ "error": "Unauthorized" }));
    }

    let response = app.get("/api/status", "made-up-token").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_round_trip() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    let check = app.get("/api/check-session", &token).await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body["authenticated"], true);
    assert_eq!(check.body["username"], "parent");
    assert_eq!(check.body["baby"]["dateOfBirth"], "2024-01-02");

    let logout = app.request(Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(logout.body, json!({ "success": true }));

    let check = app.get("/api/check-session", &token).await;
    assert_eq!(check.status, StatusCode::UNAUTHORIZED);
    assert_eq!(check.body, json!({ "authenticated": false }));

    let bad_login = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "parent", "password": "wrong password" })),
        )
        .await;
    assert_eq!(bad_login.status, StatusCode::UNAUTHORIZED);

    let login = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "parent", "password": "correct horse" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let token = session_from(&login.headers).unwrap();
    assert_eq!(app.get("/api/check-session", &token).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_invitation_code_is_forbidden_and_creates_nothing() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "username": "stranger",
                "password": "correct horse",
                "babyName": "Bo",
                "dateOfBirth": "2024-01-02",
                "invitationCode": "guess",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(session_from(&response.headers).is_none());
    let counts = app
        .connection
        .read(|db| (db.accounts.len(), db.babies.len()))
        .await;
    assert_eq!(counts, (0, 0));
}

#[tokio::test]
async fn test_medication_crud() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    let created = app
        .post(
            "/api/medications",
            &token,
            json!({ "id": "dose-1", "name": "Alvedon", "timestamp": "2024-03-01T08:00:00Z" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["id"], "dose-1");
    assert_eq!(created.body["timestamp"], "2024-03-01T08:00:00.000Z");
    assert!(created.body["updatedAt"].is_string());

    let updated = app
        .put(
            "/api/medications/dose-1",
            &token,
            json!({ "timestamp": "2024-03-01T09:30:00Z" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["timestamp"], "2024-03-01T09:30:00.000Z");
    assert_eq!(updated.body["name"], "Alvedon");

    let listed = app.get("/api/medications", &token).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let deleted = app.delete("/api/medications/dose-1", &token).await;
    assert_eq!(deleted.body, json!({ "success": true, "deleted": true }));
    let deleted_again = app.delete("/api/medications/dose-1", &token).await;
    assert_eq!(deleted_again.status, StatusCode::OK);
    assert_eq!(deleted_again.body, json!({ "success": true, "deleted": false }));
}

#[tokio::test]
async fn test_proposed_id_collision_is_a_conflict() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    let body = json!({ "id": "bath-1" });
    assert_eq!(app.post("/api/baths", &token, body.clone()).await.status, StatusCode::OK);
    assert_eq!(app.post("/api/baths", &token, body).await.status, StatusCode::CONFLICT);
    assert_eq!(app.get("/api/baths", &token).await.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_timestamp_is_a_bad_request() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    let response = app
        .post("/api/feedings", &token, json!({ "timestamp": "soon", "breast": "left" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("timestamp"));
}

#[tokio::test]
async fn test_cross_baby_access_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    app.post(
        "/api/diapers",
        &alice,
        json!({ "id": "diaper-1", "type": "pee" }),
    )
    .await;

    let update = app
        .put(
            "/api/diapers/diaper-1",
            &bob,
            json!({ "timestamp": "2024-03-01T08:00:00Z", "type": "poo" }),
        )
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let delete = app.delete("/api/diapers/diaper-1", &bob).await;
    assert_eq!(delete.body["deleted"], false);
    assert!(app.get("/api/diapers", &bob).await.body.as_array().unwrap().is_empty());

    let alices = app.get("/api/diapers", &alice).await;
    assert_eq!(alices.body[0]["type"], "pee");
}

#[tokio::test]
async fn test_id_taken_by_other_baby_gets_a_fresh_one() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let body = json!({ "id": "bath-1" });
    assert_eq!(app.post("/api/baths", &alice, body.clone()).await.status, StatusCode::OK);
    let created = app.post("/api/baths", &bob, body).await;

    assert_eq!(created.status, StatusCode::OK);
    assert_ne!(created.body["id"], "bath-1");
    let bobs = app.get("/api/baths", &bob).await;
    assert_eq!(bobs.body[0]["id"], created.body["id"]);
}

#[tokio::test]
async fn test_day_keyed_upsert_and_update() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    let absent = app
        .put("/api/vitamin-d/2024-03-01", &token, json!({ "taken": true }))
        .await;
    assert_eq!(absent.status, StatusCode::NOT_FOUND);

    app.post(
        "/api/vitamin-d",
        &token,
        json!({ "date": "2024-03-01", "taken": false }),
    )
    .await;
    app.post(
        "/api/vitamin-d",
        &token,
        json!({ "date": "2024-03-01", "taken": true }),
    )
    .await;
    let listed = app.get("/api/vitamin-d", &token).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["taken"], true);

    let updated = app
        .put(
            "/api/belly-button/2024-03-01",
            &token,
            json!({ "morning": true, "evening": false }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::NOT_FOUND);

    let bad_key = app.delete("/api/sleep/last-night", &token).await;
    assert_eq!(bad_key.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sleep_endpoints_are_independent() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    let created = app
        .post(
            "/api/sleep",
            &token,
            json!({ "date": "2024-03-01", "bedTime": "2024-03-01T19:00:00Z" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["wakeTime"], serde_json::Value::Null);

    let updated = app
        .put(
            "/api/sleep/2024-03-01",
            &token,
            json!({
                "bedTime": "2024-03-01T19:00:00Z",
                "wakeTime": "2024-03-02T06:00:00Z",
                "comment": "woke once",
            }),
        )
        .await;
    assert_eq!(updated.body["wakeTime"], "2024-03-02T06:00:00.000Z");
    assert_eq!(updated.body["comment"], "woke once");
}

#[tokio::test]
async fn test_status_snapshot_is_windowed_and_scoped() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;
    let now = Utc::now();
    let at = |days: i64| (now - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true);

    app.post("/api/diapers", &token, json!({ "type": "pee", "timestamp": at(1) }))
        .await;
    app.post("/api/diapers", &token, json!({ "type": "poo", "timestamp": at(5) }))
        .await;
    app.post("/api/medications", &token, json!({ "name": "Ipren", "timestamp": at(30) }))
        .await;

    let status = app.get("/api/status", &token).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["diapers"].as_array().unwrap().len(), 1);
    assert_eq!(status.body["diapers"][0]["type"], "pee");
    assert_eq!(status.body["medications"].as_array().unwrap().len(), 1);
    for key in ["feedings", "vitaminD", "baths", "bellyButton", "sleep"] {
        assert!(status.body[key].is_array(), "missing {key}");
    }
}

#[tokio::test]
async fn test_since_filter() {
    let app = TestApp::new().await;
    let token = app.register("parent").await;

    for timestamp in ["2024-03-01T08:00:00Z", "2024-03-03T08:00:00Z"] {
        app.post("/api/feedings", &token, json!({ "timestamp": timestamp }))
            .await;
    }
    let recent = app
        .get("/api/feedings?since=2024-03-02T00:00:00Z", &token)
        .await;
    assert_eq!(recent.body.as_array().unwrap().len(), 1);

    let bad = app.get("/api/vitamin-d?since=yesterday", &token).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}
