use axum::http::StatusCode;
use rsvp_shared::auth::{create_anonymous_request, create_test_request};
use rsvp_shared::models::{Category, RsvpStatus};
use rsvp_shared::test_utils::http_test_utils::response_to_json;
use serde_json::json;
use tower::ServiceExt;

use super::{attendee, create_test_app, days_from_now, event_at, profile, HOST_ID};

#[tokio::test]
async fn test_profile_lifecycle() {
    let (app, _store) = create_test_app();

    let response = app
        .clone()
        .oneshot(create_test_request("GET", "/profiles/me", "new-user", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(create_test_request(
            "PUT",
            "/profiles/me",
            "new-user",
            Some(json!({ "fullName": "Nora New", "username": "nora" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["id"], "new-user");
    assert_eq!(json_resp["fullName"], "Nora New");

    // fields left out keep their value
    let response = app
        .clone()
        .oneshot(create_test_request(
            "PUT",
            "/profiles/me",
            "new-user",
            Some(json!({ "avatarUrl": "https://avatars.test/nora.png" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(create_test_request("GET", "/profiles/me", "new-user", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["fullName"], "Nora New");
    assert_eq!(json_resp["username"], "nora");
    assert_eq!(json_resp["avatarUrl"], "https://avatars.test/nora.png");
    assert!(json_resp.get("full_name").is_none());
}

#[tokio::test]
async fn test_host_stats() {
    let (app, store) = create_test_app();

    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(-5), Category::Party))
        .await;
    store
        .insert_event(event_at("e2", HOST_ID, days_from_now(-2), Category::Food))
        .await;
    store
        .insert_event(event_at("e3", HOST_ID, days_from_now(3), Category::Party))
        .await;
    store
        .insert_event(event_at("other", "someone-else", days_from_now(1), Category::Movie))
        .await;
    store.insert_profile(profile("amy", "Amy")).await;
    store.insert_profile(profile("ben", "Ben")).await;
    for (event_id, user_id) in [("e1", "ben"), ("e1", "amy"), ("e2", "amy"), ("e3", "nameless"), ("other", "ben")] {
        store
            .insert_attendee(attendee(event_id, user_id, RsvpStatus::Going))
            .await;
    }

    let response = app
        .oneshot(create_test_request("GET", "/users/me/stats", HOST_ID, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;

    assert_eq!(json_resp["hasData"], true);
    assert_eq!(json_resp["totalEvents"], 3);
    assert_eq!(
        json_resp["categories"],
        json!([{ "name": "Party", "value": 2 }, { "name": "Food", "value": 1 }])
    );
    let top = json_resp["topAttendees"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["name"], "Amy");
    assert_eq!(top[0]["eventsAttended"], 2);
    assert_eq!(top[1]["name"], "Ben");
    assert_eq!(top[1]["eventsAttended"], 1);
    assert_eq!(json_resp["uniqueAttendees"], 2);
}

#[tokio::test]
async fn test_host_stats_without_events() {
    let (app, _store) = create_test_app();

    let response = app
        .clone()
        .oneshot(create_test_request("GET", "/users/me/stats", "lonely", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["hasData"], false);
    assert!(json_resp["categories"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(create_anonymous_request("GET", "/users/me/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
