use axum::http::StatusCode;
use rsvp_shared::auth::{create_anonymous_request, create_test_request};
use rsvp_shared::models::{Category, RsvpStatus};
use rsvp_shared::test_utils::http_test_utils::response_to_json;
use serde_json::json;
use tower::ServiceExt;

use super::{attendee, create_test_app, days_from_now, event_at, profile, HOST_ID};

#[tokio::test]
async fn test_create_event() {
    let (app, store) = create_test_app();

    let payload = json!({
        "title": "Summer Beach Party",
        "description": "Bring sunscreen",
        "date": "2030-07-04",
        "time": "18:30",
        "location": "Bondi",
        "category": "party",
        "isPrivate": false,
        "eventPassword": "ignored"
    });

    let response = app
        .oneshot(create_test_request("POST", "/events", HOST_ID, Some(payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json_resp = response_to_json(response).await;

    let id = json_resp["event"]["id"].as_str().unwrap().to_string();
    assert_eq!(json_resp["redirectTo"], format!("/events/{}", id));
    assert_eq!(json_resp["event"]["hostId"], HOST_ID);
    assert!(json_resp["event"].get("host_id").is_none());
    assert_eq!(json_resp["event"]["date"], "2030-07-04T18:30:00Z");
    assert!(json_resp["event"].get("event_password").is_none());

    let stored = store.all_events().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, Category::Party);
    assert!(stored[0].event_password.is_none());
}

#[tokio::test]
async fn test_create_event_validation() {
    let (app, store) = create_test_app();

    let missing_time = json!({ "title": "Picnic", "date": "2030-07-04", "category": "picnic" });
    let response = app
        .clone()
        .oneshot(create_test_request("POST", "/events", HOST_ID, Some(missing_time)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_to_json(response).await["error"], "Missing required fields");

    let private_without_password = json!({
        "title": "Secret dinner",
        "date": "2030-07-04",
        "time": "19:00",
        "category": "food",
        "isPrivate": true
    });
    let response = app
        .clone()
        .oneshot(create_test_request(
            "POST",
            "/events",
            HOST_ID,
            Some(private_without_password),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown_category = json!({
        "title": "Gig",
        "date": "2030-07-04",
        "time": "19:00",
        "category": "concert"
    });
    let response = app
        .oneshot(create_test_request("POST", "/events", HOST_ID, Some(unknown_category)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(store.all_events().await.is_empty());
}

#[tokio::test]
async fn test_create_event_requires_auth() {
    let (app, _store) = create_test_app();

    let response = app
        .oneshot(create_anonymous_request(
            "POST",
            "/events",
            Some(json!({ "title": "x" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_events_splits_upcoming_and_past() {
    let (app, store) = create_test_app();

    store
        .insert_event(event_at("later", HOST_ID, days_from_now(5), Category::Food))
        .await;
    store
        .insert_event(event_at("old", HOST_ID, days_from_now(-3), Category::Movie))
        .await;
    store
        .insert_event(event_at("soon", "someone-else", days_from_now(1), Category::Travel))
        .await;
    store.insert_profile(profile(HOST_ID, "Hannah Host")).await;
    store
        .insert_attendee(attendee("soon", "guest-1", RsvpStatus::Going))
        .await;
    store
        .insert_attendee(attendee("soon", "guest-2", RsvpStatus::NotGoing))
        .await;

    let response = app
        .oneshot(create_anonymous_request("GET", "/events", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;

    let upcoming = json_resp["upcoming"].as_array().unwrap();
    let ids: Vec<_> = upcoming.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["soon", "later"]);
    assert_eq!(upcoming[0]["attendees"], 2);
    assert_eq!(upcoming[0]["host"]["name"], "Unknown Host");
    assert_eq!(upcoming[1]["host"]["name"], "Hannah Host");
    assert_eq!(upcoming[1]["categoryLabel"], "Food");

    let past = json_resp["past"].as_array().unwrap();
    assert_eq!(past.len(), 1);
    assert_eq!(past[0]["id"], "old");
}

#[tokio::test]
async fn test_list_upcoming_events() {
    let (app, store) = create_test_app();

    store
        .insert_event(event_at("old", HOST_ID, days_from_now(-1), Category::Movie))
        .await;
    store
        .insert_event(event_at("next", HOST_ID, days_from_now(2), Category::Picnic))
        .await;

    let response = app
        .oneshot(create_anonymous_request("GET", "/events/upcoming", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_resp = response_to_json(response).await;
    let events = json_resp["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], "next");
    assert_eq!(events[0]["image"], "/placeholder.svg?height=200&width=400");
}

#[tokio::test]
async fn test_get_event_detail() {
    let (app, store) = create_test_app();

    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(3), Category::Party))
        .await;
    store.insert_profile(profile(HOST_ID, "Hannah Host")).await;
    store.insert_profile(profile("guest-1", "Gina Guest")).await;
    for i in 1..=6 {
        store
            .insert_attendee(attendee("e1", &format!("guest-{}", i), RsvpStatus::Going))
            .await;
    }

    let response = app
        .oneshot(create_test_request("GET", "/events/e1", "guest-6", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;

    assert_eq!(json_resp["host"]["name"], "Hannah Host");
    assert_eq!(json_resp["attendeeCount"], 6);
    assert_eq!(json_resp["attendeePreview"].as_array().unwrap().len(), 5);
    assert_eq!(json_resp["additionalAttendees"], 1);
    assert_eq!(json_resp["attendees"][0]["name"], "Gina Guest");
    assert_eq!(json_resp["attendees"][1]["name"], "Unknown");
    assert_eq!(json_resp["viewerRsvp"]["userId"], "guest-6");
    assert_eq!(json_resp["viewerIsHost"], false);
    assert_eq!(json_resp["image"], "/placeholder.svg?height=400&width=800");
    assert!(json_resp.get("event_password").is_none());
}

#[tokio::test]
async fn test_get_event_survives_profile_failure() {
    let (app, store) = create_test_app();

    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(3), Category::Party))
        .await;
    store.insert_profile(profile(HOST_ID, "Hannah Host")).await;
    store
        .insert_attendee(attendee("e1", "guest-1", RsvpStatus::Maybe))
        .await;
    store.fail_profile_reads(true);

    let response = app
        .oneshot(create_anonymous_request("GET", "/events/e1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["host"]["name"], "Unknown Host");
    assert_eq!(json_resp["attendees"][0]["statusLabel"], "Maybe");
    assert!(json_resp["viewerRsvp"].is_null());
}

#[tokio::test]
async fn test_get_missing_event() {
    let (app, _store) = create_test_app();

    let response = app
        .oneshot(create_anonymous_request("GET", "/events/nope", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_to_json(response).await["error"], "Not found");
}

#[tokio::test]
async fn test_invalid_token_on_public_route() {
    let (app, _store) = create_test_app();

    let request = axum::http::Request::builder()
        .uri("/events")
        .header("authorization", "Bearer not-a-token")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard() {
    let (app, store) = create_test_app();

    for day in 1..=4 {
        store
            .insert_event(event_at(
                &format!("up-{}", day),
                HOST_ID,
                days_from_now(day),
                Category::Movie,
            ))
            .await;
    }
    store
        .insert_event(event_at("past-1", HOST_ID, days_from_now(-1), Category::Food))
        .await;
    store
        .insert_event(event_at("past-2", HOST_ID, days_from_now(-8), Category::Food))
        .await;
    store
        .insert_attendee(attendee("up-1", "guest-1", RsvpStatus::Going))
        .await;
    store
        .insert_attendee(attendee("up-3", "guest-2", RsvpStatus::Maybe))
        .await;
    // outside the first three
    store
        .insert_attendee(attendee("up-4", "guest-3", RsvpStatus::Going))
        .await;

    let response = app
        .oneshot(create_anonymous_request("GET", "/dashboard", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_resp = response_to_json(response).await;

    let upcoming = json_resp["upcomingEvents"].as_array().unwrap();
    let ids: Vec<_> = upcoming.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["up-1", "up-2", "up-3"]);
    assert_eq!(json_resp["totalAttendees"], 2);
    assert_eq!(json_resp["pastEventsCount"], 2);
}

#[tokio::test]
async fn test_seed_test_events() {
    let (app, store) = create_test_app();

    let response = app
        .oneshot(create_test_request("POST", "/events/test-data", HOST_ID, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["success"], true);
    assert_eq!(json_resp["count"], 10);

    let events = store.all_events().await;
    assert_eq!(events.len(), 10);
    assert_eq!(events[0].title, "Test Event 1");
    assert_eq!(events[0].category, Category::Movie);
    assert_eq!(events[5].category, Category::Movie);
    assert_eq!(events[9].category, Category::Picnic);
    assert_eq!(events[2].location.as_deref(), Some("Location 3"));
    assert!(events.iter().all(|e| e.host_id == HOST_ID && !e.is_private));
    assert!(events.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _store) = create_test_app();

    let response = app
        .oneshot(create_anonymous_request("GET", "/nowhere", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
