use axum::http::StatusCode;
use chrono::Utc;
use rsvp_shared::auth::{create_anonymous_request, create_test_request};
use rsvp_shared::models::{Category, Photo};
use rsvp_shared::test_utils::http_test_utils::response_to_json;
use rsvp_shared::test_utils::mock_store::MOCK_STORAGE_URL;
use serde_json::json;
use tower::ServiceExt;

use super::{create_test_app, days_from_now, event_at, HOST_ID};

#[tokio::test]
async fn test_upload_photo_from_data() {
    let (app, store) = create_test_app();
    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(-1), Category::Picnic))
        .await;

    let response = app
        .oneshot(create_test_request(
            "POST",
            "/events/e1/photos",
            "guest-1",
            Some(json!({
                "data": "data:image/png;base64,aGVsbG8=",
                "contentType": "image/png",
                "altText": "Sunset"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json_resp = response_to_json(response).await;
    let src = json_resp["photo"]["src"].as_str().unwrap();
    assert!(src.starts_with(&format!("{}/e1/", MOCK_STORAGE_URL)));
    assert!(src.ends_with(".png"));
    assert_eq!(json_resp["photo"]["alt"], "Sunset");
    assert_eq!(json_resp["photo"]["uploadedBy"], "guest-1");

    let path = src.trim_start_matches(&format!("{}/", MOCK_STORAGE_URL));
    let (content_type, bytes) = store.object(path).await.unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn test_upload_photo_from_url() {
    let (app, store) = create_test_app();
    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(-1), Category::Picnic))
        .await;

    let response = app
        .oneshot(create_test_request(
            "POST",
            "/events/e1/photos",
            "guest-1",
            Some(json!({ "url": "https://img.test/cat.jpg" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["photo"]["src"], "https://img.test/cat.jpg");
    assert_eq!(json_resp["photo"]["alt"], "Event photo");
}

#[tokio::test]
async fn test_upload_photo_rejects_bad_input() {
    let (app, store) = create_test_app();
    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(-1), Category::Picnic))
        .await;

    let cases = vec![
        json!({}),
        json!({ "url": "https://img.test/a.jpg", "data": "aGVsbG8=", "contentType": "image/png" }),
        json!({ "data": "aGVsbG8=" }),
        json!({ "data": "aGVsbG8=", "contentType": "application/pdf" }),
        json!({ "data": "%%%", "contentType": "image/png" }),
    ];

    for payload in cases {
        let response = app
            .clone()
            .oneshot(create_test_request(
                "POST",
                "/events/e1/photos",
                "guest-1",
                Some(payload.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "payload {} should be rejected",
            payload
        );
    }

    let response = app
        .oneshot(create_test_request(
            "POST",
            "/events/missing/photos",
            "guest-1",
            Some(json!({ "url": "https://img.test/a.jpg" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_photos() {
    let (app, store) = create_test_app();
    store
        .insert_event(event_at("e1", HOST_ID, days_from_now(-1), Category::Picnic))
        .await;
    store
        .insert_photo(Photo {
            id: "p1".into(),
            event_id: "e1".into(),
            uploaded_by: HOST_ID.into(),
            url: "https://img.test/1.jpg".into(),
            alt_text: Some("Blanket".into()),
            created_at: Utc::now(),
        })
        .await;

    let response = app
        .oneshot(create_anonymous_request("GET", "/events/e1/photos", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_resp = response_to_json(response).await;
    let photos = json_resp["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["alt"], "Blanket");
}
