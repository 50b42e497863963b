use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use log::{debug, info};
use rsvp_shared::store::Store;
use std::sync::Arc;

use super::profiles_or_empty;
use crate::error::{AppError, Result};
use crate::models::AddCoHostRequest;
use crate::view::{unique_ids, CoHostView, ProfileMap};

// GET /events/:id/co-hosts
pub async fn list_co_hosts<S>(
    State(store): State<Arc<S>>,
    Path(event_id): Path<String>,
) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    store.get_event(&event_id).await?;
    let co_hosts = store.get_co_hosts_by_event(&event_id).await?;

    let user_ids = unique_ids(co_hosts.iter().map(|c| c.user_id.as_str()));
    let profiles = profiles_or_empty(store.as_ref(), &user_ids).await;

    let co_hosts: Vec<CoHostView> = co_hosts
        .into_iter()
        .map(|c| CoHostView::build(c, &profiles))
        .collect();

    Ok(Json(serde_json::json!({ "coHosts": co_hosts })))
}

// POST /events/:id/co-hosts
pub async fn add_co_host<S>(
    State(store): State<Arc<S>>,
    Path(event_id): Path<String>,
    Extension(user_id): Extension<String>,
    Json(request): Json<AddCoHostRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)>
where
    S: Store,
{
    let event = store.get_event(&event_id).await?;

    if event.host_id != user_id {
        return Err(AppError::forbidden(
            "Only the host can add co-hosts".into(),
        ));
    }

    let co_host_id = request.user_id.trim();
    if co_host_id.is_empty() {
        return Err(AppError::bad_request("userId is required".into()));
    }
    if co_host_id == event.host_id {
        return Err(AppError::bad_request(
            "The host cannot be added as a co-host".into(),
        ));
    }

    let existing = store
        .get_co_hosts_by_event(&event_id)
        .await?
        .into_iter()
        .find(|c| c.user_id == co_host_id);

    let (status, co_host) = match existing {
        Some(co_host) => {
            debug!("{} already co-hosts event {}", co_host_id, event_id);
            (StatusCode::OK, co_host)
        }
        None => {
            let co_host = store.add_co_host(&event_id, co_host_id).await?;
            info!("User {} added co-host {} to event {}", user_id, co_host_id, event_id);
            (StatusCode::CREATED, co_host)
        }
    };

    let profiles: ProfileMap = profiles_or_empty(store.as_ref(), &[co_host.user_id.clone()]).await;

    Ok((
        status,
        Json(serde_json::json!({ "coHost": CoHostView::build(co_host, &profiles) })),
    ))
}
