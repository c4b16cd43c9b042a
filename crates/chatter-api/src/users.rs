use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use chatter_presence::PresenceChange;
use chatter_types::api::{AvatarRequest, OfflineRequest, OnlineRequest, SuccessResponse};
use chatter_types::models::PresenceEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/users/online
///
/// Marks the user online. The first time a username joins the online list it
/// is also recorded in the user directory if it has never been seen there.
pub async fn go_online(
    State(state): State<AppState>,
    payload: Result<Json<OnlineRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(req) = payload?;
    // An empty avatar counts as "not provided".
    let avatar = req.avatar.as_deref().filter(|a| !a.is_empty());

    let change = state.presence.mark_online(&req.username, avatar).await;

    if let PresenceChange::Joined { avatar } = change {
        let created = state
            .db
            .ensure_user(&req.username, &avatar)
            .await
            .map_err(ApiError::internal("Failed to mark user online"))?;
        if created {
            info!("New user registered: {}", req.username);
        }
    }

    Ok(Json(SuccessResponse::OK))
}

/// POST /api/users/offline
pub async fn go_offline(
    State(state): State<AppState>,
    payload: Result<Json<OfflineRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(req) = payload?;
    state.presence.mark_offline(&req.username).await;
    Ok(Json(SuccessResponse::OK))
}

/// GET /api/users/online: evicts stale entries, then lists the rest.
pub async fn get_online(State(state): State<AppState>) -> Json<Vec<PresenceEntry>> {
    Json(state.presence.list_online().await)
}

/// POST /api/users/avatar
///
/// The online entry (if any) is updated even when the user directory has no
/// record; the request still fails with 404 in that case.
pub async fn set_avatar(
    State(state): State<AppState>,
    payload: Result<Json<AvatarRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(req) = payload?;

    state.presence.set_avatar(&req.username, &req.avatar).await;

    let found = state
        .db
        .update_avatar(&req.username, &req.avatar)
        .await
        .map_err(ApiError::internal("Failed to update avatar"))?;

    if !found {
        return Err(ApiError::NotFound("User not found"));
    }

    Ok(Json(SuccessResponse::OK))
}
