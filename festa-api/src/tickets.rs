use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use festa_core::models::{TicketType, TicketWithType};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTicketRequest {
    ticket_type_id: i32,
}

/// Reference data, readable without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/tickets/types", get(get_ticket_types))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/tickets", get(get_ticket).post(create_ticket))
}

async fn get_ticket_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketType>>, ApiError> {
    let types = state.tickets.get_ticket_types().await?;
    Ok(Json(types))
}

async fn get_ticket(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<TicketWithType>, ApiError> {
    let ticket = state.tickets.get_ticket_by_user(user_id).await?;
    Ok(Json(ticket))
}

async fn create_ticket(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketWithType>), ApiError> {
    let ticket = state
        .tickets
        .create_ticket(user_id, req.ticket_type_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}
