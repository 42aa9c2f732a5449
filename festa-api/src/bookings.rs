use axum::{
    extract::{Extension, Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use festa_core::models::BookingWithRoom;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingRequest {
    room_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingIdResponse {
    booking_id: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/booking", get(get_booking).post(create_booking))
        .route("/booking/{booking_id}", put(update_booking))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<BookingWithRoom>, ApiError> {
    let booking = state.bookings.get_booking(user_id).await?;
    Ok(Json(booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingIdResponse>, ApiError> {
    let booking_id = state.bookings.create_booking(user_id, req.room_id).await?;
    Ok(Json(BookingIdResponse { booking_id }))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(booking_id): Path<i32>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingIdResponse>, ApiError> {
    let booking_id = state
        .bookings
        .update_booking(user_id, booking_id, req.room_id)
        .await?;
    Ok(Json(BookingIdResponse { booking_id }))
}
