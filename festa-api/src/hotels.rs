use axum::{
    extract::{Extension, Path, State},
    routing::get,
    Json, Router,
};

use festa_core::models::{Hotel, HotelWithRooms};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(get_hotels))
        .route("/hotels/{hotel_id}", get(get_hotel_with_rooms))
}

async fn get_hotels(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    let hotels = state.hotels.get_hotels(user_id).await?;
    Ok(Json(hotels))
}

async fn get_hotel_with_rooms(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(hotel_id): Path<i32>,
) -> Result<Json<HotelWithRooms>, ApiError> {
    let hotel = state.hotels.get_hotel_with_rooms(user_id, hotel_id).await?;
    Ok(Json(hotel))
}
