use axum::{
    extract::{Extension, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use festa_core::models::Payment;
use festa_core::payment::PaymentInput;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentQuery {
    ticket_id: Option<i32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(get_payment))
        .route("/payments/process", post(process_payment))
}

/// A ticket without a recorded payment serializes as a JSON `null`, the
/// behavior the original system has for this endpoint.
async fn get_payment(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Option<Payment>>, ApiError> {
    let payment = state.payments.find_by_ticket(query.ticket_id, user_id).await?;
    Ok(Json(payment))
}

async fn process_payment(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(input): Json<PaymentInput>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state.payments.create_payment(input, user_id).await?;
    Ok(Json(payment))
}
