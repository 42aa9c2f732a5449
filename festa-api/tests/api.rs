use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use festa_api::auth::issue_token;
use festa_api::state::{AppState, AuthConfig};
use festa_api::app;
use festa_core::memory::fixtures::*;
use festa_core::memory::InMemoryStore;
use festa_core::models::TicketStatus;
use festa_core::{BookingService, HotelService, PaymentService, TicketService};

const SECRET: &str = "festa-test-secret";

fn app_for(store: &InMemoryStore) -> Router {
    let state = AppState {
        bookings: Arc::new(BookingService::new(
            store.bookings(),
            store.enrollments(),
            store.tickets(),
            store.rooms(),
        )),
        hotels: Arc::new(HotelService::new(
            store.hotels(),
            store.enrollments(),
            store.tickets(),
        )),
        payments: Arc::new(PaymentService::new(store.payments(), store.tickets())),
        tickets: Arc::new(TicketService::new(store.tickets(), store.enrollments())),
        auth: AuthConfig {
            secret: SECRET.into(),
        },
    };
    app(state)
}

fn bearer(user_id: i32) -> String {
    format!("Bearer {}", issue_token(SECRET, user_id, 3600).unwrap())
}

fn get(path: &str, user_id: i32) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, bearer(user_id))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, path: &str, user_id: i32, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, bearer(user_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// user 1 enrolled with a paid hotel-inclusive ticket; hotel 1 has room 1
/// with capacity 3.
fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_enrollment(enrollment(1, 1));
    store.insert_ticket_type(ticket_type(1, false, true));
    store.insert_ticket(ticket(1, 1, 1, TicketStatus::Paid));
    store.insert_hotel(hotel(1));
    store.insert_room(room(1, 1, 3));
    store
}

#[tokio::test]
async fn ticket_types_are_public() {
    let store = InMemoryStore::new();
    store.insert_ticket_type(ticket_type(1, false, true));

    let response = app_for(&store)
        .oneshot(Request::builder().uri("/tickets/types").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn protected_routes_reject_missing_or_garbage_tokens() {
    let store = seeded_store();
    let app = app_for(&store);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/booking").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/booking")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let store = seeded_store();
    let app = app_for(&store);

    // no booking yet
    let response = app.clone().oneshot(get("/booking", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/booking", 1, json!({ "roomId": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let booking_id = body["bookingId"].as_i64().unwrap();

    let response = app.clone().oneshot(get("/booking", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"].as_i64().unwrap(), booking_id);
    assert_eq!(body["Room"]["id"], 1);
}

#[tokio::test]
async fn full_room_yields_403_with_message() {
    let store = seeded_store();
    store.insert_booking(booking(1, 2, 1));
    store.insert_booking(booking(2, 3, 1));
    store.insert_booking(booking(3, 4, 1));

    let response = app_for(&store)
        .oneshot(send_json("POST", "/booking", 1, json!({ "roomId": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "This room is not available");
}

#[tokio::test]
async fn unknown_room_yields_404() {
    let store = seeded_store();

    let response = app_for(&store)
        .oneshot(send_json("POST", "/booking", 1, json!({ "roomId": 42 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moving_a_booking_checks_ownership() {
    let store = seeded_store();
    store.insert_room(room(2, 1, 2));
    store.insert_booking(booking(5, 1, 1));

    let app = app_for(&store);

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/booking/99", 1, json!({ "roomId": 2 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(send_json("PUT", "/booking/5", 1, json!({ "roomId": 2 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bookingId"], 5);
}

#[tokio::test]
async fn hotels_require_a_paid_hotel_ticket() {
    // reserved ticket only
    let store = InMemoryStore::new();
    store.insert_enrollment(enrollment(1, 1));
    store.insert_ticket_type(ticket_type(1, false, true));
    store.insert_ticket(ticket(1, 1, 1, TicketStatus::Reserved));
    store.insert_hotel(hotel(1));

    let response = app_for(&store).oneshot(get("/hotels", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn hotels_list_and_detail() {
    let store = seeded_store();
    store.insert_room(room(2, 1, 2));

    let app = app_for(&store);

    let response = app.clone().oneshot(get("/hotels", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app.clone().oneshot(get("/hotels/1", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["Rooms"].as_array().unwrap().len(), 2);

    let response = app.oneshot(get("/hotels/9", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_query_requires_ticket_id() {
    let store = seeded_store();

    let response = app_for(&store).oneshot(get("/payments", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_ticket_payment_is_unauthorized() {
    let store = seeded_store();
    let app = app_for(&store);

    let response = app
        .clone()
        .oneshot(get("/payments?ticketId=1", 7))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(send_json(
            "POST",
            "/payments/process",
            7,
            json!({
                "ticketId": 1,
                "cardData": {
                    "issuer": "VISA",
                    "number": 4111111111111111u64,
                    "name": "GABRIEL",
                    "expirationDate": "10/2029",
                    "cvv": 155
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn processing_a_payment_marks_the_ticket_paid() {
    let store = InMemoryStore::new();
    store.insert_enrollment(enrollment(1, 1));
    store.insert_ticket_type(ticket_type(1, false, true));
    store.insert_ticket(ticket(1, 1, 1, TicketStatus::Reserved));

    let app = app_for(&store);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/payments/process",
            1,
            json!({
                "ticketId": 1,
                "cardData": {
                    "issuer": "MASTERCARD",
                    "number": 5105105105105100u64,
                    "name": "GABRIEL",
                    "expirationDate": "10/2029",
                    "cvv": 155
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cardIssuer"], "MASTERCARD");
    assert_eq!(body["cardLastDigits"], "5100");
    assert_eq!(body["value"], TICKET_TYPE_PRICE);
    assert_eq!(store.ticket_status(1), Some(TicketStatus::Paid));

    let response = app.oneshot(get("/payments?ticketId=1", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ticketId"], 1);
}

#[tokio::test]
async fn ticket_reservation_over_http() {
    let store = InMemoryStore::new();
    store.insert_enrollment(enrollment(1, 1));
    store.insert_ticket_type(ticket_type(2, false, true));

    let app = app_for(&store);

    // nothing reserved yet
    let response = app.clone().oneshot(get("/tickets", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/tickets", 1, json!({ "ticketTypeId": 2 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "RESERVED");
    assert_eq!(body["TicketType"]["id"], 2);

    let response = app.oneshot(get("/tickets", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unenrolled_user_cannot_reserve_a_ticket() {
    let store = InMemoryStore::new();
    store.insert_ticket_type(ticket_type(1, false, true));

    let response = app_for(&store)
        .oneshot(send_json("POST", "/tickets", 1, json!({ "ticketTypeId": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
