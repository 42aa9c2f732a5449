use std::net::SocketAddr;
use std::sync::Arc;

use festa_api::state::{AppState, AuthConfig};
use festa_api::app;
use festa_core::repository::{
    BookingRepository, EnrollmentRepository, HotelRepository, PaymentRepository, RoomRepository,
    TicketRepository,
};
use festa_core::{BookingService, HotelService, PaymentService, TicketService};
use festa_store::{
    DbClient, PgBookingRepository, PgEnrollmentRepository, PgHotelRepository,
    PgPaymentRepository, PgRoomRepository, PgTicketRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "festa_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = festa_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Festa API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let enrollments: Arc<dyn EnrollmentRepository> =
        Arc::new(PgEnrollmentRepository::new(db.pool.clone()));
    let tickets: Arc<dyn TicketRepository> = Arc::new(PgTicketRepository::new(db.pool.clone()));
    let rooms: Arc<dyn RoomRepository> = Arc::new(PgRoomRepository::new(db.pool.clone()));
    let bookings: Arc<dyn BookingRepository> = Arc::new(PgBookingRepository::new(db.pool.clone()));
    let hotels: Arc<dyn HotelRepository> = Arc::new(PgHotelRepository::new(db.pool.clone()));
    let payments: Arc<dyn PaymentRepository> = Arc::new(PgPaymentRepository::new(db.pool.clone()));

    let app_state = AppState {
        bookings: Arc::new(BookingService::new(
            bookings,
            enrollments.clone(),
            tickets.clone(),
            rooms,
        )),
        hotels: Arc::new(HotelService::new(hotels, enrollments.clone(), tickets.clone())),
        payments: Arc::new(PaymentService::new(payments, tickets.clone())),
        tickets: Arc::new(TicketService::new(tickets, enrollments)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
