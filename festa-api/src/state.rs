use std::sync::Arc;

use festa_core::{BookingService, HotelService, PaymentService, TicketService};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub hotels: Arc<HotelService>,
    pub payments: Arc<PaymentService>,
    pub tickets: Arc<TicketService>,
    pub auth: AuthConfig,
}
