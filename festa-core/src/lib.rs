pub mod booking;
pub mod hotel;
pub mod memory;
pub mod models;
pub mod payment;
pub mod repository;
pub mod ticket;

pub use booking::{BookingError, BookingService};
pub use hotel::{HotelError, HotelService};
pub use payment::{PaymentError, PaymentService};
pub use ticket::{TicketError, TicketService};
