pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod enrollment_repo;
pub mod hotel_repo;
pub mod payment_repo;
pub mod room_repo;
pub mod ticket_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use enrollment_repo::PgEnrollmentRepository;
pub use hotel_repo::PgHotelRepository;
pub use payment_repo::PgPaymentRepository;
pub use room_repo::PgRoomRepository;
pub use ticket_repo::PgTicketRepository;
