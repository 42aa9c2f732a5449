use async_trait::async_trait;

use crate::models::{
    Booking, BookingWithRoom, Enrollment, Hotel, HotelWithRooms, NewPayment, NewTicket, Payment,
    Room, Ticket, TicketDetails, TicketStatus, TicketType,
};

/// Repository trait for enrollment lookups
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for tickets and ticket-type reference data
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_ticket_types(
        &self,
    ) -> Result<Vec<TicketType>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_ticket_type_by_id(
        &self,
        ticket_type_id: i32,
    ) -> Result<Option<TicketType>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_first_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<Ticket>, Box<dyn std::error::Error + Send + Sync>>;

    /// Ticket joined with its type and owning enrollment.
    async fn find_details_by_id(
        &self,
        ticket_id: i32,
    ) -> Result<Option<TicketDetails>, Box<dyn std::error::Error + Send + Sync>>;

    async fn create(
        &self,
        ticket: NewTicket,
    ) -> Result<Ticket, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_status(
        &self,
        ticket_id: i32,
        status: TicketStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for room lookups
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(
        &self,
        room_id: i32,
    ) -> Result<Option<Room>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, Box<dyn std::error::Error + Send + Sync>>;

    async fn count_by_room_id(
        &self,
        room_id: i32,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>>;

    async fn create(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_room(
        &self,
        booking_id: i32,
        room_id: i32,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for hotel data access
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Hotel>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_with_rooms(
        &self,
        hotel_id: i32,
    ) -> Result<Option<HotelWithRooms>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for payment data access
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_ticket_id(
        &self,
        ticket_id: i32,
    ) -> Result<Option<Payment>, Box<dyn std::error::Error + Send + Sync>>;

    async fn create(
        &self,
        payment: NewPayment,
    ) -> Result<Payment, Box<dyn std::error::Error + Send + Sync>>;
}
