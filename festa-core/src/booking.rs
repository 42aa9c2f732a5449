use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::models::{BookingWithRoom, TicketStatus};
use crate::repository::{
    BookingRepository, EnrollmentRepository, RoomRepository, TicketRepository,
};

const NO_PERMISSION: &str = "You have no permission for this operation";

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("No result for this search!")]
    NotFound,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("repository error: {0}")]
    Repository(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Books rooms for users whose ticket permits a hotel stay.
///
/// Every mutation re-runs the full eligibility sequence; the capacity check
/// and the subsequent write are not wrapped in a transaction, so two
/// concurrent requests can both pass the check for the last free slot. This
/// race is inherited from the system being reimplemented and intentionally
/// left in place.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    tickets: Arc<dyn TicketRepository>,
    rooms: Arc<dyn RoomRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        tickets: Arc<dyn TicketRepository>,
        rooms: Arc<dyn RoomRepository>,
    ) -> Self {
        Self {
            bookings,
            enrollments,
            tickets,
            rooms,
        }
    }

    /// The user's current booking with its room.
    pub async fn get_booking(&self, user_id: i32) -> Result<BookingWithRoom, BookingError> {
        self.bookings
            .find_by_user_id(user_id)
            .await?
            .ok_or(BookingError::NotFound)
    }

    /// Books a room for the user. Returns the new booking's id.
    pub async fn create_booking(&self, user_id: i32, room_id: i32) -> Result<i32, BookingError> {
        self.check_eligibility(user_id, room_id).await?;

        let booking = self.bookings.create(user_id, room_id).await?;
        debug!(user_id, room_id, booking_id = booking.id, "booking created");
        Ok(booking.id)
    }

    /// Moves the user's booking to another room. The eligibility sequence
    /// runs against the new room before ownership is verified; the occupant
    /// count includes the user's own booking, so moving within a room that
    /// is at capacity is rejected.
    pub async fn update_booking(
        &self,
        user_id: i32,
        booking_id: i32,
        room_id: i32,
    ) -> Result<i32, BookingError> {
        self.check_eligibility(user_id, room_id).await?;

        let current = self
            .bookings
            .find_by_user_id(user_id)
            .await?
            .ok_or(BookingError::Forbidden(NO_PERMISSION))?;
        if current.id != booking_id {
            return Err(BookingError::Forbidden(NO_PERMISSION));
        }

        let booking = self.bookings.update_room(booking_id, room_id).await?;
        debug!(user_id, room_id, booking_id, "booking moved");
        Ok(booking.id)
    }

    /// Ordered precondition sequence shared by create and update. Each
    /// failure short-circuits the rest.
    async fn check_eligibility(&self, user_id: i32, room_id: i32) -> Result<(), BookingError> {
        let enrollment = self
            .enrollments
            .find_by_user_id(user_id)
            .await?
            .ok_or(BookingError::Forbidden("User does not have an enrollment"))?;

        let ticket = self
            .tickets
            .find_first_by_enrollment_id(enrollment.id)
            .await?
            .ok_or(BookingError::Forbidden("User does not have a ticket yet"))?;
        if ticket.status != TicketStatus::Paid {
            return Err(BookingError::Forbidden("User does not pay the ticket"));
        }

        let ticket_type = self
            .tickets
            .find_ticket_type_by_id(ticket.ticket_type_id)
            .await?;
        match ticket_type {
            Some(t) if !t.is_remote && t.includes_hotel => {}
            _ => return Err(BookingError::Forbidden("This ticket does not include hotel")),
        }

        let room = self
            .rooms
            .find_by_id(room_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        let occupied = self.bookings.count_by_room_id(room_id).await?;
        if occupied >= i64::from(room.capacity) {
            return Err(BookingError::Forbidden("This room is not available"));
        }

        Ok(())
    }
}
