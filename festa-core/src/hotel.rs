use std::sync::Arc;

use thiserror::Error;

use crate::models::{Hotel, HotelWithRooms, TicketStatus};
use crate::repository::{EnrollmentRepository, HotelRepository, TicketRepository};

#[derive(Debug, Error)]
pub enum HotelError {
    #[error("No result for this search!")]
    NotFound,
    #[error("Payment is required!")]
    PaymentRequired,
    #[error("repository error: {0}")]
    Repository(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Hotel listings, gated on the caller holding a paid, in-person,
/// hotel-inclusive ticket.
pub struct HotelService {
    hotels: Arc<dyn HotelRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl HotelService {
    pub fn new(
        hotels: Arc<dyn HotelRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        Self {
            hotels,
            enrollments,
            tickets,
        }
    }

    pub async fn get_hotels(&self, user_id: i32) -> Result<Vec<Hotel>, HotelError> {
        self.check_hotel_access(user_id).await?;

        let hotels = self.hotels.find_all().await?;
        if hotels.is_empty() {
            return Err(HotelError::NotFound);
        }
        Ok(hotels)
    }

    pub async fn get_hotel_with_rooms(
        &self,
        user_id: i32,
        hotel_id: i32,
    ) -> Result<HotelWithRooms, HotelError> {
        self.check_hotel_access(user_id).await?;

        self.hotels
            .find_with_rooms(hotel_id)
            .await?
            .ok_or(HotelError::NotFound)
    }

    /// Same predicate as the booking eligibility steps 1-4, but a missing
    /// enrollment is a 404 and every ticket failure is a 402.
    async fn check_hotel_access(&self, user_id: i32) -> Result<(), HotelError> {
        let enrollment = self
            .enrollments
            .find_by_user_id(user_id)
            .await?
            .ok_or(HotelError::NotFound)?;

        let ticket = self
            .tickets
            .find_first_by_enrollment_id(enrollment.id)
            .await?
            .ok_or(HotelError::PaymentRequired)?;

        let ticket_type = self
            .tickets
            .find_ticket_type_by_id(ticket.ticket_type_id)
            .await?;
        match ticket_type {
            Some(t)
                if !t.is_remote && t.includes_hotel && ticket.status == TicketStatus::Paid => {}
            _ => return Err(HotelError::PaymentRequired),
        }

        Ok(())
    }
}
