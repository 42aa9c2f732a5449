//! In-memory repository implementations backed by a single shared state.
//!
//! These exist for tests: service unit tests and the HTTP router tests both
//! run against them instead of Postgres. Not intended for production use.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::models::{
    Booking, BookingWithRoom, Enrollment, Hotel, HotelWithRooms, NewPayment, NewTicket, Payment,
    Room, Ticket, TicketDetails, TicketStatus, TicketType,
};
use crate::repository::{
    BookingRepository, EnrollmentRepository, HotelRepository, PaymentRepository, RoomRepository,
    TicketRepository,
};

#[derive(Default)]
struct State {
    enrollments: Vec<Enrollment>,
    ticket_types: Vec<TicketType>,
    tickets: Vec<Ticket>,
    hotels: Vec<Hotel>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    payments: Vec<Payment>,
}

fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0) + 1
}

/// Owns the shared state and hands out repository views over it.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_enrollment(&self, row: Enrollment) {
        self.state.lock().unwrap().enrollments.push(row);
    }

    pub fn insert_ticket_type(&self, row: TicketType) {
        self.state.lock().unwrap().ticket_types.push(row);
    }

    pub fn insert_ticket(&self, row: Ticket) {
        self.state.lock().unwrap().tickets.push(row);
    }

    pub fn insert_hotel(&self, row: Hotel) {
        self.state.lock().unwrap().hotels.push(row);
    }

    pub fn insert_room(&self, row: Room) {
        self.state.lock().unwrap().rooms.push(row);
    }

    pub fn insert_booking(&self, row: Booking) {
        self.state.lock().unwrap().bookings.push(row);
    }

    pub fn insert_payment(&self, row: Payment) {
        self.state.lock().unwrap().payments.push(row);
    }

    /// Current status of a ticket, for asserting on transitions.
    pub fn ticket_status(&self, ticket_id: i32) -> Option<TicketStatus> {
        self.state
            .lock()
            .unwrap()
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .map(|t| t.status)
    }

    pub fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        Arc::new(MemEnrollments(self.state.clone()))
    }

    pub fn tickets(&self) -> Arc<dyn TicketRepository> {
        Arc::new(MemTickets(self.state.clone()))
    }

    pub fn rooms(&self) -> Arc<dyn RoomRepository> {
        Arc::new(MemRooms(self.state.clone()))
    }

    pub fn bookings(&self) -> Arc<dyn BookingRepository> {
        Arc::new(MemBookings(self.state.clone()))
    }

    pub fn hotels(&self) -> Arc<dyn HotelRepository> {
        Arc::new(MemHotels(self.state.clone()))
    }

    pub fn payments(&self) -> Arc<dyn PaymentRepository> {
        Arc::new(MemPayments(self.state.clone()))
    }
}

struct MemEnrollments(Arc<Mutex<State>>);

#[async_trait]
impl EnrollmentRepository for MemEnrollments {
    async fn find_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        Ok(state
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id)
            .cloned())
    }
}

struct MemTickets(Arc<Mutex<State>>);

#[async_trait]
impl TicketRepository for MemTickets {
    async fn find_ticket_types(
        &self,
    ) -> Result<Vec<TicketType>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0.lock().unwrap().ticket_types.clone())
    }

    async fn find_ticket_type_by_id(
        &self,
        ticket_type_id: i32,
    ) -> Result<Option<TicketType>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        Ok(state
            .ticket_types
            .iter()
            .find(|t| t.id == ticket_type_id)
            .cloned())
    }

    async fn find_first_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<Ticket>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        Ok(state
            .tickets
            .iter()
            .find(|t| t.enrollment_id == enrollment_id)
            .cloned())
    }

    async fn find_details_by_id(
        &self,
        ticket_id: i32,
    ) -> Result<Option<TicketDetails>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        let Some(ticket) = state.tickets.iter().find(|t| t.id == ticket_id).cloned() else {
            return Ok(None);
        };
        // A dangling enrollment reference reads as an absent ticket, the
        // same not-found the payment flow reports for a missing ticket.
        let Some(enrollment) = state
            .enrollments
            .iter()
            .find(|e| e.id == ticket.enrollment_id)
            .cloned()
        else {
            return Ok(None);
        };
        let ticket_type = state
            .ticket_types
            .iter()
            .find(|t| t.id == ticket.ticket_type_id)
            .cloned()
            .ok_or("ticket references unknown ticket type")?;
        Ok(Some(TicketDetails {
            ticket,
            ticket_type,
            enrollment,
        }))
    }

    async fn create(
        &self,
        ticket: NewTicket,
    ) -> Result<Ticket, Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.0.lock().unwrap();
        let now = chrono::Utc::now();
        let row = Ticket {
            id: next_id(state.tickets.iter().map(|t| t.id)),
            ticket_type_id: ticket.ticket_type_id,
            enrollment_id: ticket.enrollment_id,
            status: ticket.status,
            created_at: now,
            updated_at: now,
        };
        state.tickets.push(row.clone());
        Ok(row)
    }

    async fn update_status(
        &self,
        ticket_id: i32,
        status: TicketStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.0.lock().unwrap();
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or("no such ticket")?;
        ticket.status = status;
        ticket.updated_at = chrono::Utc::now();
        Ok(())
    }
}

struct MemRooms(Arc<Mutex<State>>);

#[async_trait]
impl RoomRepository for MemRooms {
    async fn find_by_id(
        &self,
        room_id: i32,
    ) -> Result<Option<Room>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        Ok(state.rooms.iter().find(|r| r.id == room_id).cloned())
    }
}

struct MemBookings(Arc<Mutex<State>>);

#[async_trait]
impl BookingRepository for MemBookings {
    async fn find_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        let Some(booking) = state.bookings.iter().find(|b| b.user_id == user_id) else {
            return Ok(None);
        };
        let room = state
            .rooms
            .iter()
            .find(|r| r.id == booking.room_id)
            .cloned()
            .ok_or("booking references unknown room")?;
        Ok(Some(BookingWithRoom {
            id: booking.id,
            room,
        }))
    }

    async fn count_by_room_id(
        &self,
        room_id: i32,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        Ok(state.bookings.iter().filter(|b| b.room_id == room_id).count() as i64)
    }

    async fn create(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.0.lock().unwrap();
        let now = chrono::Utc::now();
        let row = Booking {
            id: next_id(state.bookings.iter().map(|b| b.id)),
            user_id,
            room_id,
            created_at: now,
            updated_at: now,
        };
        state.bookings.push(row.clone());
        Ok(row)
    }

    async fn update_room(
        &self,
        booking_id: i32,
        room_id: i32,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.0.lock().unwrap();
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or("no such booking")?;
        booking.room_id = room_id;
        booking.updated_at = chrono::Utc::now();
        Ok(booking.clone())
    }
}

struct MemHotels(Arc<Mutex<State>>);

#[async_trait]
impl HotelRepository for MemHotels {
    async fn find_all(&self) -> Result<Vec<Hotel>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0.lock().unwrap().hotels.clone())
    }

    async fn find_with_rooms(
        &self,
        hotel_id: i32,
    ) -> Result<Option<HotelWithRooms>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        let Some(hotel) = state.hotels.iter().find(|h| h.id == hotel_id).cloned() else {
            return Ok(None);
        };
        let rooms = state
            .rooms
            .iter()
            .filter(|r| r.hotel_id == hotel_id)
            .cloned()
            .collect();
        Ok(Some(HotelWithRooms { hotel, rooms }))
    }
}

struct MemPayments(Arc<Mutex<State>>);

#[async_trait]
impl PaymentRepository for MemPayments {
    async fn find_by_ticket_id(
        &self,
        ticket_id: i32,
    ) -> Result<Option<Payment>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.0.lock().unwrap();
        Ok(state
            .payments
            .iter()
            .find(|p| p.ticket_id == ticket_id)
            .cloned())
    }

    async fn create(
        &self,
        payment: NewPayment,
    ) -> Result<Payment, Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.0.lock().unwrap();
        let now = chrono::Utc::now();
        let row = Payment {
            id: next_id(state.payments.iter().map(|p| p.id)),
            ticket_id: payment.ticket_id,
            value: payment.value,
            card_issuer: payment.card_issuer,
            card_last_digits: payment.card_last_digits,
            created_at: now,
            updated_at: now,
        };
        state.payments.push(row.clone());
        Ok(row)
    }
}

/// Row builders for seeding an [`InMemoryStore`] in tests.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::models::{Booking, Enrollment, Hotel, Room, Ticket, TicketStatus, TicketType};

    pub const TICKET_TYPE_PRICE: i32 = 25_000;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    pub fn enrollment(id: i32, user_id: i32) -> Enrollment {
        Enrollment {
            id,
            user_id,
            name: format!("enrollee {user_id}"),
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn ticket_type(id: i32, is_remote: bool, includes_hotel: bool) -> TicketType {
        TicketType {
            id,
            name: format!("type {id}"),
            price: TICKET_TYPE_PRICE,
            is_remote,
            includes_hotel,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn ticket(id: i32, enrollment_id: i32, ticket_type_id: i32, status: TicketStatus) -> Ticket {
        Ticket {
            id,
            ticket_type_id,
            enrollment_id,
            status,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn hotel(id: i32) -> Hotel {
        Hotel {
            id,
            name: format!("hotel {id}"),
            image: format!("https://img.example/hotel-{id}.jpg"),
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn room(id: i32, hotel_id: i32, capacity: i32) -> Room {
        Room {
            id,
            name: format!("{id:03}"),
            capacity,
            hotel_id,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn booking(id: i32, user_id: i32, room_id: i32) -> Booking {
        Booking {
            id,
            user_id,
            room_id,
            created_at: now(),
            updated_at: now(),
        }
    }
}
