use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::models::{NewTicket, TicketStatus, TicketType, TicketWithType};
use crate::repository::{EnrollmentRepository, TicketRepository};

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("No result for this search!")]
    NotFound,
    #[error("repository error: {0}")]
    Repository(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Ticket reservation and lookup. Tickets are created `RESERVED`; only a
/// successful payment moves them to `PAID`.
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketRepository>, enrollments: Arc<dyn EnrollmentRepository>) -> Self {
        Self {
            tickets,
            enrollments,
        }
    }

    /// All ticket type reference rows, unfiltered.
    pub async fn get_ticket_types(&self) -> Result<Vec<TicketType>, TicketError> {
        Ok(self.tickets.find_ticket_types().await?)
    }

    /// The user's first ticket with its type attached.
    pub async fn get_ticket_by_user(&self, user_id: i32) -> Result<TicketWithType, TicketError> {
        let enrollment = self
            .enrollments
            .find_by_user_id(user_id)
            .await?
            .ok_or(TicketError::NotFound)?;

        let ticket = self
            .tickets
            .find_first_by_enrollment_id(enrollment.id)
            .await?
            .ok_or(TicketError::NotFound)?;

        let ticket_type = self
            .tickets
            .find_ticket_type_by_id(ticket.ticket_type_id)
            .await?;

        Ok(TicketWithType {
            ticket,
            ticket_type,
        })
    }

    /// Reserves a ticket of the given type, then re-reads the user's ticket
    /// the same way `get_ticket_by_user` does.
    pub async fn create_ticket(
        &self,
        user_id: i32,
        ticket_type_id: i32,
    ) -> Result<TicketWithType, TicketError> {
        let enrollment = self
            .enrollments
            .find_by_user_id(user_id)
            .await?
            .ok_or(TicketError::NotFound)?;

        let ticket = self
            .tickets
            .create(NewTicket {
                ticket_type_id,
                enrollment_id: enrollment.id,
                status: TicketStatus::Reserved,
            })
            .await?;
        debug!(user_id, ticket_id = ticket.id, "ticket reserved");

        self.get_ticket_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::fixtures::*;
    use crate::memory::InMemoryStore;

    fn service(store: &InMemoryStore) -> TicketService {
        TicketService::new(store.tickets(), store.enrollments())
    }

    #[tokio::test]
    async fn lists_ticket_types() {
        let store = InMemoryStore::new();
        store.insert_ticket_type(ticket_type(1, false, true));
        store.insert_ticket_type(ticket_type(2, true, false));

        let types = service(&store).get_ticket_types().await.unwrap();
        assert_eq!(types.len(), 2);
    }

    #[tokio::test]
    async fn returns_ticket_with_its_type() {
        let store = InMemoryStore::new();
        store.insert_enrollment(enrollment(1, 1));
        store.insert_ticket_type(ticket_type(3, false, true));
        store.insert_ticket(ticket(1, 1, 3, TicketStatus::Paid));

        let found = service(&store).get_ticket_by_user(1).await.unwrap();
        assert_eq!(found.ticket.id, 1);
        assert_eq!(found.ticket_type.unwrap().id, 3);
    }

    #[tokio::test]
    async fn missing_enrollment_is_not_found() {
        let store = InMemoryStore::new();

        let err = service(&store).get_ticket_by_user(1).await.unwrap_err();
        assert!(matches!(err, TicketError::NotFound));

        let err = service(&store).create_ticket(1, 1).await.unwrap_err();
        assert!(matches!(err, TicketError::NotFound));
    }

    #[tokio::test]
    async fn missing_ticket_is_not_found() {
        let store = InMemoryStore::new();
        store.insert_enrollment(enrollment(1, 1));

        let err = service(&store).get_ticket_by_user(1).await.unwrap_err();
        assert!(matches!(err, TicketError::NotFound));
    }

    #[tokio::test]
    async fn reserves_a_ticket() {
        let store = InMemoryStore::new();
        store.insert_enrollment(enrollment(1, 1));
        store.insert_ticket_type(ticket_type(2, false, true));

        let created = service(&store).create_ticket(1, 2).await.unwrap();
        assert_eq!(created.ticket.status, TicketStatus::Reserved);
        assert_eq!(created.ticket.enrollment_id, 1);
        assert_eq!(created.ticket_type.unwrap().id, 2);
    }
}
