use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{NewPayment, Payment, TicketStatus};
use crate::repository::{PaymentRepository, TicketRepository};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Ticket not sended in query params!")]
    TicketNotSent,
    #[error("No result for this search!")]
    NotFound,
    #[error("You must be signed in to continue")]
    Unauthorized,
    #[error("repository error: {0}")]
    Repository(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Payment submission payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub ticket_id: i32,
    pub card_data: CardData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub issuer: String,
    pub number: u64,
    pub name: String,
    pub expiration_date: String,
    pub cvv: u32,
}

/// Records payments and flips the paid ticket's status.
///
/// The payment insert and the status update are two separate writes with no
/// transaction around them, the same gap the original system has: a crash in
/// between leaves a payment against a still-reserved ticket.
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentRepository>, tickets: Arc<dyn TicketRepository>) -> Self {
        Self { payments, tickets }
    }

    /// Payment for a ticket, if one was recorded. `None` when the ticket is
    /// valid and owned by the caller but has no payment yet.
    pub async fn find_by_ticket(
        &self,
        ticket_id: Option<i32>,
        user_id: i32,
    ) -> Result<Option<Payment>, PaymentError> {
        let ticket_id = match ticket_id {
            Some(id) if id != 0 => id,
            _ => return Err(PaymentError::TicketNotSent),
        };

        let details = self
            .tickets
            .find_details_by_id(ticket_id)
            .await?
            .ok_or(PaymentError::NotFound)?;
        if details.enrollment.user_id != user_id {
            return Err(PaymentError::Unauthorized);
        }

        Ok(self.payments.find_by_ticket_id(ticket_id).await?)
    }

    pub async fn create_payment(
        &self,
        input: PaymentInput,
        user_id: i32,
    ) -> Result<Payment, PaymentError> {
        let details = self
            .tickets
            .find_details_by_id(input.ticket_id)
            .await?
            .ok_or(PaymentError::NotFound)?;
        if details.enrollment.user_id != user_id {
            return Err(PaymentError::Unauthorized);
        }

        let payment = self
            .payments
            .create(NewPayment {
                ticket_id: input.ticket_id,
                value: details.ticket_type.price,
                card_issuer: input.card_data.issuer,
                card_last_digits: card_last_digits(input.card_data.number),
            })
            .await?;

        self.tickets
            .update_status(input.ticket_id, TicketStatus::Paid)
            .await?;
        debug!(ticket_id = input.ticket_id, payment_id = payment.id, "payment recorded");

        Ok(payment)
    }
}

/// Last 4 characters of the card number's decimal representation. Shorter
/// numbers are kept whole.
fn card_last_digits(number: u64) -> String {
    let digits = number.to_string();
    digits[digits.len().saturating_sub(4)..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::fixtures::*;
    use crate::memory::InMemoryStore;

    fn service(store: &InMemoryStore) -> PaymentService {
        PaymentService::new(store.payments(), store.tickets())
    }

    fn store_with_reserved_ticket() -> InMemoryStore {
        // user 2 owns enrollment 1 and reserved ticket 1
        let store = InMemoryStore::new();
        store.insert_enrollment(enrollment(1, 2));
        store.insert_ticket_type(ticket_type(1, false, true));
        store.insert_ticket(ticket(1, 1, 1, TicketStatus::Reserved));
        store
    }

    fn input(ticket_id: i32, number: u64) -> PaymentInput {
        PaymentInput {
            ticket_id,
            card_data: CardData {
                issuer: "VISA".into(),
                number,
                name: "GABRIEL".into(),
                expiration_date: "10/2029".into(),
                cvv: 155,
            },
        }
    }

    #[tokio::test]
    async fn missing_ticket_id_is_rejected() {
        let store = store_with_reserved_ticket();

        for ticket_id in [None, Some(0)] {
            let err = service(&store).find_by_ticket(ticket_id, 2).await.unwrap_err();
            assert!(matches!(err, PaymentError::TicketNotSent));
        }
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let store = store_with_reserved_ticket();

        let err = service(&store).find_by_ticket(Some(9), 2).await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
    }

    #[tokio::test]
    async fn ticket_without_enrollment_row_is_not_found() {
        let store = InMemoryStore::new();
        store.insert_ticket_type(ticket_type(1, false, true));
        store.insert_ticket(ticket(1, 9, 1, TicketStatus::Reserved));

        let err = service(&store).find_by_ticket(Some(1), 2).await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));

        let err = service(&store).create_payment(input(1, 1234), 2).await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
    }

    #[tokio::test]
    async fn foreign_ticket_is_unauthorized() {
        let store = store_with_reserved_ticket();

        let err = service(&store).find_by_ticket(Some(1), 5).await.unwrap_err();
        assert!(matches!(err, PaymentError::Unauthorized));

        let err = service(&store)
            .create_payment(input(1, 4111_1111_1111_1111), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Unauthorized));
        // failed payment must not touch the ticket
        assert_eq!(store.ticket_status(1), Some(TicketStatus::Reserved));
    }

    #[tokio::test]
    async fn unpaid_ticket_has_no_payment_row() {
        let store = store_with_reserved_ticket();

        let found = service(&store).find_by_ticket(Some(1), 2).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn creates_payment_and_marks_ticket_paid() {
        let store = store_with_reserved_ticket();

        let payment = service(&store)
            .create_payment(input(1, 7777_7777_7777_7777), 2)
            .await
            .unwrap();

        assert_eq!(payment.ticket_id, 1);
        assert_eq!(payment.value, TICKET_TYPE_PRICE);
        assert_eq!(payment.card_issuer, "VISA");
        assert_eq!(payment.card_last_digits, "7777");
        assert_eq!(store.ticket_status(1), Some(TicketStatus::Paid));

        let found = service(&store).find_by_ticket(Some(1), 2).await.unwrap();
        assert_eq!(found.unwrap().id, payment.id);
    }

    #[tokio::test]
    async fn unknown_ticket_cannot_be_paid() {
        let store = store_with_reserved_ticket();

        let err = service(&store).create_payment(input(9, 1234), 2).await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
    }

    #[test]
    fn last_digits_of_short_numbers() {
        assert_eq!(card_last_digits(7777_7777_7777_7777), "7777");
        assert_eq!(card_last_digits(123_456), "3456");
        assert_eq!(card_last_digits(42), "42");
        assert_eq!(card_last_digits(0), "0");
    }
}
