use async_trait::async_trait;
use sqlx::PgPool;

use festa_core::models::{NewPayment, Payment};
use festa_core::repository::PaymentRepository;

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    ticket_id: i32,
    value: i32,
    card_issuer: String,
    card_last_digits: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            ticket_id: row.ticket_id,
            value: row.value,
            card_issuer: row.card_issuer,
            card_last_digits: row.card_last_digits,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PAYMENT_COLUMNS: &str =
    "id, ticket_id, value, card_issuer, card_last_digits, created_at, updated_at";

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn find_by_ticket_id(
        &self,
        ticket_id: i32,
    ) -> Result<Option<Payment>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE ticket_id = $1 ORDER BY id LIMIT 1"
        ))
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Payment::from))
    }

    async fn create(
        &self,
        payment: NewPayment,
    ) -> Result<Payment, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "INSERT INTO payments (ticket_id, value, card_issuer, card_last_digits)
             VALUES ($1, $2, $3, $4)
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(payment.ticket_id)
        .bind(payment.value)
        .bind(payment.card_issuer)
        .bind(payment.card_last_digits)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
