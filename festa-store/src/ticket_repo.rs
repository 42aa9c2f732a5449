use async_trait::async_trait;
use sqlx::PgPool;

use festa_core::models::{
    Enrollment, NewTicket, Ticket, TicketDetails, TicketStatus, TicketType,
};
use festa_core::repository::TicketRepository;

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i32,
    ticket_type_id: i32,
    enrollment_id: i32,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct TicketTypeRow {
    id: i32,
    name: String,
    price: i32,
    is_remote: bool,
    includes_hotel: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

fn parse_status(status: &str) -> Result<TicketStatus, Box<dyn std::error::Error + Send + Sync>> {
    match status {
        "RESERVED" => Ok(TicketStatus::Reserved),
        "PAID" => Ok(TicketStatus::Paid),
        other => Err(format!("unknown ticket status: {other}").into()),
    }
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Ticket {
            id: self.id,
            ticket_type_id: self.ticket_type_id,
            enrollment_id: self.enrollment_id,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<TicketTypeRow> for TicketType {
    fn from(row: TicketTypeRow) -> Self {
        TicketType {
            id: row.id,
            name: row.name,
            price: row.price,
            is_remote: row.is_remote,
            includes_hotel: row.includes_hotel,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TICKET_COLUMNS: &str = "id, ticket_type_id, enrollment_id, status, created_at, updated_at";
const TICKET_TYPE_COLUMNS: &str = "id, name, price, is_remote, includes_hotel, created_at, updated_at";

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_ticket_types(
        &self,
    ) -> Result<Vec<TicketType>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, TicketTypeRow>(&format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TicketType::from).collect())
    }

    async fn find_ticket_type_by_id(
        &self,
        ticket_type_id: i32,
    ) -> Result<Option<TicketType>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, TicketTypeRow>(&format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types WHERE id = $1"
        ))
        .bind(ticket_type_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TicketType::from))
    }

    async fn find_first_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<Ticket>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE enrollment_id = $1 ORDER BY id LIMIT 1"
        ))
        .bind(enrollment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn find_details_by_id(
        &self,
        ticket_id: i32,
    ) -> Result<Option<TicketDetails>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(row) = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let ticket = row.into_ticket()?;

        // A dangling enrollment reference reads as an absent ticket.
        let Some(enrollment) = sqlx::query_as::<_, EnrollmentJoinRow>(
            "SELECT id, user_id, name, created_at, updated_at
             FROM enrollments WHERE id = $1",
        )
        .bind(ticket.enrollment_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let ticket_type = sqlx::query_as::<_, TicketTypeRow>(&format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types WHERE id = $1"
        ))
        .bind(ticket.ticket_type_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(TicketDetails {
            ticket,
            ticket_type: ticket_type.into(),
            enrollment: enrollment.into(),
        }))
    }

    async fn create(
        &self,
        ticket: NewTicket,
    ) -> Result<Ticket, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "INSERT INTO tickets (ticket_type_id, enrollment_id, status)
             VALUES ($1, $2, $3)
             RETURNING {TICKET_COLUMNS}"
        ))
        .bind(ticket.ticket_type_id)
        .bind(ticket.enrollment_id)
        .bind(ticket.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_ticket()
    }

    async fn update_status(
        &self,
        ticket_id: i32,
        status: TicketStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE tickets SET status = $2, updated_at = now() WHERE id = $1")
            .bind(ticket_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentJoinRow {
    id: i32,
    user_id: i32,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<EnrollmentJoinRow> for Enrollment {
    fn from(row: EnrollmentJoinRow) -> Self {
        Enrollment {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
