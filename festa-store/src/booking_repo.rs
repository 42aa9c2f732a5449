use async_trait::async_trait;
use sqlx::PgPool;

use festa_core::models::{Booking, BookingWithRoom, Room};
use festa_core::repository::BookingRepository;

use crate::room_repo::{RoomRow, ROOM_COLUMNS};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, room_id, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(booking) = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY id LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let room = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"
        ))
        .bind(booking.room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(BookingWithRoom {
            id: booking.id,
            room: Room::from(room),
        }))
    }

    async fn count_by_room_id(
        &self,
        room_id: i32,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings (user_id, room_id)
             VALUES ($1, $2)
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(user_id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_room(
        &self,
        booking_id: i32,
        room_id: i32,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET room_id = $2, updated_at = now()
             WHERE id = $1
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
