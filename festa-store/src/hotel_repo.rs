use async_trait::async_trait;
use sqlx::PgPool;

use festa_core::models::{Hotel, HotelWithRooms, Room};
use festa_core::repository::HotelRepository;

use crate::room_repo::{RoomRow, ROOM_COLUMNS};

pub struct PgHotelRepository {
    pool: PgPool,
}

impl PgHotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct HotelRow {
    id: i32,
    name: String,
    image: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<HotelRow> for Hotel {
    fn from(row: HotelRow) -> Self {
        Hotel {
            id: row.id,
            name: row.name,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const HOTEL_COLUMNS: &str = "id, name, image, created_at, updated_at";

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn find_all(&self) -> Result<Vec<Hotel>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, HotelRow>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Hotel::from).collect())
    }

    async fn find_with_rooms(
        &self,
        hotel_id: i32,
    ) -> Result<Option<HotelWithRooms>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(hotel) = sqlx::query_as::<_, HotelRow>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1"
        ))
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let rooms = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE hotel_id = $1 ORDER BY id"
        ))
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(HotelWithRooms {
            hotel: hotel.into(),
            rooms: rooms.into_iter().map(Room::from).collect(),
        }))
    }
}
