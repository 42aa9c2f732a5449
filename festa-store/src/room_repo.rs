use async_trait::async_trait;
use sqlx::PgPool;

use festa_core::models::Room;
use festa_core::repository::RoomRepository;

pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RoomRow {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            capacity: row.capacity,
            hotel_id: row.hotel_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) const ROOM_COLUMNS: &str = "id, name, capacity, hotel_id, created_at, updated_at";

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_by_id(
        &self,
        room_id: i32,
    ) -> Result<Option<Room>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Room::from))
    }
}
