use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::room::{CreateRoom, Room, RoomStatus, UpdateRoom},
    utils::ids::next_in_sequence,
};

const ROOM_ID_PREFIX: &str = "ROOM";

pub async fn create_room(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<CreateRoom>,
) -> Result<Json<Room>, AppError> {
    payload.validate()?;

    let last_id = last_public_id(&pool).await?;
    let room = Room::new(
        next_in_sequence(ROOM_ID_PREFIX, last_id.as_deref()),
        payload.name,
    );

    sqlx::query(
        "INSERT INTO rooms (id, name, status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&room.id)
    .bind(&room.name)
    .bind(room.status.as_str())
    .bind(room.created_at)
    .bind(room.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(room))
}

pub async fn list_rooms(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY id")
        .fetch_all(&pool)
        .await?;
    Ok(Json(rooms))
}

pub async fn update_room(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(room_id): Path<String>,
    Json(payload): Json<UpdateRoom>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(&room_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    // A room still hosting sessions cannot be pulled for maintenance.
    if payload.status == Some(RoomStatus::Maintenance) {
        let in_use: Option<(String,)> =
            sqlx::query_as("SELECT id FROM class_sessions WHERE room_id = $1 LIMIT 1")
                .bind(&room.id)
                .fetch_optional(&pool)
                .await?;
        if in_use.is_some() {
            return Err(AppError::Conflict(
                "Room is hosting class sessions".to_string(),
            ));
        }
    }

    sqlx::query("UPDATE rooms SET name = $1, status = $2, updated_at = $3 WHERE id = $4")
        .bind(payload.name.as_ref().unwrap_or(&room.name))
        .bind(payload.status.unwrap_or(room.status).as_str())
        .bind(Utc::now())
        .bind(&room.id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Room updated successfully" })))
}

pub async fn delete_room(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(room_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let in_use: Option<(String,)> =
        sqlx::query_as("SELECT id FROM class_sessions WHERE room_id = $1 LIMIT 1")
            .bind(&room_id)
            .fetch_optional(&pool)
            .await?;
    if in_use.is_some() {
        return Err(AppError::Conflict(
            "Room is hosting class sessions".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(&room_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Room not found".to_string()));
    }
    Ok(Json(json!({ "message": "Room deleted successfully" })))
}

async fn last_public_id(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM rooms WHERE id LIKE $1 ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
    )
    .bind(format!("{}%", ROOM_ID_PREFIX))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id,)| id))
}
