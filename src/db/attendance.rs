use uuid::Uuid;

use crate::models::{Attendance, AttendanceStatus, EventAttendance, UserAttendance};
use crate::PGPool;

/// Upsert keyed on `(event_id, user_id)`: answering twice overwrites the
/// status and refreshes the update timestamp.
pub async fn upsert(
    event_id: Uuid,
    user_id: Uuid,
    status: AttendanceStatus,
    pool: &PGPool,
) -> Result<Attendance, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "INSERT INTO event_attendance (id, event_id, user_id, status)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (event_id, user_id) DO UPDATE
         SET status = EXCLUDED.status, updated_at = now()
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(event_id)
    .bind(user_id)
    .bind(status.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find_by_event_and_user(
    event_id: Uuid,
    user_id: Uuid,
    pool: &PGPool,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT * FROM event_attendance WHERE event_id = $1 AND user_id = $2",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_event(
    event_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<EventAttendance>, sqlx::Error> {
    sqlx::query_as::<_, EventAttendance>(
        "SELECT ea.*, u.email AS user_email
         FROM event_attendance ea
         JOIN users u ON u.id = ea.user_id
         WHERE ea.event_id = $1
         ORDER BY ea.updated_at DESC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_user(
    user_id: Uuid,
    status: Option<AttendanceStatus>,
    pool: &PGPool,
) -> Result<Vec<UserAttendance>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, UserAttendance>(
                "SELECT ea.*, e.title AS event_title, e.event_date, e.event_time, e.location
                 FROM event_attendance ea
                 JOIN events e ON e.id = ea.event_id
                 WHERE ea.user_id = $1 AND ea.status = $2
                 ORDER BY e.event_date DESC, e.event_time DESC",
            )
            .bind(user_id)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, UserAttendance>(
                "SELECT ea.*, e.title AS event_title, e.event_date, e.event_time, e.location
                 FROM event_attendance ea
                 JOIN events e ON e.id = ea.event_id
                 WHERE ea.user_id = $1
                 ORDER BY e.event_date DESC, e.event_time DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
    }
}

/// Grouped counts per recorded status. `pending` never appears here because
/// it is never written as a row.
pub async fn status_counts(event_id: Uuid, pool: &PGPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM event_attendance WHERE event_id = $1 GROUP BY status",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}
