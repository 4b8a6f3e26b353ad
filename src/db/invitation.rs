use uuid::Uuid;

use crate::models::{EventInvitation, Invitation, InvitationRole, UserInvitation};
use crate::PGPool;

/// Upsert keyed on `(event_id, invitee_id)`: re-inviting the same user
/// updates the role and resets the status to `pending` instead of failing
/// the uniqueness constraint.
pub async fn upsert(
    event_id: Uuid,
    inviter_id: Uuid,
    invitee_id: Uuid,
    role: InvitationRole,
    pool: &PGPool,
) -> Result<Invitation, sqlx::Error> {
    sqlx::query_as::<_, Invitation>(
        "INSERT INTO event_invitations (id, event_id, inviter_id, invitee_id, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (event_id, invitee_id) DO UPDATE
         SET role = EXCLUDED.role, status = 'pending', updated_at = now()
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(event_id)
    .bind(inviter_id)
    .bind(invitee_id)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find_by_event_and_invitee(
    event_id: Uuid,
    invitee_id: Uuid,
    pool: &PGPool,
) -> Result<Option<Invitation>, sqlx::Error> {
    sqlx::query_as::<_, Invitation>(
        "SELECT * FROM event_invitations WHERE event_id = $1 AND invitee_id = $2",
    )
    .bind(event_id)
    .bind(invitee_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_event(
    event_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<EventInvitation>, sqlx::Error> {
    sqlx::query_as::<_, EventInvitation>(
        "SELECT ei.*, u.email AS invitee_email
         FROM event_invitations ei
         JOIN users u ON u.id = ei.invitee_id
         WHERE ei.event_id = $1
         ORDER BY ei.created_at DESC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_invitee(
    invitee_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<UserInvitation>, sqlx::Error> {
    sqlx::query_as::<_, UserInvitation>(
        "SELECT ei.*, e.title AS event_title, e.event_date, e.event_time, e.location,
                u.email AS inviter_email
         FROM event_invitations ei
         JOIN events e ON e.id = ei.event_id
         JOIN users u ON u.id = ei.inviter_id
         WHERE ei.invitee_id = $1
         ORDER BY ei.created_at DESC",
    )
    .bind(invitee_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    event_id: Uuid,
    invitee_id: Uuid,
    status: &str,
    pool: &PGPool,
) -> Result<Option<Invitation>, sqlx::Error> {
    sqlx::query_as::<_, Invitation>(
        "UPDATE event_invitations
         SET status = $1, updated_at = now()
         WHERE event_id = $2 AND invitee_id = $3
         RETURNING *",
    )
    .bind(status)
    .bind(event_id)
    .bind(invitee_id)
    .fetch_optional(pool)
    .await
}

/// Delete guarded by organizer ownership of the parent event in one
/// statement, so the caller cannot tell "absent" from "not yours".
pub async fn delete(
    event_id: Uuid,
    invitee_id: Uuid,
    organizer_id: Uuid,
    pool: &PGPool,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "DELETE FROM event_invitations
         WHERE event_id = $1 AND invitee_id = $2
         AND EXISTS (SELECT 1 FROM events WHERE id = $1 AND organizer_id = $3)",
    )
    .bind(event_id)
    .bind(invitee_id)
    .bind(organizer_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}
