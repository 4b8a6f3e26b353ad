use uuid::Uuid;

use crate::dto::NewInvitationDto;
use crate::errors::ApiError;
use crate::models::{EventInvitation, Invitation, InvitationAnswer, InvitationRole, UserInvitation};
use crate::service::event::ensure_organizer;
use crate::{db, PGPool};

fn reject_self_invite(inviter: Uuid, invitee: Uuid) -> Result<(), ApiError> {
    if inviter == invitee {
        Err(ApiError::validation(
            "you cannot invite yourself to an event",
        ))
    } else {
        Ok(())
    }
}

/// Organizer-only. Re-inviting an already invited user is not an error: the
/// upsert overwrites the role and resets the status to `pending`.
pub async fn invite(
    event_id: Uuid,
    actor: Uuid,
    dto: NewInvitationDto,
    pool: &PGPool,
) -> Result<Invitation, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))?;
    ensure_organizer(&event, actor, "invite users")?;

    if db::user::find_by_id(dto.invitee_id, pool).await?.is_none() {
        return Err(ApiError::not_found("invitee not found"));
    }
    reject_self_invite(actor, dto.invitee_id)?;

    let role = dto.role.unwrap_or(InvitationRole::Attendee);
    Ok(db::invitation::upsert(event_id, actor, dto.invitee_id, role, pool).await?)
}

pub async fn event_invitations(
    event_id: Uuid,
    actor: Uuid,
    pool: &PGPool,
) -> Result<Vec<EventInvitation>, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))?;
    ensure_organizer(&event, actor, "view invitations")?;
    Ok(db::invitation::find_by_event(event_id, pool).await?)
}

pub async fn my_invitations(actor: Uuid, pool: &PGPool) -> Result<Vec<UserInvitation>, ApiError> {
    Ok(db::invitation::find_by_invitee(actor, pool).await?)
}

/// Only the invitee named on the invitation can answer, and only with
/// `accepted` or `declined` (the answer type admits nothing else). A miss
/// on `(event, actor)` is NotFound.
pub async fn respond(
    event_id: Uuid,
    actor: Uuid,
    answer: InvitationAnswer,
    pool: &PGPool,
) -> Result<Invitation, ApiError> {
    db::invitation::update_status(event_id, actor, answer.as_str(), pool)
        .await?
        .ok_or_else(|| ApiError::not_found("invitation not found"))
}

/// Organizer-only. "Absent" and "not yours" are indistinguishable to the
/// caller on purpose, so nothing leaks about whether the invitation exists.
pub async fn remove(
    event_id: Uuid,
    invitee_id: Uuid,
    actor: Uuid,
    pool: &PGPool,
) -> Result<(), ApiError> {
    if db::invitation::delete(event_id, invitee_id, actor, pool).await? {
        Ok(())
    } else {
        Err(ApiError::not_found(
            "invitation not found or you are not authorized to delete it",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_invitation_is_invalid() {
        let user = Uuid::new_v4();
        assert!(matches!(
            reject_self_invite(user, user),
            Err(ApiError::Validation(_))
        ));
        assert!(reject_self_invite(user, Uuid::new_v4()).is_ok());
    }
}
