use chrono::NaiveTime;
use uuid::Uuid;

use crate::db::event::{EventChanges, NewEvent};
use crate::dto::{EventDetail, NewEventDto, SearchQuery, UpdateEventDto};
use crate::errors::ApiError;
use crate::models::{AttendanceStats, Event, EventWithRole, InvitationRole, InvitedEvent};
use crate::{db, PGPool};

/// The caller's relationship to an event, as annotated on reads: organizer
/// beats invitee, strangers and anonymous callers get nothing.
pub(crate) fn role_for(
    event: &Event,
    actor: Option<Uuid>,
    invited: bool,
) -> Option<InvitationRole> {
    let actor = actor?;
    if event.organizer_id == actor {
        Some(InvitationRole::Organizer)
    } else if invited {
        Some(InvitationRole::Attendee)
    } else {
        None
    }
}

pub(crate) fn ensure_organizer(event: &Event, actor: Uuid, action: &str) -> Result<(), ApiError> {
    if event.organizer_id == actor {
        Ok(())
    } else {
        Err(ApiError::authorization(format!(
            "only the event organizer can {}",
            action
        )))
    }
}

pub(crate) fn parse_event_time(raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ApiError::validation("event time must be in HH:MM format (24-hour)"))
}

fn changes_from_dto(dto: UpdateEventDto) -> Result<EventChanges, ApiError> {
    let title = dto.title.map(|t| t.trim().to_string());
    if matches!(&title, Some(t) if t.is_empty()) {
        return Err(ApiError::validation("title cannot be empty"));
    }
    let location = dto.location.map(|l| l.trim().to_string());
    if matches!(&location, Some(l) if l.is_empty()) {
        return Err(ApiError::validation("location cannot be empty"));
    }
    Ok(EventChanges {
        title,
        description: dto.description.map(|d| d.trim().to_string()),
        event_date: dto.event_date,
        event_time: dto.event_time.as_deref().map(parse_event_time).transpose()?,
        location,
    })
}

pub async fn create(actor: Uuid, dto: NewEventDto, pool: &PGPool) -> Result<Event, ApiError> {
    let title = dto.title.trim().to_string();
    let location = dto.location.trim().to_string();
    if title.is_empty() || location.is_empty() {
        return Err(ApiError::validation("title and location are required"));
    }
    let event_time = parse_event_time(&dto.event_time)?;
    let id = Uuid::new_v4();
    db::event::create(
        &NewEvent {
            id,
            title,
            description: dto
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            event_date: dto.event_date,
            event_time,
            location,
            organizer_id: actor,
        },
        pool,
    )
    .await?;
    db::event::find_by_id(id, pool)
        .await?
        .ok_or(ApiError::Internal)
}

pub async fn organized(actor: Uuid, pool: &PGPool) -> Result<Vec<EventWithRole>, ApiError> {
    Ok(db::event::find_by_organizer(actor, pool).await?)
}

pub async fn invited(actor: Uuid, pool: &PGPool) -> Result<Vec<InvitedEvent>, ApiError> {
    Ok(db::event::find_invited(actor, pool).await?)
}

/// Full event view: the row, the caller's role annotation, both rosters and
/// the aggregated attendance stats.
pub async fn detail(
    event_id: Uuid,
    actor: Option<Uuid>,
    pool: &PGPool,
) -> Result<EventDetail, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))?;

    let invited = match actor {
        Some(user_id) if user_id != event.organizer_id => {
            db::invitation::find_by_event_and_invitee(event_id, user_id, pool)
                .await?
                .is_some()
        }
        _ => false,
    };
    let user_role = role_for(&event, actor, invited).map(|r| r.as_str().to_string());

    let invitations = db::invitation::find_by_event(event_id, pool).await?;
    let attendance = db::attendance::find_by_event(event_id, pool).await?;
    let counts = db::attendance::status_counts(event_id, pool).await?;

    Ok(EventDetail {
        event,
        user_role,
        invitations,
        attendance,
        attendance_stats: AttendanceStats::from_counts(&counts),
    })
}

pub async fn update(
    event_id: Uuid,
    actor: Uuid,
    dto: UpdateEventDto,
    pool: &PGPool,
) -> Result<Event, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))?;
    ensure_organizer(&event, actor, "update this event")?;

    if dto.is_empty() {
        return Ok(event);
    }
    let changes = changes_from_dto(dto)?;
    let touched = db::event::update(event_id, actor, &changes, pool).await?;
    if touched == 0 {
        // The organizer check above passed, so the row vanished in between.
        return Err(ApiError::not_found("event not found"));
    }
    db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))
}

pub async fn delete(event_id: Uuid, actor: Uuid, pool: &PGPool) -> Result<(), ApiError> {
    if db::event::delete(event_id, actor, pool).await? {
        Ok(())
    } else {
        Err(ApiError::not_found(
            "event not found or you are not authorized to delete it",
        ))
    }
}

pub async fn search(
    actor: Option<Uuid>,
    filters: &SearchQuery,
    pool: &PGPool,
) -> Result<Vec<EventWithRole>, ApiError> {
    Ok(db::event::search(actor, filters, pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn event(organizer_id: Uuid) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Product Launch".into(),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
            event_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            location: "HQ".into(),
            organizer_id,
            organizer_email: "org@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn organizer_role_wins_over_invitation() {
        let organizer = Uuid::new_v4();
        let e = event(organizer);
        assert_eq!(
            role_for(&e, Some(organizer), true),
            Some(InvitationRole::Organizer)
        );
    }

    #[test]
    fn invited_actor_is_attendee() {
        let e = event(Uuid::new_v4());
        assert_eq!(
            role_for(&e, Some(Uuid::new_v4()), true),
            Some(InvitationRole::Attendee)
        );
    }

    #[test]
    fn stranger_and_anonymous_have_no_role() {
        let e = event(Uuid::new_v4());
        assert_eq!(role_for(&e, Some(Uuid::new_v4()), false), None);
        assert_eq!(role_for(&e, None, true), None);
    }

    #[test]
    fn ensure_organizer_rejects_everyone_else() {
        let organizer = Uuid::new_v4();
        let e = event(organizer);
        assert!(ensure_organizer(&e, organizer, "update this event").is_ok());
        let err = ensure_organizer(&e, Uuid::new_v4(), "update this event").unwrap_err();
        assert!(matches!(err, ApiError::Authorization(_)));
    }

    #[test]
    fn event_time_parses_both_clock_formats() {
        assert_eq!(
            parse_event_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_event_time("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(parse_event_time("9:3 pm").is_err());
        assert!(parse_event_time("25:00").is_err());
    }

    #[test]
    fn blank_title_update_is_rejected() {
        let dto = UpdateEventDto {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            changes_from_dto(dto),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn update_dto_maps_into_typed_changes() {
        let dto = UpdateEventDto {
            title: Some("  Kickoff  ".into()),
            event_time: Some("18:00".into()),
            ..Default::default()
        };
        let changes = changes_from_dto(dto).unwrap();
        assert_eq!(changes.title.as_deref(), Some("Kickoff"));
        assert_eq!(changes.event_time, NaiveTime::from_hms_opt(18, 0, 0));
        assert!(changes.event_date.is_none());
    }
}
