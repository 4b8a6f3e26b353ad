use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{
    Attendance, AttendanceStats, AttendanceStatus, Event, EventAttendance, UserAttendance,
};
use crate::service::event::ensure_organizer;
use crate::{db, PGPool};

/// The organizer and anyone holding an invitation (whatever its status) may
/// record their own attendance; nobody else.
pub(crate) fn may_set_attendance(event: &Event, actor: Uuid, invited: bool) -> bool {
    event.organizer_id == actor || invited
}

pub async fn set_own(
    event_id: Uuid,
    actor: Uuid,
    status: AttendanceStatus,
    pool: &PGPool,
) -> Result<Attendance, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))?;

    let invited = if event.organizer_id == actor {
        false
    } else {
        db::invitation::find_by_event_and_invitee(event_id, actor, pool)
            .await?
            .is_some()
    };
    if !may_set_attendance(&event, actor, invited) {
        return Err(ApiError::authorization("you are not invited to this event"));
    }
    Ok(db::attendance::upsert(event_id, actor, status, pool).await?)
}

pub async fn event_attendance(
    event_id: Uuid,
    actor: Uuid,
    pool: &PGPool,
) -> Result<(Vec<EventAttendance>, AttendanceStats), ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))?;
    ensure_organizer(&event, actor, "view attendance")?;

    let attendance = db::attendance::find_by_event(event_id, pool).await?;
    let counts = db::attendance::status_counts(event_id, pool).await?;
    Ok((attendance, AttendanceStats::from_counts(&counts)))
}

/// A missing record is a normal answer here (implicit `pending`), not an
/// error.
pub async fn my_attendance(
    event_id: Uuid,
    actor: Uuid,
    pool: &PGPool,
) -> Result<Option<Attendance>, ApiError> {
    if db::event::find_by_id(event_id, pool).await?.is_none() {
        return Err(ApiError::not_found("event not found"));
    }
    Ok(db::attendance::find_by_event_and_user(event_id, actor, pool).await?)
}

pub async fn my_events(
    actor: Uuid,
    status: Option<AttendanceStatus>,
    pool: &PGPool,
) -> Result<Vec<UserAttendance>, ApiError> {
    Ok(db::attendance::find_by_user(actor, status, pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn event(organizer_id: Uuid) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Offsite".into(),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2026, 11, 5).unwrap(),
            event_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            location: "Lisbon".into(),
            organizer_id,
            organizer_email: "org@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn organizer_may_always_answer() {
        let organizer = Uuid::new_v4();
        assert!(may_set_attendance(&event(organizer), organizer, false));
    }

    #[test]
    fn any_invitation_grants_access_regardless_of_its_status() {
        let e = event(Uuid::new_v4());
        assert!(may_set_attendance(&e, Uuid::new_v4(), true));
    }

    #[test]
    fn stranger_may_not_answer() {
        let e = event(Uuid::new_v4());
        assert!(!may_set_attendance(&e, Uuid::new_v4(), false));
    }
}
