use chrono::{NaiveDate, NaiveTime};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::SearchQuery;
use crate::models::{Event, EventWithRole, InvitationRole, InvitedEvent};
use crate::PGPool;

/// Insert shape. The read shape (`models::Event`) carries the joined
/// organizer email, so inserts go through this narrower struct and callers
/// re-fetch through `find_by_id`.
#[derive(Debug)]
pub struct NewEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub organizer_id: Uuid,
}

/// Typed partial-update assignment set; `None` means "leave the column
/// alone".
#[derive(Debug, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.event_time.is_none()
            && self.location.is_none()
    }
}

pub async fn create(event: &NewEvent, pool: &PGPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO events (id, title, description, event_date, event_time, location, organizer_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.event_date)
    .bind(event.event_time)
    .bind(&event.location)
    .bind(event.organizer_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(id: Uuid, pool: &PGPool) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "SELECT e.*, u.email AS organizer_email
         FROM events e
         JOIN users u ON u.id = e.organizer_id
         WHERE e.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_organizer(
    organizer_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<EventWithRole>, sqlx::Error> {
    sqlx::query_as::<_, EventWithRole>(
        "SELECT e.*, u.email AS organizer_email, 'organizer' AS user_role
         FROM events e
         JOIN users u ON u.id = e.organizer_id
         WHERE e.organizer_id = $1
         ORDER BY e.event_date DESC, e.event_time DESC",
    )
    .bind(organizer_id)
    .fetch_all(pool)
    .await
}

pub async fn find_invited(user_id: Uuid, pool: &PGPool) -> Result<Vec<InvitedEvent>, sqlx::Error> {
    sqlx::query_as::<_, InvitedEvent>(
        "SELECT e.*, u.email AS organizer_email,
                ei.role AS invitation_role, ei.status AS invitation_status,
                'attendee' AS user_role
         FROM events e
         JOIN event_invitations ei ON ei.event_id = e.id
         JOIN users u ON u.id = e.organizer_id
         WHERE ei.invitee_id = $1
         ORDER BY e.event_date DESC, e.event_time DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

fn update_query(
    id: Uuid,
    organizer_id: Uuid,
    changes: &EventChanges,
) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE events SET updated_at = now()");
    if let Some(v) = &changes.title {
        qb.push(", title = ");
        qb.push_bind(v.clone());
    }
    if let Some(v) = &changes.description {
        qb.push(", description = ");
        qb.push_bind(v.clone());
    }
    if let Some(v) = changes.event_date {
        qb.push(", event_date = ");
        qb.push_bind(v);
    }
    if let Some(v) = changes.event_time {
        qb.push(", event_time = ");
        qb.push_bind(v);
    }
    if let Some(v) = &changes.location {
        qb.push(", location = ");
        qb.push_bind(v.clone());
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb.push(" AND organizer_id = ");
    qb.push_bind(organizer_id);
    qb
}

/// Partial update restricted to the organizer. Returns how many rows were
/// touched; zero means the event is gone or owned by someone else.
pub async fn update(
    id: Uuid,
    organizer_id: Uuid,
    changes: &EventChanges,
    pool: &PGPool,
) -> Result<u64, sqlx::Error> {
    let mut qb = update_query(id, organizer_id, changes);
    let res = qb.build().execute(pool).await?;
    Ok(res.rows_affected())
}

/// Delete keyed on `(id, organizer_id)`; dependent invitations and
/// attendance rows go with it through the FK cascade.
pub async fn delete(id: Uuid, organizer_id: Uuid, pool: &PGPool) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM events WHERE id = $1 AND organizer_id = $2")
        .bind(id)
        .bind(organizer_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

fn search_query(actor: Option<Uuid>, filters: &SearchQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT DISTINCT e.*, u.email AS organizer_email");

    match actor {
        Some(user_id) => {
            qb.push(", CASE WHEN e.organizer_id = ");
            qb.push_bind(user_id);
            qb.push(
                " THEN 'organizer' WHEN EXISTS (SELECT 1 FROM event_invitations ei \
                 WHERE ei.event_id = e.id AND ei.invitee_id = ",
            );
            qb.push_bind(user_id);
            qb.push(") THEN 'attendee' END AS user_role");
        }
        None => {
            qb.push(", NULL::text AS user_role");
        }
    }

    qb.push(" FROM events e JOIN users u ON u.id = e.organizer_id WHERE 1=1");

    if let Some(keyword) = filters.keyword.as_deref().filter(|k| !k.is_empty()) {
        let pattern = format!("%{}%", keyword);
        qb.push(" AND (e.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR e.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(start) = filters.start_date {
        qb.push(" AND e.event_date >= ");
        qb.push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(" AND e.event_date <= ");
        qb.push_bind(end);
    }

    // Role refinement only makes sense relative to an actor.
    if let Some(user_id) = actor {
        match filters.role {
            Some(InvitationRole::Organizer) => {
                qb.push(" AND e.organizer_id = ");
                qb.push_bind(user_id);
            }
            Some(InvitationRole::Attendee) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM event_invitations ei \
                     WHERE ei.event_id = e.id AND ei.invitee_id = ",
                );
                qb.push_bind(user_id);
                qb.push(")");
            }
            None => {}
        }
    }

    qb.push(" ORDER BY e.event_date DESC, e.event_time DESC");
    qb
}

/// Conjunctive filtered search with the caller's role annotated per row.
pub async fn search(
    actor: Option<Uuid>,
    filters: &SearchQuery,
    pool: &PGPool,
) -> Result<Vec<EventWithRole>, sqlx::Error> {
    let mut qb = search_query(actor, filters);
    qb.build_query_as::<EventWithRole>().fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    fn sql(mut qb: QueryBuilder<'static, Postgres>) -> String {
        qb.build().sql().to_string()
    }

    #[test]
    fn search_without_filters_has_no_predicates() {
        let q = sql(search_query(None, &SearchQuery::default()));
        assert!(q.contains("NULL::text AS user_role"));
        assert!(!q.contains("ILIKE"));
        assert!(!q.contains("$1"));
        assert!(q.ends_with("ORDER BY e.event_date DESC, e.event_time DESC"));
    }

    #[test]
    fn search_keyword_matches_title_or_description() {
        let filters = SearchQuery {
            keyword: Some("launch".into()),
            ..Default::default()
        };
        let q = sql(search_query(None, &filters));
        assert!(q.contains("e.title ILIKE $1 OR e.description ILIKE $2"));
    }

    #[test]
    fn search_blank_keyword_is_no_constraint() {
        let filters = SearchQuery {
            keyword: Some(String::new()),
            ..Default::default()
        };
        assert!(!sql(search_query(None, &filters)).contains("ILIKE"));
    }

    #[test]
    fn search_date_range_is_inclusive() {
        let filters = SearchQuery {
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30),
            ..Default::default()
        };
        let q = sql(search_query(None, &filters));
        assert!(q.contains("e.event_date >= $1"));
        assert!(q.contains("e.event_date <= $2"));
    }

    #[test]
    fn search_with_actor_annotates_role() {
        let actor = Uuid::new_v4();
        let q = sql(search_query(Some(actor), &SearchQuery::default()));
        assert!(q.contains("CASE WHEN e.organizer_id = $1"));
        assert!(q.contains("THEN 'attendee' END AS user_role"));
    }

    #[test]
    fn search_organizer_role_filter_restricts_ownership() {
        let filters = SearchQuery {
            role: Some(InvitationRole::Organizer),
            ..Default::default()
        };
        let q = sql(search_query(Some(Uuid::new_v4()), &filters));
        assert!(q.contains(" AND e.organizer_id = $3"));
    }

    #[test]
    fn search_role_filter_is_ignored_without_actor() {
        let filters = SearchQuery {
            role: Some(InvitationRole::Attendee),
            ..Default::default()
        };
        let q = sql(search_query(None, &filters));
        assert!(!q.contains("AND EXISTS"));
    }

    #[test]
    fn search_results_are_distinct_by_row() {
        let q = sql(search_query(None, &SearchQuery::default()));
        assert!(q.starts_with("SELECT DISTINCT e.*"));
    }

    #[test]
    fn update_always_refreshes_timestamp_and_guards_owner() {
        let changes = EventChanges {
            title: Some("Kickoff".into()),
            ..Default::default()
        };
        let q = sql(update_query(Uuid::new_v4(), Uuid::new_v4(), &changes));
        assert!(q.starts_with("UPDATE events SET updated_at = now(), title = $1"));
        assert!(q.ends_with(" WHERE id = $2 AND organizer_id = $3"));
    }

    #[test]
    fn update_binds_each_present_field() {
        let changes = EventChanges {
            title: Some("Kickoff".into()),
            description: Some("all hands".into()),
            event_date: NaiveDate::from_ymd_opt(2026, 10, 2),
            event_time: NaiveTime::from_hms_opt(9, 30, 0),
            location: Some("HQ".into()),
        };
        let q = sql(update_query(Uuid::new_v4(), Uuid::new_v4(), &changes));
        for fragment in [
            "title = $1",
            "description = $2",
            "event_date = $3",
            "event_time = $4",
            "location = $5",
            "WHERE id = $6 AND organizer_id = $7",
        ] {
            assert!(q.contains(fragment), "missing `{}` in `{}`", fragment, q);
        }
    }
}
