use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationRole {
    Organizer,
    Attendee,
}

impl InvitationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationRole::Organizer => "organizer",
            InvitationRole::Attendee => "attendee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Going,
    Maybe,
    NotGoing,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Going => "going",
            AttendanceStatus::Maybe => "maybe",
            AttendanceStatus::NotGoing => "not_going",
        }
    }
}

/// An invitee's answer to an invitation. `pending` is not an answer, which
/// is why it is absent here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationAnswer {
    Accepted,
    Declined,
}

impl InvitationAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationAnswer::Accepted => "accepted",
            InvitationAnswer::Declined => "declined",
        }
    }
}

// The password hash must stay out of every response body, so `User` is
// deliberately not Serialize; `PublicUser` is the outward shape.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        PublicUser {
            id: u.id,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

/// Every event read joins `users` for the organizer's email, so the column
/// is part of the base row type.
#[derive(Debug, FromRow, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub organizer_id: Uuid,
    pub organizer_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct EventWithRole {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub user_role: Option<String>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct InvitedEvent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub invitation_role: String,
    pub invitation_status: String,
    pub user_role: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct Invitation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Uuid,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Roster row for the organizer's invitation list.
#[derive(Debug, FromRow, Serialize)]
pub struct EventInvitation {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invitation: Invitation,
    pub invitee_email: String,
}

/// An invitation as the invitee sees it in their own list.
#[derive(Debug, FromRow, Serialize)]
pub struct UserInvitation {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invitation: Invitation,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub inviter_email: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct Attendance {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct EventAttendance {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: Attendance,
    pub user_email: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct UserAttendance {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: Attendance,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
}

/// Fixed-shape attendance summary. `pending` means the absence of a row, so
/// no grouped count ever lands in that bucket; it is carried for shape
/// compatibility and stays zero out of this aggregate.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub going: i64,
    pub maybe: i64,
    pub not_going: i64,
    pub pending: i64,
    pub total: i64,
}

impl AttendanceStats {
    pub fn from_counts(counts: &[(String, i64)]) -> Self {
        let mut stats = AttendanceStats::default();
        for (status, count) in counts {
            match status.as_str() {
                "going" => stats.going = *count,
                "maybe" => stats.maybe = *count,
                "not_going" => stats.not_going = *count,
                _ => continue,
            }
            stats.total += count;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_fold_counts_by_status() {
        let counts = vec![("going".to_string(), 2), ("maybe".to_string(), 1)];
        let stats = AttendanceStats::from_counts(&counts);
        assert_eq!(
            stats,
            AttendanceStats {
                going: 2,
                maybe: 1,
                not_going: 0,
                pending: 0,
                total: 3,
            }
        );
    }

    #[test]
    fn stats_fold_ignores_unknown_status() {
        let counts = vec![("going".to_string(), 1), ("perhaps".to_string(), 5)];
        let stats = AttendanceStats::from_counts(&counts);
        assert_eq!(stats.going, 1);
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn stats_fold_empty_is_all_zero() {
        assert_eq!(AttendanceStats::from_counts(&[]), AttendanceStats::default());
    }

    #[test]
    fn attendance_status_serde_names() {
        let parsed: AttendanceStatus = serde_json::from_str("\"not_going\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::NotGoing);
        assert_eq!(parsed.as_str(), "not_going");
        assert!(serde_json::from_str::<AttendanceStatus>("\"pending\"").is_err());
    }

    #[test]
    fn invitation_answer_rejects_pending() {
        assert!(serde_json::from_str::<InvitationAnswer>("\"accepted\"").is_ok());
        assert!(serde_json::from_str::<InvitationAnswer>("\"declined\"").is_ok());
        assert!(serde_json::from_str::<InvitationAnswer>("\"pending\"").is_err());
    }
}
