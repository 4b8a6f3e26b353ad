use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Attendance, AttendanceStats, AttendanceStatus, Event, EventAttendance, EventInvitation,
    InvitationAnswer, InvitationRole, PublicUser,
};

#[derive(Debug, Deserialize, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, exp: usize) -> Self {
        Self {
            user_id,
            email: email.to_string(),
            exp,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewEventDto {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub location: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub location: Option<String>,
}

impl UpdateEventDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.event_time.is_none()
            && self.location.is_none()
    }
}

// Query parameter names stay camelCase on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
    pub role: Option<InvitationRole>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewInvitationDto {
    pub invitee_id: Uuid,
    pub role: Option<InvitationRole>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvitationAnswerDto {
    pub status: InvitationAnswer,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AttendanceDto {
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AttendanceQuery {
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserSearchQuery {
    pub email: Option<String>,
    pub limit: Option<i64>,
}

// Response envelopes, shaped after the HTTP contract.

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse<T: Serialize> {
    pub message: String,
    pub events: Vec<T>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<T: Serialize> {
    pub message: String,
    pub events: Vec<T>,
    pub count: usize,
    pub filters: SearchQuery,
}

/// Full event view for `GET /events/{id}`: the event row annotated with the
/// caller's role plus the invitation and attendance rosters.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub user_role: Option<String>,
    pub invitations: Vec<EventInvitation>,
    pub attendance: Vec<EventAttendance>,
    #[serde(rename = "attendanceStats")]
    pub attendance_stats: AttendanceStats,
}

#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    pub message: String,
    pub event: EventDetail,
}

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub message: String,
    pub invitation: crate::models::Invitation,
}

#[derive(Debug, Serialize)]
pub struct InvitationsResponse<T: Serialize> {
    pub message: String,
    pub invitations: Vec<T>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub message: String,
    pub attendance: Attendance,
}

#[derive(Debug, Serialize)]
pub struct MyAttendanceResponse {
    pub message: String,
    pub attendance: Option<Attendance>,
}

#[derive(Debug, Serialize)]
pub struct EventAttendanceResponse {
    pub message: String,
    pub attendance: Vec<EventAttendance>,
    #[serde(rename = "attendanceStats")]
    pub attendance_stats: AttendanceStats,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct UserAttendanceResponse<T: Serialize> {
    pub message: String,
    pub attendance: Vec<T>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub message: String,
    pub users: Vec<PublicUser>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_dto_reports_empty() {
        assert!(UpdateEventDto::default().is_empty());
        let dto = UpdateEventDto {
            location: Some("Room 4".into()),
            ..Default::default()
        };
        assert!(!dto.is_empty());
    }

    #[test]
    fn search_query_accepts_camel_case_dates() {
        let q: SearchQuery =
            serde_json::from_str(r#"{"keyword":"launch","startDate":"2026-09-01"}"#).unwrap();
        assert_eq!(q.keyword.as_deref(), Some("launch"));
        assert_eq!(
            q.start_date,
            Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
        );
        assert!(q.end_date.is_none());
        assert!(q.role.is_none());
    }

    #[test]
    fn search_query_rejects_unknown_role() {
        assert!(serde_json::from_str::<SearchQuery>(r#"{"role":"owner"}"#).is_err());
    }

    #[test]
    fn attendance_dto_rejects_invalid_status() {
        assert!(serde_json::from_str::<AttendanceDto>(r#"{"status":"absent"}"#).is_err());
        let dto: AttendanceDto = serde_json::from_str(r#"{"status":"maybe"}"#).unwrap();
        assert_eq!(dto.status, AttendanceStatus::Maybe);
    }
}
