use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::dto::{
    AttendanceDto, AttendanceQuery, AttendanceResponse, EventAttendanceResponse,
    MyAttendanceResponse, UserAttendanceResponse,
};
use crate::errors::ApiError;
use crate::service::{self, auth::AuthenticatedUser};
use crate::PGPool;

// Event-scoped routes, registered under `/events` by handlers::event.

#[post("/{event_id}/attendance")]
pub async fn set_own(
    user: AuthenticatedUser,
    event_id: web::Path<Uuid>,
    dto: web::Json<AttendanceDto>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let attendance = service::attendance::set_own(
        event_id.into_inner(),
        user.user_id,
        dto.into_inner().status,
        pool.get_ref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(AttendanceResponse {
        message: "Attendance status updated successfully".into(),
        attendance,
    }))
}

#[get("/{event_id}/attendance/me")]
pub async fn my_attendance(
    user: AuthenticatedUser,
    event_id: web::Path<Uuid>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let attendance =
        service::attendance::my_attendance(event_id.into_inner(), user.user_id, pool.get_ref())
            .await?;
    let message = match &attendance {
        Some(_) => "Attendance retrieved successfully",
        None => "No attendance record found",
    };
    Ok(HttpResponse::Ok().json(MyAttendanceResponse {
        message: message.into(),
        attendance,
    }))
}

#[get("/{event_id}/attendance")]
pub async fn event_attendance(
    user: AuthenticatedUser,
    event_id: web::Path<Uuid>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let (attendance, attendance_stats) =
        service::attendance::event_attendance(event_id.into_inner(), user.user_id, pool.get_ref())
            .await?;
    Ok(HttpResponse::Ok().json(EventAttendanceResponse {
        message: "Attendance retrieved successfully".into(),
        count: attendance.len(),
        attendance,
        attendance_stats,
    }))
}

// Own-attendance listing, mounted at `/attendance`.

#[get("")]
pub async fn my_events(
    user: AuthenticatedUser,
    query: web::Query<AttendanceQuery>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let attendance =
        service::attendance::my_events(user.user_id, query.into_inner().status, pool.get_ref())
            .await?;
    Ok(HttpResponse::Ok().json(UserAttendanceResponse {
        message: "Attendance retrieved successfully".into(),
        count: attendance.len(),
        attendance,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(my_events);
}
