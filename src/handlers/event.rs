use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::dto::{
    EventDetailResponse, EventResponse, EventsResponse, MessageResponse, NewEventDto, SearchQuery,
    SearchResponse, UpdateEventDto,
};
use crate::errors::ApiError;
use crate::service::{self, auth::AuthenticatedUser};
use crate::PGPool;

#[get("/search")]
pub async fn search(
    user: AuthenticatedUser,
    query: web::Query<SearchQuery>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let filters = query.into_inner();
    let events = service::event::search(Some(user.user_id), &filters, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(SearchResponse {
        message: "Events retrieved successfully".into(),
        count: events.len(),
        events,
        filters,
    }))
}

#[get("/organized")]
pub async fn organized(
    user: AuthenticatedUser,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let events = service::event::organized(user.user_id, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(EventsResponse {
        message: "Events retrieved successfully".into(),
        count: events.len(),
        events,
    }))
}

#[get("/invited")]
pub async fn invited(
    user: AuthenticatedUser,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let events = service::event::invited(user.user_id, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(EventsResponse {
        message: "Invited events retrieved successfully".into(),
        count: events.len(),
        events,
    }))
}

#[post("")]
pub async fn create(
    user: AuthenticatedUser,
    dto: web::Json<NewEventDto>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let event = service::event::create(user.user_id, dto.into_inner(), pool.get_ref()).await?;
    Ok(HttpResponse::Created().json(EventResponse {
        message: "Event created successfully".into(),
        event,
    }))
}

#[get("/{id}")]
pub async fn detail(
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let event =
        service::event::detail(id.into_inner(), Some(user.user_id), pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(EventDetailResponse {
        message: "Event retrieved successfully".into(),
        event,
    }))
}

#[put("/{id}")]
pub async fn update(
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
    dto: web::Json<UpdateEventDto>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let event =
        service::event::update(id.into_inner(), user.user_id, dto.into_inner(), pool.get_ref())
            .await?;
    Ok(HttpResponse::Ok().json(EventResponse {
        message: "Event updated successfully".into(),
        event,
    }))
}

#[delete("/{id}")]
pub async fn remove(
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    service::event::delete(id.into_inner(), user.user_id, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Event deleted successfully".into(),
    }))
}

/// Everything nested under `/events`, including the event-scoped invitation
/// and attendance routes. Static segments are registered ahead of `/{id}`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(search)
        .service(organized)
        .service(invited)
        .service(create)
        .service(super::invitation::invite)
        .service(super::invitation::event_invitations)
        .service(super::invitation::remove)
        .service(super::attendance::set_own)
        .service(super::attendance::my_attendance)
        .service(super::attendance::event_attendance)
        .service(detail)
        .service(update)
        .service(remove);
}
