use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::dto::{
    InvitationAnswerDto, InvitationResponse, InvitationsResponse, MessageResponse,
    NewInvitationDto,
};
use crate::errors::ApiError;
use crate::service::{self, auth::AuthenticatedUser};
use crate::PGPool;

// Event-scoped routes, registered under `/events` by handlers::event.

#[post("/{event_id}/invitations")]
pub async fn invite(
    user: AuthenticatedUser,
    event_id: web::Path<Uuid>,
    dto: web::Json<NewInvitationDto>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let invitation = service::invitation::invite(
        event_id.into_inner(),
        user.user_id,
        dto.into_inner(),
        pool.get_ref(),
    )
    .await?;
    Ok(HttpResponse::Created().json(InvitationResponse {
        message: "User invited successfully".into(),
        invitation,
    }))
}

#[get("/{event_id}/invitations")]
pub async fn event_invitations(
    user: AuthenticatedUser,
    event_id: web::Path<Uuid>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let invitations =
        service::invitation::event_invitations(event_id.into_inner(), user.user_id, pool.get_ref())
            .await?;
    Ok(HttpResponse::Ok().json(InvitationsResponse {
        message: "Invitations retrieved successfully".into(),
        count: invitations.len(),
        invitations,
    }))
}

#[delete("/{event_id}/invitations/{invitee_id}")]
pub async fn remove(
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let (event_id, invitee_id) = path.into_inner();
    service::invitation::remove(event_id, invitee_id, user.user_id, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Invitation deleted successfully".into(),
    }))
}

// Own-invitation routes, mounted at `/invitations`.

#[get("")]
pub async fn my_invitations(
    user: AuthenticatedUser,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let invitations = service::invitation::my_invitations(user.user_id, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(InvitationsResponse {
        message: "Invitations retrieved successfully".into(),
        count: invitations.len(),
        invitations,
    }))
}

#[put("/{event_id}")]
pub async fn respond(
    user: AuthenticatedUser,
    event_id: web::Path<Uuid>,
    dto: web::Json<InvitationAnswerDto>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let answer = dto.into_inner().status;
    let invitation =
        service::invitation::respond(event_id.into_inner(), user.user_id, answer, pool.get_ref())
            .await?;
    Ok(HttpResponse::Ok().json(InvitationResponse {
        message: format!("Invitation {} successfully", answer.as_str()),
        invitation,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(my_invitations).service(respond);
}
