use actix_web::{post, web, HttpResponse};
use log::info;

use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::errors::ApiError;
use crate::service::{self, auth::SessionConfig};
use crate::PGPool;

#[post("/register")]
pub async fn register(
    dto: web::Json<RegisterRequest>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let user = service::user::register(dto.into_inner(), pool.get_ref()).await?;
    info!("registered user {}", user.id);
    Ok(HttpResponse::Created().json(UserResponse {
        message: "User registered successfully".into(),
        user,
    }))
}

#[post("/login")]
pub async fn login(
    dto: web::Json<LoginRequest>,
    session: web::Data<SessionConfig>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let (token, user) = service::user::login(dto.into_inner(), session.get_ref(), pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".into(),
        token,
        user,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}
