use actix_web::{get, web, HttpResponse};

use crate::dto::{UserSearchQuery, UsersResponse};
use crate::errors::ApiError;
use crate::service::{self, auth::AuthenticatedUser};
use crate::PGPool;

#[get("/search")]
pub async fn search(
    _user: AuthenticatedUser,
    query: web::Query<UserSearchQuery>,
    pool: web::Data<PGPool>,
) -> Result<HttpResponse, ApiError> {
    let users = service::user::search(query.into_inner(), pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(UsersResponse {
        message: "Users retrieved successfully".into(),
        count: users.len(),
        users,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(search);
}
