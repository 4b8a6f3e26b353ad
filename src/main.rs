use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use std::env;

use event_planner_api::service::auth::{AuthMiddleware, SessionConfig};
use event_planner_api::{db, handlers, service, PGPool, TOKEN_TTL_SECS};

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "API is running",
        "timestamp": chrono::Utc::now(),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    service::log::init_logger();

    let db_url = env::var("DATABASE_URL")
        .unwrap_or_else(|e| panic!("failed to get env with name 'DATABASE_URL': {:?}", e));
    let jwt_secret = env::var("JWT_SECRET")
        .unwrap_or_else(|e| panic!("failed to get env with name 'JWT_SECRET': {:?}", e));
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let pool: PGPool = db::init_db_pool(&db_url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to the database: {:?}", e));
    let session = SessionConfig {
        secret: jwt_secret,
        ttl_secs: TOKEN_TTL_SECS,
    };

    log::info!("starting server on {}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(session.clone()))
            .wrap(service::log::LoggerMiddleware)
            .route("/api/health", web::get().to(health))
            .service(web::scope("/api/auth").configure(handlers::auth::config))
            .service(
                web::scope("/api/users")
                    .wrap(AuthMiddleware::new(pool.clone(), session.clone()))
                    .configure(handlers::user::config),
            )
            .service(
                web::scope("/api/events")
                    .wrap(AuthMiddleware::new(pool.clone(), session.clone()))
                    .configure(handlers::event::config),
            )
            .service(
                web::scope("/api/invitations")
                    .wrap(AuthMiddleware::new(pool.clone(), session.clone()))
                    .configure(handlers::invitation::config),
            )
            .service(
                web::scope("/api/attendance")
                    .wrap(AuthMiddleware::new(pool.clone(), session.clone()))
                    .configure(handlers::attendance::config),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
