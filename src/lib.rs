pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;

use sqlx::{postgres::Postgres, Pool};

pub type PGPool = Pool<Postgres>;

/// Access tokens live for a day, matching the session model of the web
/// client.
pub const TOKEN_TTL_SECS: usize = 24 * 60 * 60;
