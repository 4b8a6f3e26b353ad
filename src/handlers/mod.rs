pub mod attendance;
pub mod auth;
pub mod event;
pub mod invitation;
pub mod user;
