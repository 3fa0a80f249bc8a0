pub mod auth;
pub mod profile;
pub mod responses;
pub mod session;
pub mod user;
