pub mod api;
pub mod core;
pub mod handlers;
pub mod models;
pub mod routing;
pub mod session;
pub mod stores;
