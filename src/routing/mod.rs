pub mod authorizer;
pub mod views;
