pub mod account;
pub mod auth;
pub mod health;
pub mod navigation;

#[cfg(test)]
pub(crate) mod test_support;
