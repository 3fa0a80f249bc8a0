pub mod client;

#[cfg(test)]
pub mod mock;
