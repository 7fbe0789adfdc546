pub mod health;
pub mod transcript;
