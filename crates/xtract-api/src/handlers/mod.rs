pub mod extract;
pub mod health;
