pub mod health;
pub mod submissions;
pub mod sweep;
