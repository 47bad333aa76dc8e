pub mod appointment;
pub mod health;
