pub mod appointment;
pub mod pet;
