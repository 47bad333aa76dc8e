use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Pet not found: {0}")]
    PetNotFound(Uuid),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("The owner and the pet already have an appointment for this day")]
    DuplicateAppointment,

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

impl AppointmentError {
    /// True for failures caused by the store rather than by the request.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AppointmentError::Database(_))
    }
}

pub type AppointmentResult<T> = Result<T, AppointmentError>;
