//! Storage seams of the appointment service.
//!
//! The service only talks to these traits; `vetsync-db` provides the
//! PostgreSQL implementations, an in-memory store and mockall mocks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppointmentResult,
    models::{
        appointment::{
            Appointment, AppointmentDetails, AppointmentFilter, AppointmentPatch, NewAppointment,
        },
        pet::Pet,
    },
};

/// Persistence operations over the appointment collection.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// First appointment matching every condition of `filter`, if any.
    async fn find_one(&self, filter: &AppointmentFilter) -> AppointmentResult<Option<Appointment>>;

    /// Stores a new appointment with a fresh identifier and `SCHEDULED` status.
    ///
    /// Fails with `DuplicateAppointment` when the store already holds an
    /// appointment for the same pet and owner on the same UTC day.
    async fn insert(&self, record: NewAppointment) -> AppointmentResult<Appointment>;

    /// Applies `patch` to the appointment `id` and returns the hydrated result,
    /// or `None` when no such appointment exists.
    async fn find_and_update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> AppointmentResult<Option<AppointmentDetails>>;

    async fn count_by_user(&self, user_id: Uuid) -> AppointmentResult<u64>;

    /// Every appointment of the owner, hydrated.
    async fn find_by_user(&self, user_id: Uuid) -> AppointmentResult<Vec<AppointmentDetails>>;
}

/// Read access to the externally managed pet collection.
#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn find_pet(&self, id: Uuid) -> AppointmentResult<Option<Pet>>;
}
