//! # Appointment Service
//!
//! The only component with decision logic: scheduling with a same-day
//! booking guard, listing by owner, field updates and cancellation.
//!
//! ## Same-day guard
//!
//! A pet and its owner may hold at most one appointment per UTC calendar day.
//! `create` checks this before inserting; the store enforces the same rule
//! with a unique index, so a concurrent create that slips past the check is
//! rejected by `insert` with the same error.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    calendar,
    errors::{AppointmentError, AppointmentResult},
    models::appointment::{
        Appointment, AppointmentDetails, AppointmentFilter, AppointmentPatch, CreateAppointment,
        NewAppointment, UpdateAppointment,
    },
    repository::{AppointmentRepository, PetRepository},
};

#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    pets: Arc<dyn PetRepository>,
}

impl AppointmentService {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, pets: Arc<dyn PetRepository>) -> Self {
        Self { appointments, pets }
    }

    /// Schedules a new appointment.
    ///
    /// # Errors
    ///
    /// * `AppointmentError::InvalidDate` - `date` does not parse
    /// * `AppointmentError::PetNotFound` - the pet does not exist
    /// * `AppointmentError::DuplicateAppointment` - the pet and owner already
    ///   have an appointment on that UTC day
    /// * `AppointmentError::Database` - store failure
    pub async fn create(&self, data: CreateAppointment) -> AppointmentResult<Appointment> {
        let date = calendar::parse_appointment_date(&data.date)
            .ok_or_else(|| AppointmentError::InvalidDate(data.date.clone()))?;

        if self.pets.find_pet(data.pet).await?.is_none() {
            return Err(AppointmentError::PetNotFound(data.pet));
        }

        let filter = AppointmentFilter::same_day(data.pet, data.user, date);
        if let Some(existing) = self.appointments.find_one(&filter).await? {
            warn!(
                "Rejecting duplicate appointment: pet={}, user={}, existing={}",
                data.pet, data.user, existing.id
            );
            return Err(AppointmentError::DuplicateAppointment);
        }

        let appointment = self
            .appointments
            .insert(NewAppointment {
                pet: data.pet,
                user: data.user,
                date,
                extra: data.extra,
            })
            .await?;

        info!(
            "Appointment created: id={}, pet={}, user={}, date={}",
            appointment.id, appointment.pet, appointment.user, appointment.date
        );
        Ok(appointment)
    }

    /// All appointments of an owner with the total count. An owner without
    /// appointments yields `(0, [])`.
    pub async fn list_by_owner(
        &self,
        user_id: Uuid,
    ) -> AppointmentResult<(u64, Vec<AppointmentDetails>)> {
        let (total, appointments) = tokio::try_join!(
            self.appointments.count_by_user(user_id),
            self.appointments.find_by_user(user_id),
        )?;

        debug!("Listed {} appointments for user={}", total, user_id);
        Ok((total, appointments))
    }

    /// Replaces the supplied fields of an appointment. Status is not part of
    /// `UpdateAppointment`; it only changes through [`Self::cancel`].
    ///
    /// No same-day lookup runs here, but the store holds one appointment per
    /// pet, owner and UTC day. An update that would place a second appointment
    /// on a day already taken fails with
    /// `AppointmentError::DuplicateAppointment`.
    ///
    /// # Errors
    ///
    /// * `AppointmentError::InvalidDate` - `date` is present and does not parse
    /// * `AppointmentError::AppointmentNotFound` - no appointment with `id`
    /// * `AppointmentError::DuplicateAppointment` - the new pet, owner and day
    ///   collide with another appointment
    /// * `AppointmentError::Database` - store failure
    pub async fn update(
        &self,
        id: Uuid,
        data: UpdateAppointment,
    ) -> AppointmentResult<AppointmentDetails> {
        let date = match &data.date {
            Some(raw) => Some(
                calendar::parse_appointment_date(raw)
                    .ok_or_else(|| AppointmentError::InvalidDate(raw.clone()))?,
            ),
            None => None,
        };

        let patch = AppointmentPatch {
            pet: Some(data.pet),
            user: Some(data.user),
            date,
            status: None,
            extra: data.extra,
        };

        let updated = self
            .appointments
            .find_and_update(id, patch)
            .await?
            .ok_or(AppointmentError::AppointmentNotFound(id))?;

        info!("Appointment updated: id={}", id);
        Ok(updated)
    }

    /// Marks an appointment as canceled. Canceling twice is not an error.
    pub async fn cancel(&self, id: Uuid) -> AppointmentResult<AppointmentDetails> {
        let canceled = self
            .appointments
            .find_and_update(id, AppointmentPatch::cancel())
            .await?
            .ok_or(AppointmentError::AppointmentNotFound(id))?;

        info!("Appointment canceled: id={}", id);
        Ok(canceled)
    }
}
