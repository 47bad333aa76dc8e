//! In-process implementation of the repository traits.
//!
//! Keeps every collection behind a `tokio::sync::RwLock` and applies the same
//! same-day uniqueness rule as the PostgreSQL index, so service and HTTP
//! tests can exercise real create/list/update/cancel flows without a
//! database. Only compiled for tests or with the `test-utils` feature.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use vetsync_core::{
    calendar,
    errors::{AppointmentError, AppointmentResult},
    models::{
        appointment::{
            Appointment, AppointmentDetails, AppointmentFilter, AppointmentPatch,
            AppointmentStatus, NewAppointment,
        },
        pet::Pet,
        user::User,
    },
    repository::{AppointmentRepository, PetRepository},
};

#[derive(Default)]
pub struct InMemoryStore {
    appointments: RwLock<Vec<Appointment>>,
    pets: RwLock<HashMap<Uuid, Pet>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_pet(&self, pet: Pet) {
        self.pets.write().await.insert(pet.id, pet);
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Number of stored appointments, across all owners.
    pub async fn len(&self) -> usize {
        self.appointments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.appointments.read().await.is_empty()
    }

    async fn hydrate(&self, appointment: Appointment) -> AppointmentDetails {
        let pet = self.pets.read().await.get(&appointment.pet).cloned();
        let user = self.users.read().await.get(&appointment.user).cloned();
        AppointmentDetails::hydrate(appointment, pet, user)
    }
}

fn same_slot(a: &Appointment, b: &Appointment) -> bool {
    a.id != b.id
        && a.pet == b.pet
        && a.user == b.user
        && calendar::utc_day(a.date) == calendar::utc_day(b.date)
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn find_one(&self, filter: &AppointmentFilter) -> AppointmentResult<Option<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().find(|a| filter.matches(a)).cloned())
    }

    async fn insert(&self, record: NewAppointment) -> AppointmentResult<Appointment> {
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            pet: record.pet,
            user: record.user,
            date: record.date,
            status: AppointmentStatus::Scheduled,
            extra: record.extra,
            created_at: now,
            updated_at: now,
        };

        let mut appointments = self.appointments.write().await;
        if appointments.iter().any(|existing| same_slot(existing, &appointment)) {
            return Err(AppointmentError::DuplicateAppointment);
        }
        appointments.push(appointment.clone());

        Ok(appointment)
    }

    async fn find_and_update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> AppointmentResult<Option<AppointmentDetails>> {
        let updated = {
            let mut appointments = self.appointments.write().await;
            let Some(index) = appointments.iter().position(|a| a.id == id) else {
                return Ok(None);
            };

            let mut candidate = appointments[index].clone();
            patch.apply_to(&mut candidate);
            candidate.updated_at = Utc::now();

            if appointments.iter().any(|existing| same_slot(existing, &candidate)) {
                return Err(AppointmentError::DuplicateAppointment);
            }
            appointments[index] = candidate.clone();
            candidate
        };

        Ok(Some(self.hydrate(updated).await))
    }

    async fn count_by_user(&self, user_id: Uuid) -> AppointmentResult<u64> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().filter(|a| a.user == user_id).count() as u64)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppointmentResult<Vec<AppointmentDetails>> {
        let owned: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .iter()
            .filter(|a| a.user == user_id)
            .cloned()
            .collect();

        let mut hydrated = Vec::with_capacity(owned.len());
        for appointment in owned {
            hydrated.push(self.hydrate(appointment).await);
        }
        Ok(hydrated)
    }
}

#[async_trait]
impl PetRepository for InMemoryStore {
    async fn find_pet(&self, id: Uuid) -> AppointmentResult<Option<Pet>> {
        Ok(self.pets.read().await.get(&id).cloned())
    }
}
