use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;
use vetsync_core::models::{
    appointment::{Appointment, AppointmentDetails},
    pet::Pet,
    user::User,
};

#[derive(Debug, Clone, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub appointment_day: NaiveDate,
    pub status: String,
    pub extra: Json<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        Ok(Appointment {
            id: row.id,
            pet: row.pet_id,
            user: row.user_id,
            date: row.appointment_date,
            status: row.status.parse()?,
            extra: row.extra.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Appointment joined with its pet and owner. The referenced columns are
/// nullable because either side of the join may be gone.
#[derive(Debug, Clone, FromRow)]
pub struct DbAppointmentRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: String,
    pub extra: Json<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub pet_ref_id: Option<Uuid>,
    pub pet_name: Option<String>,
    pub pet_species: Option<String>,
    pub pet_breed: Option<String>,
    pub pet_owner_id: Option<Uuid>,
    pub pet_created_at: Option<DateTime<Utc>>,

    pub user_ref_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_created_at: Option<DateTime<Utc>>,
}

impl DbAppointmentRow {
    fn pet(&self) -> Option<Pet> {
        match (&self.pet_ref_id, &self.pet_name, &self.pet_species, &self.pet_created_at) {
            (Some(id), Some(name), Some(species), Some(created_at)) => Some(Pet {
                id: *id,
                name: name.clone(),
                species: species.clone(),
                breed: self.pet_breed.clone(),
                owner_id: self.pet_owner_id,
                created_at: *created_at,
            }),
            _ => None,
        }
    }

    fn user(&self) -> Option<User> {
        match (&self.user_ref_id, &self.user_name, &self.user_email, &self.user_created_at) {
            (Some(id), Some(name), Some(email), Some(created_at)) => Some(User {
                id: *id,
                name: name.clone(),
                email: email.clone(),
                created_at: *created_at,
            }),
            _ => None,
        }
    }
}

impl TryFrom<DbAppointmentRow> for AppointmentDetails {
    type Error = eyre::Report;

    fn try_from(row: DbAppointmentRow) -> Result<Self> {
        let pet = row.pet();
        let user = row.user();
        let status = row
            .status
            .parse()
            .map_err(|e| eyre!("Appointment {} has a corrupt status: {}", row.id, e))?;

        Ok(AppointmentDetails {
            id: row.id,
            pet,
            user,
            date: row.appointment_date,
            status,
            extra: row.extra.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPet {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DbPet> for Pet {
    fn from(row: DbPet) -> Self {
        Pet {
            id: row.id,
            name: row.name,
            species: row.species,
            breed: row.breed,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}
