use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    calendar,
    models::{pet::Pet, user::User},
};

/// Top-level field names owned by the appointment itself. Callers cannot
/// smuggle these in as free-form extra fields.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "pet",
    "user",
    "date",
    "status",
    "created_at",
    "updated_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CANCELED" => Ok(AppointmentStatus::Canceled),
            other => Err(eyre::eyre!("Unknown appointment status: {}", other)),
        }
    }
}

/// An appointment as stored, with pet and user kept as identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub pet: Uuid,
    pub user: Uuid,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An appointment with its pet and owner resolved to full records.
///
/// A reference whose target no longer exists hydrates to `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub id: Uuid,
    pub pet: Option<Pet>,
    pub user: Option<User>,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppointmentDetails {
    pub fn hydrate(appointment: Appointment, pet: Option<Pet>, user: Option<User>) -> Self {
        Self {
            id: appointment.id,
            pet,
            user,
            date: appointment.date,
            status: appointment.status,
            extra: appointment.extra,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

/// Record handed to the store on creation. Status always starts out scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub pet: Uuid,
    pub user: Uuid,
    pub date: DateTime<Utc>,
    pub extra: Map<String, Value>,
}

/// Field replacement applied by `find_and_update`. `None` leaves a field
/// untouched; extra fields are merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub pet: Option<Uuid>,
    pub user: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub extra: Map<String, Value>,
}

impl AppointmentPatch {
    pub fn cancel() -> Self {
        Self {
            status: Some(AppointmentStatus::Canceled),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(pet) = self.pet {
            appointment.pet = pet;
        }
        if let Some(user) = self.user {
            appointment.user = user;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        for (key, value) in &self.extra {
            appointment.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Conjunction of optional conditions used by `find_one`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub pet: Option<Uuid>,
    pub user: Option<Uuid>,
    /// Inclusive on both ends.
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl AppointmentFilter {
    /// Matches any appointment of this pet and owner on the UTC day of `date`.
    pub fn same_day(pet: Uuid, user: Uuid, date: DateTime<Utc>) -> Self {
        Self {
            pet: Some(pet),
            user: Some(user),
            date_range: Some(calendar::day_bounds(date)),
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.pet.is_none_or(|pet| appointment.pet == pet)
            && self.user.is_none_or(|user| appointment.user == user)
            && self
                .date_range
                .is_none_or(|(from, to)| appointment.date >= from && appointment.date <= to)
    }
}

/// Validated input of the create operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAppointment {
    pub pet: Uuid,
    pub user: Uuid,
    pub date: String,
    pub extra: Map<String, Value>,
}

/// Validated input of the update operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAppointment {
    pub pet: Uuid,
    pub user: Uuid,
    pub date: Option<String>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub date: Option<String>,
    pub pet: Option<String>,
    pub user: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    pub success: bool,
    pub msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAppointmentsRequest {
    #[serde(rename = "uidUser")]
    pub uid_user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAppointmentsResponse {
    pub success: bool,
    pub message: String,
    pub total: u64,
    pub appointment: Vec<AppointmentDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub pet: Option<String>,
    pub user: Option<String>,
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentResponse {
    pub success: bool,
    pub msg: String,
    pub appointment: AppointmentDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentResponse {
    pub success: bool,
    pub msg: String,
    #[serde(rename = "cancelAppointment")]
    pub cancel_appointment: AppointmentDetails,
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
