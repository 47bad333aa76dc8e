//! # Request Validation
//!
//! Checks incoming payloads before they reach the appointment service:
//! required fields must be present and non-blank, identifiers must be valid
//! UUIDs, and reserved appointment fields cannot be smuggled in as extra
//! fields. Every problem found is reported at once in a single
//! `AppointmentError::Validation`.

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::{Map, Value};
use uuid::Uuid;
use vetsync_core::{
    errors::{AppointmentError, AppointmentResult},
    models::appointment::{
        CreateAppointment, CreateAppointmentRequest, ListAppointmentsRequest, RESERVED_FIELDS,
        UpdateAppointment, UpdateAppointmentRequest,
    },
};

use super::error_handling::AppError;

#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                self.0.push(format!("{} is required", field));
                None
            }
        }
    }

    fn identifier(&mut self, field: &str, value: Option<&str>) -> Option<Uuid> {
        let value = self.required(field, value)?;
        match Uuid::parse_str(value) {
            Ok(id) => Some(id),
            Err(_) => {
                self.0.push(format!("{} is not a valid identifier", field));
                None
            }
        }
    }

    fn reserved_fields(&mut self, extra: &Map<String, Value>) {
        for key in extra.keys() {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                self.0.push(format!("{} cannot be set through this operation", key));
            }
        }
    }

    fn finish(self) -> AppointmentResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppointmentError::Validation(self.0.join("; ")))
        }
    }
}

/// Unwraps a JSON body, reporting malformed payloads as validation errors.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError(AppointmentError::Validation(rejection.body_text())))
}

/// Parses a single identifier such as a path parameter.
pub fn parse_identifier(field: &str, value: &str) -> AppointmentResult<Uuid> {
    let mut violations = Violations::default();
    let id = violations.identifier(field, Some(value));
    violations.finish()?;
    id.ok_or_else(|| AppointmentError::Validation(format!("{} is required", field)))
}

pub fn validate_create(request: CreateAppointmentRequest) -> AppointmentResult<CreateAppointment> {
    let mut violations = Violations::default();
    let date = violations.required("date", request.date.as_deref()).map(str::to_string);
    let pet = violations.identifier("pet", request.pet.as_deref());
    let user = violations.identifier("user", request.user.as_deref());
    violations.reserved_fields(&request.extra);
    violations.finish()?;

    match (date, pet, user) {
        (Some(date), Some(pet), Some(user)) => Ok(CreateAppointment {
            pet,
            user,
            date,
            extra: request.extra,
        }),
        _ => Err(AppointmentError::Validation("date, pet and user are required".to_string())),
    }
}

pub fn validate_list(request: ListAppointmentsRequest) -> AppointmentResult<Uuid> {
    let mut violations = Violations::default();
    let user = violations.identifier("uidUser", request.uid_user.as_deref());
    violations.finish()?;
    user.ok_or_else(|| AppointmentError::Validation("uidUser is required".to_string()))
}

pub fn validate_update(request: UpdateAppointmentRequest) -> AppointmentResult<UpdateAppointment> {
    let mut violations = Violations::default();
    let pet = violations.identifier("pet", request.pet.as_deref());
    let user = violations.identifier("user", request.user.as_deref());
    // An explicitly blank date is a mistake, not a request to keep the old one
    let date = match request.date.as_deref() {
        Some(raw) => violations.required("date", Some(raw)).map(str::to_string),
        None => None,
    };
    violations.reserved_fields(&request.extra);
    violations.finish()?;

    match (pet, user) {
        (Some(pet), Some(user)) => Ok(UpdateAppointment {
            pet,
            user,
            date,
            extra: request.extra,
        }),
        _ => Err(AppointmentError::Validation("pet and user are required".to_string())),
    }
}
