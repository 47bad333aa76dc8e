use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;
use vetsync_core::models::appointment::{
    CancelAppointmentResponse, CreateAppointmentRequest, CreateAppointmentResponse,
    ListAppointmentsRequest, ListAppointmentsResponse, UpdateAppointmentRequest,
    UpdateAppointmentResponse,
};

use crate::{
    ApiState,
    middleware::{
        error_handling::AppError,
        validation::{self, json_body},
    },
};

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<Json<CreateAppointmentResponse>, AppError> {
    let command = validation::validate_create(json_body(payload)?)?;
    let requested_date = command.date.clone();

    state.appointments.create(command).await?;

    Ok(Json(CreateAppointmentResponse {
        success: true,
        msg: format!("Appointment created successfully for {}", requested_date),
    }))
}

#[axum::debug_handler]
pub async fn list_appointments_by_owner(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ListAppointmentsRequest>, JsonRejection>,
) -> Result<Json<ListAppointmentsResponse>, AppError> {
    let user_id = validation::validate_list(json_body(payload)?)?;

    let (total, appointment) = state.appointments.list_by_owner(user_id).await?;

    Ok(Json(ListAppointmentsResponse {
        success: true,
        message: "Appointments retrieved successfully".to_string(),
        total,
        appointment,
    }))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(uid): Path<String>,
    payload: Result<Json<UpdateAppointmentRequest>, JsonRejection>,
) -> Result<Json<UpdateAppointmentResponse>, AppError> {
    let id = validation::parse_identifier("uid", &uid)?;
    let command = validation::validate_update(json_body(payload)?)?;

    let appointment = state.appointments.update(id, command).await?;

    Ok(Json(UpdateAppointmentResponse {
        success: true,
        msg: "Appointment updated successfully".to_string(),
        appointment,
    }))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(uid): Path<String>,
) -> Result<Json<CancelAppointmentResponse>, AppError> {
    let id = validation::parse_identifier("uid", &uid)?;

    let cancel_appointment = state.appointments.cancel(id).await?;

    Ok(Json(CancelAppointmentResponse {
        success: true,
        msg: "Appointment canceled successfully".to_string(),
        cancel_appointment,
    }))
}
