use axum::{
    Router,
    routing::{patch, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::create_appointment),
        )
        .route(
            "/api/appointments/owner",
            post(handlers::appointment::list_appointments_by_owner),
        )
        .route(
            "/api/appointments/:uid",
            put(handlers::appointment::update_appointment),
        )
        .route(
            "/api/appointments/:uid/cancel",
            patch(handlers::appointment::cancel_appointment),
        )
}
