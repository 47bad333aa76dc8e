use crate::{
    DbPool,
    models::{DbAppointment, DbAppointmentRow},
};
use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres, types::Json};
use uuid::Uuid;
use vetsync_core::{
    calendar,
    errors::{AppointmentError, AppointmentResult},
    models::appointment::{
        Appointment, AppointmentDetails, AppointmentFilter, AppointmentPatch, AppointmentStatus,
        NewAppointment,
    },
    repository::AppointmentRepository,
};

const APPOINTMENT_COLUMNS: &str = "id, pet_id, user_id, appointment_date, appointment_day, \
     status, extra, created_at, updated_at";

const HYDRATED_COLUMNS: &str = r#"
    a.id, a.pet_id, a.user_id, a.appointment_date, a.status, a.extra, a.created_at, a.updated_at,
    p.id AS pet_ref_id, p.name AS pet_name, p.species AS pet_species, p.breed AS pet_breed,
    p.owner_id AS pet_owner_id, p.created_at AS pet_created_at,
    u.id AS user_ref_id, u.name AS user_name, u.email AS user_email,
    u.created_at AS user_created_at
"#;

const HYDRATED_JOINS: &str = r#"
    LEFT JOIN pets p ON p.id = a.pet_id
    LEFT JOIN users u ON u.id = a.user_id
"#;

pub async fn find_appointment(
    pool: &Pool<Postgres>,
    filter: &AppointmentFilter,
) -> Result<Option<DbAppointment>> {
    let (from, to) = filter.date_range.unzip();
    tracing::debug!(
        "Finding appointment: pet={:?}, user={:?}, from={:?}, to={:?}",
        filter.pet, filter.user, from, to
    );

    let sql = format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE ($1::uuid IS NULL OR pet_id = $1)
          AND ($2::uuid IS NULL OR user_id = $2)
          AND ($3::timestamptz IS NULL OR appointment_date >= $3)
          AND ($4::timestamptz IS NULL OR appointment_date <= $4)
        LIMIT 1
        "#
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(&sql)
        .bind(filter.pet)
        .bind(filter.user)
        .bind(from)
        .bind(to)
        .fetch_optional(pool)
        .await?;

    Ok(appointment)
}

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    record: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, pet={}, user={}, date={}",
        id, record.pet, record.user, record.date
    );

    let sql = format!(
        r#"
        INSERT INTO appointments
            (id, pet_id, user_id, appointment_date, appointment_day, status, extra, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(&sql)
        .bind(id)
        .bind(record.pet)
        .bind(record.user)
        .bind(record.date)
        .bind(calendar::utc_day(record.date))
        .bind(AppointmentStatus::Scheduled.as_str())
        .bind(Json(&record.extra))
        .bind(now)
        .fetch_one(pool)
        .await?;

    Ok(appointment)
}

pub async fn update_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &AppointmentPatch,
) -> Result<Option<DbAppointmentRow>> {
    tracing::debug!("Updating appointment: id={}, patch={:?}", id, patch);

    let sql = format!(
        r#"
        WITH a AS (
            UPDATE appointments SET
                pet_id = COALESCE($2, pet_id),
                user_id = COALESCE($3, user_id),
                appointment_date = COALESCE($4, appointment_date),
                appointment_day = COALESCE($5, appointment_day),
                status = COALESCE($6, status),
                extra = extra || $7::jsonb,
                updated_at = $8
            WHERE id = $1
            RETURNING *
        )
        SELECT {HYDRATED_COLUMNS}
        FROM a
        {HYDRATED_JOINS}
        "#
    );

    let row = sqlx::query_as::<_, DbAppointmentRow>(&sql)
        .bind(id)
        .bind(patch.pet)
        .bind(patch.user)
        .bind(patch.date)
        .bind(patch.date.map(calendar::utc_day))
        .bind(patch.status.map(|status| status.as_str()))
        .bind(Json(&patch.extra))
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    if row.is_none() {
        tracing::debug!("Appointment not found: id={}", id);
    }

    Ok(row)
}

pub async fn count_appointments_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<u64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(u64::try_from(count)?)
}

pub async fn get_appointments_by_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbAppointmentRow>> {
    let sql = format!(
        r#"
        SELECT {HYDRATED_COLUMNS}
        FROM appointments a
        {HYDRATED_JOINS}
        WHERE a.user_id = $1
        ORDER BY a.appointment_date ASC
        "#
    );

    let rows = sqlx::query_as::<_, DbAppointmentRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

fn is_unique_violation(err: &eyre::Report) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
    )
}

/// Writes rejected by the same-day index surface as `DuplicateAppointment`.
fn map_write_error(err: eyre::Report) -> AppointmentError {
    if is_unique_violation(&err) {
        AppointmentError::DuplicateAppointment
    } else {
        AppointmentError::Database(err)
    }
}

/// PostgreSQL-backed [`AppointmentRepository`].
#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: DbPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn find_one(&self, filter: &AppointmentFilter) -> AppointmentResult<Option<Appointment>> {
        find_appointment(&self.pool, filter)
            .await?
            .map(Appointment::try_from)
            .transpose()
            .map_err(AppointmentError::Database)
    }

    async fn insert(&self, record: NewAppointment) -> AppointmentResult<Appointment> {
        let row = create_appointment(&self.pool, &record)
            .await
            .map_err(map_write_error)?;

        Ok(Appointment::try_from(row)?)
    }

    async fn find_and_update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> AppointmentResult<Option<AppointmentDetails>> {
        let row = update_appointment(&self.pool, id, &patch)
            .await
            .map_err(map_write_error)?;

        Ok(row.map(AppointmentDetails::try_from).transpose()?)
    }

    async fn count_by_user(&self, user_id: Uuid) -> AppointmentResult<u64> {
        Ok(count_appointments_by_user(&self.pool, user_id).await?)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppointmentResult<Vec<AppointmentDetails>> {
        let rows = get_appointments_by_user(&self.pool, user_id).await?;

        Ok(rows
            .into_iter()
            .map(AppointmentDetails::try_from)
            .collect::<Result<Vec<_>>>()?)
    }
}
