use crate::{DbPool, models::DbPet};
use async_trait::async_trait;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use vetsync_core::{errors::AppointmentResult, models::pet::Pet, repository::PetRepository};

pub async fn get_pet_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPet>> {
    tracing::debug!("Getting pet by id: {}", id);

    let pet = sqlx::query_as::<_, DbPet>(
        r#"
        SELECT id, name, species, breed, owner_id, created_at
        FROM pets
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(pet)
}

/// PostgreSQL-backed [`PetRepository`].
#[derive(Clone)]
pub struct PgPetRepository {
    pool: DbPool,
}

impl PgPetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetRepository for PgPetRepository {
    async fn find_pet(&self, id: Uuid) -> AppointmentResult<Option<Pet>> {
        let pet = get_pet_by_id(&self.pool, id).await?;
        Ok(pet.map(Pet::from))
    }
}
