use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;
use uuid::Uuid;
use vetsync_api::{ApiState, app};
use vetsync_core::{
    models::{pet::Pet, user::User},
    service::AppointmentService,
};
use vetsync_db::{
    memory::InMemoryStore,
    mock::repositories::{MockAppointmentRepo, MockPetRepo},
};

/// A running app backed by the in-memory store.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub server: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = AppointmentService::new(store.clone(), store.clone());
        let server = build_server(service);

        Self { store, server }
    }

    /// Registers an owner and one of their pets, returning both ids.
    pub async fn seed_owner_with_pet(&self) -> (Uuid, Uuid) {
        let owner = User {
            id: Uuid::new_v4(),
            name: "Maria Lopez".to_string(),
            email: "maria@example.com".to_string(),
            created_at: Utc::now(),
        };
        let pet = Pet {
            id: Uuid::new_v4(),
            name: "Toby".to_string(),
            species: "dog".to_string(),
            breed: Some("beagle".to_string()),
            owner_id: Some(owner.id),
            created_at: Utc::now(),
        };
        let ids = (owner.id, pet.id);

        self.store.add_user(owner).await;
        self.store.add_pet(pet).await;
        ids
    }
}

/// An app whose repositories are mockall mocks, for failure paths the
/// in-memory store cannot produce.
pub fn server_with_mocks(appointments: MockAppointmentRepo, pets: MockPetRepo) -> TestServer {
    build_server(AppointmentService::new(Arc::new(appointments), Arc::new(pets)))
}

fn build_server(service: AppointmentService) -> TestServer {
    let state = Arc::new(ApiState::new(service));
    TestServer::new(app(state)).expect("Failed to start test server")
}
