use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;
use vetsync_core::{
    errors::AppointmentResult,
    models::{
        appointment::{
            Appointment, AppointmentDetails, AppointmentFilter, AppointmentPatch, NewAppointment,
        },
        pet::Pet,
    },
    repository::{AppointmentRepository, PetRepository},
};

// Mock repositories for testing
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentRepository for AppointmentRepo {
        async fn find_one(
            &self,
            filter: &AppointmentFilter,
        ) -> AppointmentResult<Option<Appointment>>;

        async fn insert(&self, record: NewAppointment) -> AppointmentResult<Appointment>;

        async fn find_and_update(
            &self,
            id: Uuid,
            patch: AppointmentPatch,
        ) -> AppointmentResult<Option<AppointmentDetails>>;

        async fn count_by_user(&self, user_id: Uuid) -> AppointmentResult<u64>;

        async fn find_by_user(&self, user_id: Uuid) -> AppointmentResult<Vec<AppointmentDetails>>;
    }
}

mock! {
    pub PetRepo {}

    #[async_trait]
    impl PetRepository for PetRepo {
        async fn find_pet(&self, id: Uuid) -> AppointmentResult<Option<Pet>>;
    }
}
