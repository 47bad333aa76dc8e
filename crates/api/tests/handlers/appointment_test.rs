use axum::http::StatusCode;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;
use vetsync_core::errors::AppointmentError;
use vetsync_db::mock::repositories::{MockAppointmentRepo, MockPetRepo};

use crate::test_utils::{TestContext, server_with_mocks};

async fn list_for(ctx: &TestContext, owner: Uuid) -> Value {
    let response = ctx
        .server
        .post("/api/appointments/owner")
        .json(&json!({ "uidUser": owner }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()
}

#[tokio::test]
async fn test_create_then_list_includes_hydrated_appointment() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "date": "2024-03-01T10:00:00Z",
            "pet": pet,
            "user": owner,
            "reason": "annual vaccination"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(true));
    assert!(body["msg"].as_str().unwrap().contains("2024-03-01T10:00:00Z"));

    let listed = list_for(&ctx, owner).await;
    assert_eq!(listed["success"], json!(true));
    assert_eq!(listed["total"], json!(1));
    let appointment = &listed["appointment"][0];
    assert_eq!(appointment["status"], json!("SCHEDULED"));
    assert_eq!(appointment["reason"], json!("annual vaccination"));
    assert_eq!(appointment["pet"]["name"], json!("Toby"));
    assert_eq!(appointment["user"]["email"], json!("maria@example.com"));
}

#[tokio::test]
async fn test_same_day_booking_is_rejected_but_next_day_is_not() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;

    let book = |date: &'static str| {
        ctx.server
            .post("/api/appointments")
            .json(&json!({ "date": date, "pet": pet, "user": owner }))
    };

    assert_eq!(book("2024-03-01T10:00:00Z").await.status_code(), StatusCode::OK);

    let duplicate = book("2024-03-01T18:00:00Z").await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    let body = duplicate.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["msg"],
        json!("The owner and the pet already have an appointment for this day")
    );

    assert_eq!(book("2024-03-02T10:00:00Z").await.status_code(), StatusCode::OK);
    assert_eq!(ctx.store.len().await, 2);
    assert_eq!(list_for(&ctx, owner).await["total"], json!(2));
}

#[tokio::test]
async fn test_create_with_unparseable_date_persists_nothing() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({ "date": "next tuesday", "pet": pet, "user": owner }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["msg"]
        .as_str()
        .unwrap()
        .starts_with("Invalid date"));
    assert!(ctx.store.is_empty().await);
}

#[rstest]
#[case("+262142-12-31")]
#[case("-5000-01-01")]
#[case("0000-06-15T10:00:00Z")]
#[tokio::test]
async fn test_create_with_out_of_range_year_is_invalid_date(#[case] date: &str) {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({ "date": date, "pet": pet, "user": owner }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert!(body["msg"].as_str().unwrap().starts_with("Invalid date"));
    assert!(ctx.store.is_empty().await);
}

#[rstest]
#[case("Fri, 01 Mar 2024 10:00:00 GMT")]
#[case("03/01/2024")]
#[tokio::test]
async fn test_create_accepts_rfc2822_and_us_dates(#[case] date: &str) {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({ "date": date, "pet": pet, "user": owner }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let listed = list_for(&ctx, owner).await;
    assert!(listed["appointment"][0]["date"]
        .as_str()
        .unwrap()
        .starts_with("2024-03-01T"));
}

#[tokio::test]
async fn test_create_for_unknown_pet_persists_nothing() {
    let ctx = TestContext::new();
    let (owner, _) = ctx.seed_owner_with_pet().await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({ "date": "2024-03-01", "pet": Uuid::new_v4(), "user": owner }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["success"], json!(false));
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({ "pet": "507f1f77bcf86cd799439011" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let msg = response.json::<Value>()["msg"].as_str().unwrap().to_string();
    assert!(msg.contains("date is required"));
    assert!(msg.contains("pet is not a valid identifier"));
    assert!(msg.contains("user is required"));
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments")
        .text("{ not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], json!(false));
}

#[tokio::test]
async fn test_list_for_owner_without_appointments() {
    let ctx = TestContext::new();

    let listed = list_for(&ctx, Uuid::new_v4()).await;

    assert_eq!(listed["total"], json!(0));
    assert_eq!(listed["appointment"], json!([]));
}

#[tokio::test]
async fn test_list_requires_valid_owner_id() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments/owner")
        .json(&json!({ "uidUser": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_replaces_fields_and_returns_hydrated_record() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;
    ctx.server
        .post("/api/appointments")
        .json(&json!({ "date": "2024-03-01T10:00:00Z", "pet": pet, "user": owner, "reason": "checkup" }))
        .await;
    let id = list_for(&ctx, owner).await["appointment"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .server
        .put(&format!("/api/appointments/{}", id))
        .json(&json!({
            "pet": pet,
            "user": owner,
            "date": "2024-03-04T15:30:00Z",
            "room": "B2"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["msg"], json!("Appointment updated successfully"));
    assert_eq!(body["appointment"]["date"], json!("2024-03-04T15:30:00Z"));
    assert_eq!(body["appointment"]["reason"], json!("checkup"));
    assert_eq!(body["appointment"]["room"], json!("B2"));
    assert_eq!(body["appointment"]["pet"]["id"], json!(pet));
}

#[tokio::test]
async fn test_update_onto_a_taken_day_is_rejected() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;
    for date in ["2024-03-01T10:00:00Z", "2024-03-02T10:00:00Z"] {
        ctx.server
            .post("/api/appointments")
            .json(&json!({ "date": date, "pet": pet, "user": owner }))
            .await;
    }
    let listed = list_for(&ctx, owner).await;
    let second = listed["appointment"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["date"] == json!("2024-03-02T10:00:00Z"))
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .server
        .put(&format!("/api/appointments/{}", second))
        .json(&json!({ "pet": pet, "user": owner, "date": "2024-03-01T16:00:00Z" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["msg"],
        json!("The owner and the pet already have an appointment for this day")
    );
}

#[tokio::test]
async fn test_update_cannot_change_status() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;

    let response = ctx
        .server
        .put(&format!("/api/appointments/{}", Uuid::new_v4()))
        .json(&json!({ "pet": pet, "user": owner, "status": "SCHEDULED" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_or_malformed_id() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;
    let body = json!({ "pet": pet, "user": owner });

    let missing = ctx
        .server
        .put(&format!("/api/appointments/{}", Uuid::new_v4()))
        .json(&body)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let malformed = ctx.server.put("/api/appointments/42").json(&body).await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_twice_succeeds() {
    let ctx = TestContext::new();
    let (owner, pet) = ctx.seed_owner_with_pet().await;
    ctx.server
        .post("/api/appointments")
        .json(&json!({ "date": "2024-03-01T10:00:00Z", "pet": pet, "user": owner }))
        .await;
    let id = list_for(&ctx, owner).await["appointment"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    for _ in 0..2 {
        let response = ctx
            .server
            .patch(&format!("/api/appointments/{}/cancel", id))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["cancelAppointment"]["status"], json!("CANCELED"));
        assert_eq!(body["cancelAppointment"]["user"]["id"], json!(owner));
    }
}

#[tokio::test]
async fn test_cancel_unknown_appointment() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .patch(&format!("/api/appointments/{}/cancel", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_redacted() {
    let owner = Uuid::new_v4();
    let mut appointments = MockAppointmentRepo::new();
    appointments
        .expect_count_by_user()
        .with(predicate::eq(owner))
        .returning(|_| {
            Err(AppointmentError::Database(eyre::eyre!(
                "password authentication failed for user \"vetsync\""
            )))
        });
    appointments
        .expect_find_by_user()
        .returning(|_| Ok(Vec::new()));
    let server = server_with_mocks(appointments, MockPetRepo::new());

    let response = server
        .post("/api/appointments/owner")
        .json(&json!({ "uidUser": owner }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("store_failure"));
    assert!(!body.to_string().contains("password"));
}

#[tokio::test]
async fn test_concurrent_insert_losing_the_race_reports_duplicate() {
    let mut appointments = MockAppointmentRepo::new();
    let mut pets = MockPetRepo::new();
    pets.expect_find_pet().returning(|id| {
        Ok(Some(vetsync_core::models::pet::Pet {
            id,
            name: "Nala".to_string(),
            species: "cat".to_string(),
            breed: None,
            owner_id: None,
            created_at: chrono::Utc::now(),
        }))
    });
    appointments.expect_find_one().returning(|_| Ok(None));
    appointments
        .expect_insert()
        .times(1)
        .returning(|_| Err(AppointmentError::DuplicateAppointment));
    let server = server_with_mocks(appointments, pets);

    let response = server
        .post("/api/appointments")
        .json(&json!({ "date": "2024-03-01", "pet": Uuid::new_v4(), "user": Uuid::new_v4() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health = ctx.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>()["status"], json!("ok"));

    let version = ctx.server.get("/version").await;
    assert_eq!(version.status_code(), StatusCode::OK);
    assert!(version.json::<Value>()["version"].is_string());
}
