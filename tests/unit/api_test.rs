//! Tests for request/response mapping

use prometheus_reservations::core::{AdmissionController, ReservationError, ReservationManager};
use prometheus_reservations::infra::{
    InMemoryEventRegistry, InMemoryReservationStore, InMemoryUserRegistry,
};
use prometheus_reservations::runtime::{
    create_reservation, delete_reservation, get_reservation, list_event_reservations,
    CreateReservationRequest, Response, StatusClass,
};
use serde_json::json;

fn manager() -> ReservationManager<InMemoryEventRegistry, InMemoryUserRegistry, InMemoryReservationStore> {
    let events = InMemoryEventRegistry::new();
    events.register(1, 1).unwrap();
    ReservationManager::new(AdmissionController::new(
        events,
        InMemoryUserRegistry::with_users([10, 11]),
        InMemoryReservationStore::new(),
    ))
}

fn request(body: serde_json::Value) -> CreateReservationRequest {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_create_maps_outcomes() {
    let manager = manager();

    let ok = create_reservation(&manager, request(json!({"eventID": 1, "userID": 10}))).await;
    assert_eq!(ok.status, StatusClass::Ok);
    assert_eq!(ok.body["eventID"], 1);
    assert_eq!(ok.body["userID"], 10);

    let full = create_reservation(&manager, request(json!({"eventID": 1, "userID": 11}))).await;
    assert_eq!(full.status, StatusClass::ClientError);
    assert_eq!(
        full.body["error"],
        "There aren't enough slots available to make the reservation."
    );

    let dup = create_reservation(&manager, request(json!({"eventID": 1, "userID": 10}))).await;
    assert_eq!(dup.status, StatusClass::ClientError);
    assert_ne!(dup.body, full.body);

    let no_event = create_reservation(&manager, request(json!({"eventID": 2, "userID": 10}))).await;
    assert_eq!(no_event.status, StatusClass::NotFound);
    assert_eq!(no_event.body["error"], "Event not found for id: 2");

    let no_user = create_reservation(&manager, request(json!({"eventID": 1, "userID": 99}))).await;
    assert_eq!(no_user.status, StatusClass::ClientError);
    assert_eq!(no_user.body["error"], "User not found for id: 99");
}

#[tokio::test]
async fn test_get_list_and_delete() {
    let manager = manager();
    let created = manager.create(1, 10).await.unwrap();

    let got = get_reservation(&manager, created.id);
    assert_eq!(got.status, StatusClass::Ok);
    assert_eq!(got.body, json!({"id": created.id, "eventID": 1, "userID": 10}));

    let listed = list_event_reservations(&manager, 1).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

    let deleted = delete_reservation(&manager, created.id);
    assert_eq!(deleted.status, StatusClass::Ok);
    assert_eq!(deleted.body["message"], "OK");

    let missing = delete_reservation(&manager, created.id);
    assert_eq!(missing.status, StatusClass::NotFound);
    assert_eq!(
        missing.body["error"],
        format!("Reservation not found for id: {}", created.id)
    );
}

#[test]
fn test_storage_error_is_unavailable() {
    let response = Response::from(ReservationError::Storage("io".into()));
    assert_eq!(response.status, StatusClass::Unavailable);
    assert_eq!(response.status.http_status(), 503);
    assert_eq!(StatusClass::NotFound.http_status(), 404);
}
