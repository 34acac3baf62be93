//! Collaborator-facing request/response surface.

pub mod api;

pub use api::{
    create_reservation, delete_reservation, get_reservation, list_event_reservations,
    CreateReservationRequest, ErrorBody, ReservationView, Response, StatusClass,
};
