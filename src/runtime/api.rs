//! API-facing request/response models.
//!
//! Routing lives outside this crate; these helpers turn manager results into
//! a status class plus a JSON-ready body.

use serde::{Deserialize, Serialize};

use crate::core::{
    EventId, EventRegistry, Reservation, ReservationError, ReservationId, ReservationManager,
    ReservationStore, UserId, UserRegistry,
};

/// Reservation creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    /// Event to reserve.
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    /// User making the reservation.
    #[serde(rename = "userID")]
    pub user_id: UserId,
}

/// Reservation as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationView {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Reserved event.
    #[serde(rename = "eventID")]
    pub event_id: EventId,
    /// Holder.
    #[serde(rename = "userID")]
    pub user_id: UserId,
}

impl From<Reservation> for ReservationView {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            user_id: r.user_id,
        }
    }
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// Status family suggested to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Success.
    Ok,
    /// Referenced resource does not exist.
    NotFound,
    /// Request is valid but cannot be honored (full event, duplicate, bad input).
    ClientError,
    /// Transient failure; the client may retry.
    Unavailable,
}

impl StatusClass {
    /// Conventional HTTP status code for the class.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
            Self::ClientError => 422,
            Self::Unavailable => 503,
        }
    }
}

/// Status plus body ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status family.
    pub status: StatusClass,
    /// JSON body.
    pub body: serde_json::Value,
}

impl Response {
    fn ok(body: impl Serialize) -> Self {
        Self {
            status: StatusClass::Ok,
            body: serde_json::to_value(body).unwrap_or(serde_json::Value::Null),
        }
    }

    fn error(status: StatusClass, message: impl Into<String>) -> Self {
        let body = ErrorBody {
            error: message.into(),
        };
        Self {
            status,
            body: serde_json::to_value(body).unwrap_or(serde_json::Value::Null),
        }
    }
}

impl From<ReservationError> for Response {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::EventNotFound(id) => {
                Self::error(StatusClass::NotFound, format!("Event not found for id: {id}"))
            }
            ReservationError::UserNotFound(id) => {
                Self::error(StatusClass::ClientError, format!("User not found for id: {id}"))
            }
            ReservationError::ReservationNotFound(id) => Self::error(
                StatusClass::NotFound,
                format!("Reservation not found for id: {id}"),
            ),
            ReservationError::CapacityExceeded(_) => Self::error(
                StatusClass::ClientError,
                "There aren't enough slots available to make the reservation.",
            ),
            ReservationError::AlreadyReserved(event_id, user_id) => Self::error(
                StatusClass::ClientError,
                format!("User {user_id} already has a reservation for event {event_id}."),
            ),
            ReservationError::InvalidCapacity(n) => Self::error(
                StatusClass::ClientError,
                format!("maxParticipants must be at least 1, got {n}"),
            ),
            ReservationError::Storage(e) => {
                tracing::error!("storage failure surfaced to client: {}", e);
                Self::error(StatusClass::Unavailable, "Problem while querying database")
            }
        }
    }
}

/// Create a reservation and map the result.
pub async fn create_reservation<E, U, S>(
    manager: &ReservationManager<E, U, S>,
    req: CreateReservationRequest,
) -> Response
where
    E: EventRegistry,
    U: UserRegistry,
    S: ReservationStore,
{
    match manager.create(req.event_id, req.user_id).await {
        Ok(reservation) => Response::ok(ReservationView::from(reservation)),
        Err(e) => e.into(),
    }
}

/// Fetch a reservation and map the result.
pub fn get_reservation<E, U, S>(manager: &ReservationManager<E, U, S>, id: ReservationId) -> Response
where
    E: EventRegistry,
    U: UserRegistry,
    S: ReservationStore,
{
    match manager.get_by_id(id) {
        Ok(reservation) => Response::ok(ReservationView::from(reservation)),
        Err(e) => e.into(),
    }
}

/// Delete a reservation and map the result.
pub fn delete_reservation<E, U, S>(
    manager: &ReservationManager<E, U, S>,
    id: ReservationId,
) -> Response
where
    E: EventRegistry,
    U: UserRegistry,
    S: ReservationStore,
{
    match manager.delete_by_id(id) {
        Ok(_) => Response::ok(serde_json::json!({ "message": "OK" })),
        Err(e) => e.into(),
    }
}

/// List an event's reservations and map the result.
pub async fn list_event_reservations<E, U, S>(
    manager: &ReservationManager<E, U, S>,
    event_id: EventId,
) -> Response
where
    E: EventRegistry,
    U: UserRegistry,
    S: ReservationStore,
{
    match manager.list_for_event(event_id).await {
        Ok(rows) => Response::ok(
            rows.into_iter()
                .map(ReservationView::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => e.into(),
    }
}
