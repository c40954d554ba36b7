//! Search audit history records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::availability::AvailabilityState;

/// A stored audit row describing one resolved candidate of one search.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub request_id: Uuid,
    pub domain: String,
    pub state: AvailabilityState,
    pub zone: String,
    pub query: String,
    pub language: Option<String>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a new audit row.
///
/// `request_id` correlates every row written by a single search so that the
/// retry pass updates exactly the rows of its own request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub request_id: Uuid,
    pub domain: String,
    pub state: AvailabilityState,
    pub zone: String,
    pub query: String,
    pub language: Option<String>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}
