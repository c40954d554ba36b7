//! Core domain entities representing the search data model.
//!
//! Entities are plain data structures; the invariants that tie their fields
//! together live in small methods next to them.
//!
//! # Entity Types
//!
//! - [`RegistrarOffer`] - An active registrar price for a zone
//! - [`PricedOffer`] - An offer projected for one candidate domain
//! - [`SearchResult`] - The resolution of one candidate domain
//! - [`SearchResponse`] - The final, ordered output of a search
//! - [`HistoryEntry`] - A stored audit row (`NewHistoryEntry` for inserts)

pub mod history;
pub mod registrar_offer;
pub mod search_result;

pub use history::{HistoryEntry, NewHistoryEntry};
pub use registrar_offer::{PricedOffer, RegistrarOffer};
pub use search_result::{SearchResponse, SearchResult, WhoisField};
