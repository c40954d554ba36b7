//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{SearchService, WhoisService};
use crate::domain::history_event::HistorySink;
use crate::domain::repositories::PricingRepository;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
    pub whois_service: Arc<WhoisService>,
    /// Used by the health check to verify database access.
    pub pricing_repository: Arc<dyn PricingRepository>,
    pub cache: Arc<dyn CacheService>,
    pub history_sender: HistorySink,
    /// Read client IPs from proxy headers.
    pub behind_proxy: bool,
}
