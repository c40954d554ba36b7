//! Search results produced by the search pipeline.

use chrono::{DateTime, Utc};

use crate::domain::availability::AvailabilityState;
use crate::domain::entities::PricedOffer;
use crate::utils::domain_normalizer::extract_zone;

/// WHOIS data attached to a taken domain.
///
/// The search pipeline never resolves WHOIS content itself; it only marks taken
/// results as fetchable through the separate WHOIS lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhoisField {
    Pending,
}

/// Resolution of one candidate domain within a search.
///
/// Invariants maintained by [`SearchResult::set_state`]:
/// - `registrars` is `Some` only while the state is available
/// - `whois` is `Some(WhoisField::Pending)` exactly while the state is taken
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub domain: String,
    pub zone: String,
    pub state: AvailabilityState,
    pub registrars: Option<Vec<PricedOffer>>,
    pub whois: Option<WhoisField>,
    /// True when the state comes from live lookups made by this request.
    pub fresh: bool,
}

impl SearchResult {
    /// Creates a live result for `domain` in the given state.
    pub fn new(domain: impl Into<String>, state: AvailabilityState) -> Self {
        let domain = domain.into();
        let zone = extract_zone(&domain);

        let mut result = Self {
            domain,
            zone,
            state,
            registrars: None,
            whois: None,
            fresh: true,
        };
        result.set_state(state);
        result
    }

    /// Creates a result from a previously cached state.
    pub fn cached(domain: impl Into<String>, state: AvailabilityState) -> Self {
        Self {
            fresh: false,
            ..Self::new(domain, state)
        }
    }

    /// Moves the result to a new state, keeping the enrichment fields consistent.
    ///
    /// Leaving the available state drops registrar offers; entering it starts
    /// with an empty offer list until pricing is attached.
    pub fn set_state(&mut self, state: AvailabilityState) {
        self.state = state;

        match state {
            AvailabilityState::Available => {
                self.whois = None;
                if self.registrars.is_none() {
                    self.registrars = Some(Vec::new());
                }
            }
            AvailabilityState::Taken => {
                self.registrars = None;
                self.whois = Some(WhoisField::Pending);
            }
            AvailabilityState::Unknown => {
                self.registrars = None;
                self.whois = None;
            }
        }
    }

    /// Attaches ranked registrar offers. Ignored unless the domain is available.
    pub fn attach_offers(&mut self, offers: Vec<PricedOffer>) {
        if self.state == AvailabilityState::Available {
            self.registrars = Some(offers);
        }
    }
}

/// Final output of one search request.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_taken_result_has_pending_whois() {
        let result = SearchResult::new("example.com", AvailabilityState::Taken);

        assert_eq!(result.zone, ".com");
        assert_eq!(result.whois, Some(WhoisField::Pending));
        assert!(result.registrars.is_none());
        assert!(result.fresh);
    }

    #[test]
    fn test_new_available_result_has_empty_offers() {
        let result = SearchResult::new("example.io", AvailabilityState::Available);

        assert_eq!(result.registrars, Some(Vec::new()));
        assert!(result.whois.is_none());
    }

    #[test]
    fn test_new_unknown_result_is_bare() {
        let result = SearchResult::new("x.com", AvailabilityState::Unknown);

        assert!(result.registrars.is_none());
        assert!(result.whois.is_none());
    }

    #[test]
    fn test_set_state_clears_stale_enrichment() {
        let mut result = SearchResult::new("x.com", AvailabilityState::Taken);
        result.set_state(AvailabilityState::Available);
        assert!(result.whois.is_none());
        assert_eq!(result.registrars, Some(Vec::new()));

        result.set_state(AvailabilityState::Unknown);
        assert!(result.registrars.is_none());
    }

    #[test]
    fn test_attach_offers_only_when_available() {
        let mut result = SearchResult::new("x.com", AvailabilityState::Taken);
        result.attach_offers(Vec::new());
        assert!(result.registrars.is_none());
    }

    #[test]
    fn test_cached_result_is_not_fresh() {
        let result = SearchResult::cached("x.com", AvailabilityState::Taken);
        assert!(!result.fresh);
        assert_eq!(result.whois, Some(WhoisField::Pending));
    }
}
