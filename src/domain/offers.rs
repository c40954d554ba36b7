//! Registrar offer ranking and currency normalization.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::entities::{PricedOffer, RegistrarOffer};

/// Conversion rates into a single base currency.
///
/// A currency is convertible only when it is the base currency or has a known
/// rate. Prices in other currencies have no base value and are never compared
/// against converted ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    base: String,
    rates: HashMap<String, f64>,
}

impl ExchangeRates {
    /// Creates rates knowing only the base currency.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().to_ascii_uppercase(),
            rates: HashMap::new(),
        }
    }

    /// Adds or replaces the rate for `currency` (base units per one `currency` unit).
    pub fn with_rate(mut self, currency: &str, rate: f64) -> Self {
        self.insert(currency, rate);
        self
    }

    /// Invalid rates (zero, negative, NaN) are ignored.
    pub fn insert(&mut self, currency: &str, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rates.insert(currency.to_ascii_uppercase(), rate);
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns base-currency units per one unit of `currency`, if known.
    pub fn rate_for(&self, currency: &str) -> Option<f64> {
        if currency.eq_ignore_ascii_case(&self.base) {
            return Some(1.0);
        }

        self.rates.get(&currency.to_ascii_uppercase()).copied()
    }

    /// Converts `amount` in `currency` into the base currency.
    pub fn to_base(&self, amount: f64, currency: &str) -> Option<f64> {
        self.rate_for(currency).map(|rate| amount * rate)
    }
}

/// Projects, deduplicates and ranks the offers for one available domain.
///
/// - Keeps the first offer per registrar id, so the repository's display order
///   decides which duplicate survives
/// - Sorts by price converted with `rates`; ties keep repository order
/// - Places offers in a currency without a rate after every converted offer,
///   in repository order
/// - Keeps at most `limit` offers
///
/// # Examples
///
/// ```ignore
/// let rates = ExchangeRates::new("USD").with_rate("EUR", 1.1);
/// let ranked = rank_offers(offers, "foo.io", &rates, 10);
/// ```
pub fn rank_offers(
    offers: Vec<RegistrarOffer>,
    domain: &str,
    rates: &ExchangeRates,
    limit: usize,
) -> Vec<PricedOffer> {
    let mut seen = HashSet::new();

    let mut ranked: Vec<PricedOffer> = offers
        .into_iter()
        .filter(|offer| seen.insert(offer.registrar_id))
        .map(|offer| PricedOffer {
            register_url: offer.register_url(domain),
            normalized_price: rates.to_base(offer.price, &offer.currency),
            offer,
        })
        .collect();

    ranked.sort_by(|a, b| compare_normalized(a.normalized_price, b.normalized_price));
    ranked.truncate(limit);
    ranked
}

fn compare_normalized(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
