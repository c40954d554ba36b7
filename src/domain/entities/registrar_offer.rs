//! Registrar pricing offers for a zone.

/// Placeholder substituted with the candidate domain in affiliate URL templates.
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// An active registrar price for one zone, as stored by the pricing repository.
///
/// Prices are expressed in `currency`; comparisons across offers must go
/// through [`crate::domain::offers::ExchangeRates`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrarOffer {
    pub registrar_id: i64,
    pub name: String,
    pub website: Option<String>,
    pub affiliate_url_template: Option<String>,
    pub logo: Option<String>,
    pub price: f64,
    pub renewal_price: Option<f64>,
    pub transfer_price: Option<f64>,
    pub currency: String,
}

impl RegistrarOffer {
    /// Builds the registration link for `domain`.
    ///
    /// Substitutes [`DOMAIN_PLACEHOLDER`] in the affiliate template. Falls back to
    /// the registrar website when no template is configured.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // template "https://reg.example/buy?d={domain}"
    /// assert_eq!(
    ///     offer.register_url("foo.io").as_deref(),
    ///     Some("https://reg.example/buy?d=foo.io")
    /// );
    /// ```
    pub fn register_url(&self, domain: &str) -> Option<String> {
        match self.affiliate_url_template.as_deref() {
            Some(template) if !template.is_empty() => {
                Some(template.replace(DOMAIN_PLACEHOLDER, domain))
            }
            _ => self.website.clone(),
        }
    }
}

/// A registrar offer projected for a specific candidate domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOffer {
    pub offer: RegistrarOffer,
    pub register_url: Option<String>,
    /// `offer.price` converted into the base currency; `None` when the
    /// currency has no known rate.
    pub normalized_price: Option<f64>,
}
