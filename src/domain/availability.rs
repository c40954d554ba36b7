//! Availability states and the provider status classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical registration state of a domain.
///
/// Ordering follows result presentation: available first, unknown last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityState {
    Available,
    Taken,
    Unknown,
}

impl AvailabilityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Taken => "taken",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvailabilityState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "taken" => Ok(Self::Taken),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown availability state: {}", other)),
        }
    }
}

/// Status record for one domain as reported by the suggestion provider.
///
/// `status` is a space-separated token list, `summary` the provider's own
/// one-word verdict. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderStatus {
    pub status: Option<String>,
    pub summary: Option<String>,
}

impl ProviderStatus {
    pub fn new(status: Option<&str>, summary: Option<&str>) -> Self {
        Self {
            status: status.map(str::to_string),
            summary: summary.map(str::to_string),
        }
    }

    /// A record carrying no information, used when the provider call itself failed.
    pub fn inconclusive() -> Self {
        Self::default()
    }
}

const AVAILABLE_SUMMARIES: &[&str] = &["inactive", "available", "undelegated"];
const TAKEN_SUMMARIES: &[&str] = &["active", "parked", "claimed", "registered", "reserved"];
const AVAILABLE_TOKENS: &[&str] = &["undelegated", "inactive", "available"];
const TAKEN_TOKENS: &[&str] = &["active", "parked", "premium", "registered", "reserved"];

/// Maps a provider status record to an [`AvailabilityState`].
///
/// The summary is trusted first. Raw status tokens are only consulted when the
/// summary is missing, empty or `unknown`. Any other unrecognized summary
/// yields [`AvailabilityState::Unknown`]. Pure: the same record always yields
/// the same state.
///
/// # Examples
///
/// ```ignore
/// let record = ProviderStatus::new(None, Some("inactive"));
/// assert_eq!(classify(Some(&record)), AvailabilityState::Available);
/// assert_eq!(classify(None), AvailabilityState::Unknown);
/// ```
pub fn classify(record: Option<&ProviderStatus>) -> AvailabilityState {
    let Some(record) = record else {
        return AvailabilityState::Unknown;
    };

    let summary = record
        .summary
        .as_deref()
        .map(|s| s.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if AVAILABLE_SUMMARIES.contains(&summary.as_str()) {
        return AvailabilityState::Available;
    }
    if TAKEN_SUMMARIES.contains(&summary.as_str()) {
        return AvailabilityState::Taken;
    }
    if !summary.is_empty() && summary != "unknown" {
        return AvailabilityState::Unknown;
    }

    let tokens: Vec<String> = record
        .status
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();

    if tokens.iter().any(|t| AVAILABLE_TOKENS.contains(&t.as_str())) {
        AvailabilityState::Available
    } else if tokens.iter().any(|t| TAKEN_TOKENS.contains(&t.as_str())) {
        AvailabilityState::Taken
    } else {
        AvailabilityState::Unknown
    }
}
