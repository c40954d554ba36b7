//! Utility functions for query normalization and request metadata.
//!
//! - [`domain_normalizer`] - Query canonicalization and zone extraction
//! - [`client_meta`] - Client IP, User-Agent and language from request headers

pub mod client_meta;
pub mod domain_normalizer;
