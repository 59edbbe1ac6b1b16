//! URL handling module for Webpulse
//!
//! Target URLs may be given without a scheme ("github.com"). This module
//! supplies the scheme fallback used by the fetcher and the stricter check
//! used when validating configured targets.

mod normalize;

pub use normalize::{ensure_scheme, has_http_scheme, validate_target};
