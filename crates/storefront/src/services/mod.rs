//! External service clients for the storefront.
//!
//! # Services
//!
//! - [`klaviyo`] - Newsletter subscription management via the Klaviyo API

pub mod klaviyo;

pub use klaviyo::KlaviyoClient;
