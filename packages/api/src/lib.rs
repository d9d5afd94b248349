#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the remote restaurants REST service.
//!
//! The rest of the application talks to the service only through the
//! [`RestaurantApi`] trait, so the HTTP transport can be swapped for a
//! test double. [`http::HttpRestaurantApi`] is the production
//! implementation backed by `reqwest`.
//!
//! Requests are sent exactly once. There is no retry layer: a failed list
//! or create call is reported to the caller and the user retries by hand.

pub mod config;
pub mod http;

use async_trait::async_trait;
use restaurant_map_restaurant_models::{CreateRestaurant, CreateRestaurantResponse, Restaurant};
use thiserror::Error;

pub use config::ApiConfig;
pub use http::HttpRestaurantApi;

/// Errors from restaurant service calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code returned by the service.
        status: u16,
        /// Request URL.
        url: String,
    },

    /// Response body was not the expected JSON envelope.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Configuration was invalid.
    #[error("Config error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

/// Port to the remote restaurants service.
#[async_trait]
pub trait RestaurantApi: Send + Sync {
    /// Fetches every restaurant known to the service (`GET /restaurants`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or an
    /// unparseable body.
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;

    /// Creates a restaurant (`POST /restaurants`).
    ///
    /// A response with `success: false` is returned as `Ok`; it is up to
    /// the caller to decide what a declined create means.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or an
    /// unparseable body.
    async fn create_restaurant(
        &self,
        input: &CreateRestaurant,
    ) -> Result<CreateRestaurantResponse, ApiError>;
}
