#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User location resolution for the restaurant map.
//!
//! The device position is requested once per session through a
//! [`LocationProvider`]. Any failure (permission denied, timeout, no
//! positioning available) falls back to [`DEFAULT_LOCATION`] without
//! retrying and without surfacing an error to the user.

use async_trait::async_trait;
use restaurant_map_restaurant_models::{Coordinate, DEFAULT_LOCATION};
use thiserror::Error;

/// Environment variable read by [`EnvLocationProvider`].
pub const LOCATION_ENV_VAR: &str = "RESTAURANT_MAP_LOCATION";

/// Reasons a position could not be obtained.
///
/// Callers treat every variant the same way ("unavailable"); the variants
/// only exist for logging.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The user or platform refused access to the position.
    #[error("location permission denied")]
    PermissionDenied,

    /// No positioning capability on this device.
    #[error("location unavailable: {message}")]
    Unavailable {
        /// Why no position is available.
        message: String,
    },

    /// A configured position could not be parsed.
    #[error("invalid location {value:?}: {message}")]
    Invalid {
        /// The raw configured value.
        value: String,
        /// Description of the problem.
        message: String,
    },
}

/// Port to the device geolocation capability.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Requests the current position once.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if no position can be obtained.
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Resolves the user location, falling back to [`DEFAULT_LOCATION`].
///
/// Called once at session start. Never fails.
pub async fn resolve_user_location(provider: &dyn LocationProvider) -> Coordinate {
    match provider.current_position().await {
        Ok(coordinate) if coordinate.is_valid() => {
            log::info!("User location resolved: {coordinate}");
            coordinate
        }
        Ok(coordinate) => {
            log::warn!("Ignoring out-of-range user location {coordinate}, using default");
            DEFAULT_LOCATION
        }
        Err(e) => {
            log::warn!("Error getting user location: {e}, using default {DEFAULT_LOCATION}");
            DEFAULT_LOCATION
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider(pub Coordinate);

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A device without positioning. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocationProvider;

#[async_trait]
impl LocationProvider for UnavailableLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable {
            message: "no positioning capability".to_string(),
        })
    }
}

/// Reads the position from [`LOCATION_ENV_VAR`] as `"lat,lng"`.
///
/// Used by the terminal front end, which has no device geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocationProvider;

#[async_trait]
impl LocationProvider for EnvLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let raw = std::env::var(LOCATION_ENV_VAR).map_err(|_| LocationError::Unavailable {
            message: format!("{LOCATION_ENV_VAR} is not set"),
        })?;
        parse_coordinate(&raw)
    }
}

/// Parses a `"lat,lng"` pair.
///
/// # Errors
///
/// Returns [`LocationError::Invalid`] if the value is not two numbers
/// inside the WGS84 range.
pub fn parse_coordinate(raw: &str) -> Result<Coordinate, LocationError> {
    let invalid = |message: &str| LocationError::Invalid {
        value: raw.to_string(),
        message: message.to_string(),
    };

    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| invalid("expected \"lat,lng\""))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| invalid("latitude is not a number"))?;
    let longitude: f64 = lng
        .trim()
        .parse()
        .map_err(|_| invalid("longitude is not a number"))?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return Err(invalid("out of range"));
    }
    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeniedProvider;

    #[async_trait]
    impl LocationProvider for DeniedProvider {
        async fn current_position(&self) -> Result<Coordinate, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn uses_provider_position() {
        let here = Coordinate::new(51.5074, -0.1278);
        assert_eq!(
            resolve_user_location(&FixedLocationProvider(here)).await,
            here
        );
    }

    #[tokio::test]
    async fn falls_back_when_denied() {
        assert_eq!(resolve_user_location(&DeniedProvider).await, DEFAULT_LOCATION);
    }

    #[tokio::test]
    async fn falls_back_when_unavailable() {
        assert_eq!(
            resolve_user_location(&UnavailableLocationProvider).await,
            DEFAULT_LOCATION
        );
    }

    #[tokio::test]
    async fn falls_back_on_out_of_range_position() {
        let bogus = FixedLocationProvider(Coordinate::new(120.0, 0.0));
        assert_eq!(resolve_user_location(&bogus).await, DEFAULT_LOCATION);
    }

    #[test]
    fn parses_lat_lng_pair() {
        let c = parse_coordinate(" 40.0 , -73.9 ").unwrap();
        assert!((c.latitude - 40.0).abs() < f64::EPSILON);
        assert!((c.longitude - -73.9).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_coordinate("40.0").is_err());
        assert!(parse_coordinate("north,-73.9").is_err());
        assert!(parse_coordinate("40.0,-200").is_err());
    }
}
