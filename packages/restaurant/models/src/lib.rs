#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Restaurant, coordinate and wire envelope types for the restaurant map.
//!
//! These types mirror the JSON contract of the remote restaurants service
//! (`GET /restaurants`, `POST /restaurants`) and are shared by the store,
//! the create form and the map/list views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Fallback map center used when the device location is unavailable
/// (New York City).
pub const DEFAULT_LOCATION: Coordinate = Coordinate {
    latitude: 40.7128,
    longitude: -74.006,
};

/// Zoom level the map starts at, centered on the user location.
pub const INITIAL_ZOOM: u8 = 13;

/// Zoom level used when a restaurant is selected from the list.
pub const SELECTED_ZOOM: u8 = 15;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// A restaurant as stored by the remote service.
///
/// `id` and `created_at` are assigned by the service and never change on
/// the client. The coordinates are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Opaque identifier assigned by the service. Numeric ids are kept as
    /// their decimal text.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description. The service may send an empty string.
    #[serde(default)]
    pub description: Option<String>,
    /// Category label (e.g. `"italian"`).
    pub category: String,
    /// Rating between 1 and 5, fractional values allowed.
    pub rating: f64,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// When the service created the record.
    pub created_at: DateTime<Utc>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Signed(id) => id.to_string(),
        RawId::Unsigned(id) => id.to_string(),
    })
}

impl Restaurant {
    /// Returns the restaurant position as a [`Coordinate`].
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Returns the description if it is present and non-empty.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Badge color for this restaurant's category.
    #[must_use]
    pub fn badge_color(&self) -> BadgeColor {
        BadgeColor::for_category(&self.category)
    }
}

/// Payload for `POST /restaurants`.
///
/// The coordinates always come from the map click that opened the create
/// form, never from user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRestaurant {
    /// Display name.
    pub name: String,
    /// Latitude of the picked map position.
    pub latitude: f64,
    /// Longitude of the picked map position.
    pub longitude: f64,
    /// Category label.
    pub category: String,
    /// Rating between 1 and 5.
    pub rating: f64,
    /// Description, empty when the user left it blank.
    pub description: String,
}

impl CreateRestaurant {
    /// Returns the picked position as a [`Coordinate`].
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Envelope returned by `GET /restaurants`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRestaurantsResponse {
    /// Every restaurant known to the service.
    pub data: Vec<Restaurant>,
}

/// Envelope returned by `POST /restaurants`.
///
/// `success: false` means the service declined the create; `data` is then
/// not applied to the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRestaurantResponse {
    /// The authoritative record, including server-assigned fields.
    pub data: Option<Restaurant>,
    /// Whether the service accepted the create.
    pub success: bool,
    /// Human-readable status message, shown in the success toast.
    #[serde(default)]
    pub message: String,
}

/// Cuisine categories that have a dedicated badge color.
///
/// Parsing is case-insensitive. Any other label falls back to
/// [`BadgeColor::Gray`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Cuisine {
    /// Italian
    Italian,
    /// Chinese
    Chinese,
    /// Mexican
    Mexican,
    /// Indian
    Indian,
    /// Japanese
    Japanese,
    /// American
    American,
    /// French
    French,
}

impl Cuisine {
    /// Returns the badge color for this cuisine.
    #[must_use]
    pub const fn badge_color(self) -> BadgeColor {
        match self {
            Self::Italian => BadgeColor::Red,
            Self::Chinese => BadgeColor::Yellow,
            Self::Mexican => BadgeColor::Orange,
            Self::Indian => BadgeColor::Purple,
            Self::Japanese => BadgeColor::Pink,
            Self::American => BadgeColor::Blue,
            Self::French => BadgeColor::Indigo,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Italian,
            Self::Chinese,
            Self::Mexican,
            Self::Indian,
            Self::Japanese,
            Self::American,
            Self::French,
        ]
    }
}

/// Color of a category badge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BadgeColor {
    /// Red
    Red,
    /// Yellow
    Yellow,
    /// Orange
    Orange,
    /// Purple
    Purple,
    /// Pink
    Pink,
    /// Blue
    Blue,
    /// Indigo
    Indigo,
    /// Gray, used for unrecognized categories.
    Gray,
}

impl BadgeColor {
    /// Maps a free-text category label to its badge color.
    ///
    /// The lookup is case-insensitive; unknown labels get [`Self::Gray`].
    #[must_use]
    pub fn for_category(category: &str) -> Self {
        category
            .trim()
            .parse::<Cuisine>()
            .map_or(Self::Gray, Cuisine::badge_color)
    }
}
