#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only projections of the restaurant store.
//!
//! - [`map`] turns the store into markers on a [`map::MapSurface`], handles
//!   clicks and recentering.
//! - [`list`] applies the live search query and builds the sidebar entries.
//!
//! Neither module mutates the store; they are recomputed from a snapshot
//! whenever it changes.

pub mod list;
pub mod map;

pub use list::{ListEntry, ListView, RestaurantList, filter_restaurants};
pub use map::{HeadlessSurface, MapClick, MapSurface, MapView, Marker, MarkerKind, Popup};
