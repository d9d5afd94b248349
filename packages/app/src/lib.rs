#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event-driven session for the restaurant map.
//!
//! A [`Session`] owns the view state (map, list, create form) and a handle
//! to the shared [`restaurant_map_store::RestaurantStore`]. Everything
//! that changes state arrives as an [`AppEvent`] and is handled one at a
//! time on the task that drives the session. Slow work (locating the
//! user, loading and creating restaurants) runs on spawned tokio tasks
//! that post their result back as another event, so the session never
//! blocks while a request is in flight.

pub mod event;
pub mod notify;
pub mod session;

pub use event::{AppEvent, EventSender};
pub use notify::{LogNotifier, Notifier, Toast};
pub use session::Session;
