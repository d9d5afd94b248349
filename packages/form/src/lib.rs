#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Create-restaurant form validation and modal state machine.
//!
//! [`validation`] is a pure schema check returning one
//! [`validation::FieldError`] per failing field. [`flow::CreateFlow`]
//! tracks the modal opened by a map click, live validation, the in-flight
//! submission and how the modal reacts when the submission completes.

pub mod flow;
pub mod validation;

pub use flow::{CreateFlow, CreateFlowError, CreatePhase, MutationState};
pub use validation::{FieldError, FormField, RestaurantForm, ValidRestaurant, validate};
