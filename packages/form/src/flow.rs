//! State machine behind the "Add Restaurant" modal.
//!
//! ```text
//! Closed --map click--> Open(position) --submit--> Submitting
//! Submitting --created--> Closed      (form reset, selection dropped)
//! Submitting --failed/declined--> Open(position)
//! Open | Submitting --cancel--> Closed (selection dropped)
//! ```
//!
//! The submission itself runs elsewhere; the owner of the flow reports the
//! result back through [`CreateFlow::complete_created`],
//! [`CreateFlow::complete_declined`] or [`CreateFlow::complete_failed`].
//! Cancelling while a submission is in flight only closes the modal: the
//! submit stays disabled until the in-flight request completes.

use restaurant_map_restaurant_models::{Coordinate, CreateRestaurant};
use thiserror::Error;

use crate::validation::{self, FieldError, FormField, RestaurantForm};

/// Externally visible phase of the create flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreatePhase {
    /// The modal is closed.
    Closed,
    /// The modal is open for `position`, waiting for input.
    Open {
        /// Map position the restaurant will be created at.
        position: Coordinate,
    },
    /// The modal is open and a create request is in flight.
    Submitting {
        /// Map position the restaurant will be created at.
        position: Coordinate,
    },
}

/// Status of the most recent create request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    /// No request sent yet in this flow.
    #[default]
    Idle,
    /// A request is in flight; submitting is disabled.
    Pending,
    /// The last request created a restaurant.
    Succeeded,
    /// The service declined the last request (`success: false`).
    Declined {
        /// Message from the service.
        message: String,
    },
    /// The last request failed.
    Failed {
        /// Error description.
        message: String,
    },
}

/// Why a submit was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateFlowError {
    /// The modal is not open.
    #[error("the create form is not open")]
    NotOpen,

    /// A create request is already in flight.
    #[error("a restaurant is already being submitted")]
    AlreadySubmitting,

    /// One or more fields are invalid.
    #[error("{} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

/// The create-restaurant modal.
#[derive(Debug, Clone, Default)]
pub struct CreateFlow {
    modal_open: bool,
    selection: Option<Coordinate>,
    form: RestaurantForm,
    errors: Vec<FieldError>,
    mutation: MutationState,
}

impl CreateFlow {
    /// Creates a closed flow with an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CreatePhase {
        match (self.modal_open, self.selection) {
            (true, Some(position)) if self.mutation == MutationState::Pending => {
                CreatePhase::Submitting { position }
            }
            (true, Some(position)) => CreatePhase::Open { position },
            _ => CreatePhase::Closed,
        }
    }

    /// Whether the modal is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.phase(), CreatePhase::Closed)
    }

    /// The map position captured by the last click, while the modal is open.
    #[must_use]
    pub const fn selection(&self) -> Option<Coordinate> {
        self.selection
    }

    /// Raw form values.
    #[must_use]
    pub const fn form(&self) -> &RestaurantForm {
        &self.form
    }

    /// Current field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Error message for `field`, if any.
    #[must_use]
    pub fn error_for(&self, field: FormField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    /// Status of the most recent create request.
    #[must_use]
    pub const fn mutation(&self) -> &MutationState {
        &self.mutation
    }

    /// Whether a create request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.mutation == MutationState::Pending
    }

    /// Whether the submit control is enabled: the modal is open, no request
    /// is in flight, and every field is valid.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.phase(), CreatePhase::Open { .. }) && validation::validate(&self.form).is_ok()
    }

    /// Opens the modal for a map click at `position`.
    pub fn open_at(&mut self, position: Coordinate) {
        log::debug!("Opening create form at {position}");
        self.selection = Some(position);
        self.modal_open = true;
    }

    /// Updates one field and re-validates it.
    pub fn edit(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value.into());
        self.errors.retain(|e| e.field != field);
        if let Some(error) = validation::validate_field(&self.form, field) {
            self.errors.push(error);
            self.errors.sort_by_key(|e| {
                FormField::ALL
                    .iter()
                    .position(|f| *f == e.field)
                    .unwrap_or(usize::MAX)
            });
        }
    }

    /// Validates the form and, if valid, moves to `Submitting`.
    ///
    /// Returns the payload to send, with the coordinates taken from the
    /// captured map position.
    ///
    /// # Errors
    ///
    /// Returns [`CreateFlowError`] if the modal is closed, a request is
    /// already in flight, or the form is invalid. An invalid form records
    /// its field errors and stays open.
    pub fn submit(&mut self) -> Result<CreateRestaurant, CreateFlowError> {
        let position = match self.phase() {
            CreatePhase::Closed => return Err(CreateFlowError::NotOpen),
            CreatePhase::Submitting { .. } => return Err(CreateFlowError::AlreadySubmitting),
            CreatePhase::Open { position } => position,
        };

        match validation::validate(&self.form) {
            Ok(valid) => {
                self.errors.clear();
                self.mutation = MutationState::Pending;
                Ok(valid.into_payload(position))
            }
            Err(errors) => {
                self.errors.clone_from(&errors);
                Err(CreateFlowError::Invalid(errors))
            }
        }
    }

    /// The create request succeeded: close the modal, drop the selection
    /// and reset the form.
    pub fn complete_created(&mut self) {
        self.mutation = MutationState::Succeeded;
        self.modal_open = false;
        self.selection = None;
        self.form = RestaurantForm::default();
        self.errors.clear();
    }

    /// The service declined the request. The modal keeps its state.
    pub fn complete_declined(&mut self, message: impl Into<String>) {
        self.mutation = MutationState::Declined {
            message: message.into(),
        };
    }

    /// The request failed. The modal keeps its state so the user can retry.
    pub fn complete_failed(&mut self, message: impl Into<String>) {
        self.mutation = MutationState::Failed {
            message: message.into(),
        };
    }

    /// Closes the modal and drops the captured position.
    ///
    /// Form values and field errors are kept.
    pub fn cancel(&mut self) {
        self.modal_open = false;
        self.selection = None;
    }
}
