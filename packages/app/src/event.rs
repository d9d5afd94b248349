//! Events handled by a [`crate::Session`].

use restaurant_map_form::FormField;
use restaurant_map_restaurant_models::Coordinate;
use restaurant_map_store::{CreateOutcome, StoreError};
use restaurant_map_view::MapClick;
use tokio::sync::mpsc;

/// Something that happened: user input or a finished background task.
#[derive(Debug)]
pub enum AppEvent {
    /// The one-shot location lookup finished (already defaulted on failure).
    LocationResolved(Coordinate),
    /// The initial load finished.
    RestaurantsLoaded(Result<usize, StoreError>),
    /// A refresh after invalidation finished; `Ok(false)` if none was needed.
    RestaurantsRefreshed(Result<bool, StoreError>),
    /// The map received a click.
    MapClicked(MapClick),
    /// The search box changed.
    SearchChanged(String),
    /// A restaurant was picked from the list.
    RestaurantSelected(String),
    /// A create form field changed.
    FormEdited(FormField, String),
    /// The create form was submitted.
    SubmitRequested,
    /// A create request finished.
    CreateFinished(Result<CreateOutcome, StoreError>),
    /// The create modal was dismissed.
    CancelRequested,
}

/// Message on the session's inbox.
#[derive(Debug)]
pub(crate) enum Inbox {
    /// Result of a task spawned by the session.
    Completed(AppEvent),
    /// Input from outside the session.
    Input(AppEvent),
}

/// Handle for posting input events to a session from other tasks.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<Inbox>,
}

impl EventSender {
    pub(crate) const fn new(tx: mpsc::UnboundedSender<Inbox>) -> Self {
        Self { tx }
    }

    /// Posts `event`. Returns `false` if the session is gone.
    pub fn send(&self, event: AppEvent) -> bool {
        self.tx.send(Inbox::Input(event)).is_ok()
    }
}
