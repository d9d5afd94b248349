//! The session controller.
//!
//! Start-up fires the location lookup and the initial load side by side;
//! neither waits for the other and the map renders correctly whichever
//! finishes first. A map click opens the create form; a successful create
//! writes through the store, refreshes it, closes the form and shows a
//! toast.

use std::future::Future;
use std::sync::Arc;

use restaurant_map_form::{CreateFlow, FormField};
use restaurant_map_location::{LocationProvider, resolve_user_location};
use restaurant_map_store::{CreateOutcome, RestaurantStore};
use restaurant_map_view::{ListView, MapSurface, MapView, RestaurantList};
use tokio::sync::mpsc;

use crate::event::{AppEvent, EventSender, Inbox};
use crate::notify::{Notifier, Toast};

/// Title of the toast shown after a successful create.
pub const SUCCESS_TITLE: &str = "Success";

/// One user's session with the restaurant map.
pub struct Session<S: MapSurface, N: Notifier> {
    store: Arc<RestaurantStore>,
    location: Arc<dyn LocationProvider>,
    map: MapView<S>,
    list: RestaurantList,
    flow: CreateFlow,
    notifier: N,
    location_resolved: bool,
    tx: mpsc::UnboundedSender<Inbox>,
    rx: mpsc::UnboundedReceiver<Inbox>,
    in_flight: usize,
}

impl<S: MapSurface, N: Notifier> Session<S, N> {
    /// Builds a session around an injected store, location provider, map
    /// surface and notifier. Nothing happens until [`Self::start`].
    pub fn new(
        store: Arc<RestaurantStore>,
        location: Arc<dyn LocationProvider>,
        surface: S,
        notifier: N,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            location,
            map: MapView::new(surface),
            list: RestaurantList::new(),
            flow: CreateFlow::new(),
            notifier,
            location_resolved: false,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Handle for posting input events from other tasks.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender::new(self.tx.clone())
    }

    /// Mounts the map and starts the location lookup and initial load.
    pub fn start(&mut self) {
        log::info!("Starting session");
        self.map.mount();
        self.map.render(&self.store.restaurants());

        let location = self.location.clone();
        self.spawn(async move {
            AppEvent::LocationResolved(resolve_user_location(location.as_ref()).await)
        });

        let store = self.store.clone();
        self.spawn(async move { AppEvent::RestaurantsLoaded(store.load().await) });
    }

    /// Handles one event.
    pub fn dispatch(&mut self, event: AppEvent) {
        log::trace!("Handling {event:?}");
        match event {
            AppEvent::LocationResolved(location) => {
                self.location_resolved = true;
                self.map.set_user_location(location);
            }
            AppEvent::RestaurantsLoaded(Err(e)) | AppEvent::RestaurantsRefreshed(Err(e)) => {
                log::debug!("Keeping previous restaurants: {e}");
                self.rerender();
            }
            AppEvent::RestaurantsLoaded(Ok(_)) | AppEvent::RestaurantsRefreshed(Ok(_)) => {
                self.rerender();
            }
            AppEvent::MapClicked(click) => {
                if let Some(position) = self.map.handle_click(&click) {
                    self.flow.open_at(position);
                }
            }
            AppEvent::SearchChanged(query) => self.list.set_query(query),
            AppEvent::RestaurantSelected(id) => self.select(&id),
            AppEvent::FormEdited(field, value) => self.flow.edit(field, value),
            AppEvent::SubmitRequested => self.submit(),
            AppEvent::CreateFinished(result) => self.finish_create(result),
            AppEvent::CancelRequested => self.flow.cancel(),
        }
    }

    /// Waits for the next event and handles it.
    ///
    /// Returns `false` if no more events can arrive.
    pub async fn next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.receive(message);
                true
            }
            None => false,
        }
    }

    /// Handles events until no spawned task is in flight and the inbox is
    /// empty.
    pub async fn settle(&mut self) {
        loop {
            while let Ok(message) = self.rx.try_recv() {
                self.receive(message);
            }
            if self.in_flight == 0 {
                return;
            }
            if !self.next().await {
                return;
            }
        }
    }

    /// The shared store.
    #[must_use]
    pub const fn store(&self) -> &Arc<RestaurantStore> {
        &self.store
    }

    /// The map view.
    #[must_use]
    pub const fn map(&self) -> &MapView<S> {
        &self.map
    }

    /// The create form.
    #[must_use]
    pub const fn flow(&self) -> &CreateFlow {
        &self.flow
    }

    /// The notifier.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        self.list.query()
    }

    /// Sidebar contents for the current store snapshot and query.
    #[must_use]
    pub fn list_view(&self) -> ListView {
        self.list.view(&self.store.restaurants())
    }

    /// Whether the full-screen spinner should show: the first load is still
    /// running and the user location is not known yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.status().is_loading && !self.location_resolved
    }

    /// Whether the location lookup has finished.
    #[must_use]
    pub const fn location_resolved(&self) -> bool {
        self.location_resolved
    }

    /// Number of spawned tasks that have not reported back yet.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Convenience for [`AppEvent::FormEdited`].
    pub fn edit(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(AppEvent::FormEdited(field, value.into()));
    }

    fn receive(&mut self, message: Inbox) {
        let event = match message {
            Inbox::Completed(event) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                event
            }
            Inbox::Input(event) => event,
        };
        self.dispatch(event);
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            if tx.send(Inbox::Completed(event)).is_err() {
                log::debug!("Session closed before task completed");
            }
        });
    }

    fn rerender(&mut self) {
        self.map.render(&self.store.restaurants());
    }

    fn select(&mut self, id: &str) {
        let restaurants = self.store.restaurants();
        let Some(restaurant) = restaurants.iter().find(|r| r.id == id) else {
            log::warn!("Selected unknown restaurant {id}");
            return;
        };
        let target = self.list.select(restaurant);
        self.map.recenter(target);
    }

    fn submit(&mut self) {
        match self.flow.submit() {
            Ok(payload) => {
                log::info!(
                    "Submitting restaurant {:?} at {}",
                    payload.name,
                    payload.coordinate()
                );
                let store = self.store.clone();
                self.spawn(async move { AppEvent::CreateFinished(store.create(&payload).await) });
            }
            Err(e) => log::debug!("Submit refused: {e}"),
        }
    }

    fn finish_create(&mut self, result: Result<CreateOutcome, restaurant_map_store::StoreError>) {
        match result {
            Ok(CreateOutcome::Created { restaurant, message }) => {
                log::debug!("Applying created restaurant {}", restaurant.id);
                self.rerender();

                let store = self.store.clone();
                self.spawn(
                    async move { AppEvent::RestaurantsRefreshed(store.refresh_if_stale().await) },
                );

                self.flow.complete_created();
                self.notifier.notify(Toast {
                    title: SUCCESS_TITLE.to_string(),
                    description: message,
                });
            }
            Ok(CreateOutcome::Declined { message }) => self.flow.complete_declined(message),
            Err(e) => self.flow.complete_failed(e.to_string()),
        }
    }
}
