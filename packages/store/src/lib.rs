#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client-side restaurant cache.
//!
//! [`RestaurantStore`] is the single source of truth for the restaurants
//! shown on the map and in the list. It is created once per session and
//! passed to whatever needs it, so tests can build one around a fake
//! [`RestaurantApi`].
//!
//! Two operations mutate it:
//!
//! - [`RestaurantStore::load`] replaces the cached set with the service's
//!   current list.
//! - [`RestaurantStore::create`] appends the record returned by the
//!   service *and* marks the cache stale. The next
//!   [`RestaurantStore::refresh_if_stale`] re-fetches the whole list. A
//!   load that was already in flight when the create landed may briefly
//!   replace the set with a list that predates the create; the cache then
//!   stays stale until a later fetch reconciles it.
//!
//! The internal lock is never held across an `.await`, so each mutation
//! is applied atomically.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use restaurant_map_api::{ApiError, RestaurantApi};
use restaurant_map_restaurant_models::{CreateRestaurant, Restaurant};
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Fetching the restaurant list failed.
    #[error("failed to load restaurants: {0}")]
    Load(#[source] ApiError),

    /// Creating a restaurant failed.
    #[error("failed to create restaurant: {0}")]
    Create(#[source] ApiError),

    /// The service accepted a create but did not return the record.
    #[error("service accepted the create but returned no restaurant")]
    MissingRecord,
}

/// Result of a create call that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The service created the restaurant; it has been appended locally.
    Created {
        /// Authoritative record with server-assigned id and timestamp.
        restaurant: Restaurant,
        /// Message from the service.
        message: String,
    },
    /// The service answered `success: false`; nothing was applied.
    Declined {
        /// Message from the service.
        message: String,
    },
}

/// Point-in-time view of the store's load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatus {
    /// No data yet and a fetch is in flight.
    pub is_loading: bool,
    /// A fetch is in flight (initial or refresh).
    pub is_fetching: bool,
    /// The cached set is missing or was invalidated since it was fetched.
    pub is_stale: bool,
    /// Error from the most recent failed fetch, cleared by a successful one.
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    data: Option<Vec<Restaurant>>,
    /// Bumped by every invalidation.
    generation: u64,
    /// Generation the cached data was fetched at.
    loaded_generation: Option<u64>,
    /// Sequence number handed to the next fetch.
    next_request: u64,
    /// Sequence number of the fetch whose result is currently applied.
    applied_request: Option<u64>,
    /// Generation of the most recently started fetch.
    latest_request_generation: Option<u64>,
    in_flight: usize,
    last_error: Option<String>,
}

impl StoreState {
    fn is_stale(&self) -> bool {
        self.data.is_none() || self.loaded_generation != Some(self.generation)
    }
}

/// Cache of the restaurants known to the client.
pub struct RestaurantStore {
    api: Arc<dyn RestaurantApi>,
    state: Mutex<StoreState>,
}

impl std::fmt::Debug for RestaurantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestaurantStore")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl RestaurantStore {
    /// Creates an empty store backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn RestaurantApi>) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the cached restaurants (empty before the first
    /// successful load).
    #[must_use]
    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.lock().data.clone().unwrap_or_default()
    }

    /// Number of cached restaurants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().data.as_ref().map_or(0, Vec::len)
    }

    /// Whether the cache holds no restaurants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a load has ever succeeded.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.lock().data.is_some()
    }

    /// Current load state.
    #[must_use]
    pub fn status(&self) -> StoreStatus {
        let state = self.lock();
        StoreStatus {
            is_loading: state.data.is_none() && state.in_flight > 0,
            is_fetching: state.in_flight > 0,
            is_stale: state.is_stale(),
            last_error: state.last_error.clone(),
        }
    }

    /// Fetches the full list and replaces the cached set.
    ///
    /// On failure the cached set is left as it was. There is no retry.
    /// If several loads overlap, the result of the most recently started
    /// one wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Load`] if the service call fails.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let (request, started_generation) = {
            let mut state = self.lock();
            let request = state.next_request;
            state.next_request += 1;
            state.in_flight += 1;
            state.latest_request_generation = Some(state.generation);
            (request, state.generation)
        };

        log::debug!("Loading restaurants (request {request}, generation {started_generation})");
        let result = self.api.fetch_restaurants().await;

        let mut state = self.lock();
        state.in_flight -= 1;

        match result {
            Ok(restaurants) => {
                let count = restaurants.len();
                if state.applied_request.is_some_and(|applied| applied > request) {
                    log::debug!("Discarding restaurants from superseded request {request}");
                    return Ok(count);
                }
                state.data = Some(restaurants);
                state.applied_request = Some(request);
                state.loaded_generation = Some(started_generation);
                state.last_error = None;
                drop(state);
                log::info!("Loaded {count} restaurants");
                Ok(count)
            }
            Err(e) => {
                log::warn!("Failed to load restaurants: {e}");
                if state.applied_request.is_some_and(|applied| applied > request) {
                    log::debug!("Not recording error from superseded request {request}");
                } else {
                    state.last_error = Some(e.to_string());
                }
                Err(StoreError::Load(e))
            }
        }
    }

    /// Re-fetches the list if the cache is stale.
    ///
    /// Skips the fetch when one started at the current generation is
    /// already in flight. Returns whether a fetch was performed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Load`] if the re-fetch fails.
    pub async fn refresh_if_stale(&self) -> Result<bool, StoreError> {
        {
            let state = self.lock();
            if !state.is_stale() {
                return Ok(false);
            }
            if state.in_flight > 0 && state.latest_request_generation == Some(state.generation) {
                log::debug!("Refresh already in flight");
                return Ok(false);
            }
        }
        self.load().await?;
        Ok(true)
    }

    /// Marks the cached set stale so the next refresh re-fetches it.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.generation += 1;
    }

    /// Submits `input` to the service.
    ///
    /// When the service accepts it, the returned record is appended to the
    /// cached set immediately and the cache is invalidated. A declined
    /// create (`success: false`) or a failed call leaves the set untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Create`] if the service call fails and
    /// [`StoreError::MissingRecord`] if an accepted create carries no record.
    pub async fn create(&self, input: &CreateRestaurant) -> Result<CreateOutcome, StoreError> {
        let response = self.api.create_restaurant(input).await.map_err(|e| {
            log::warn!("Failed to create restaurant {:?}: {e}", input.name);
            StoreError::Create(e)
        })?;

        if !response.success {
            log::info!(
                "Service declined restaurant {:?}: {}",
                input.name,
                response.message
            );
            return Ok(CreateOutcome::Declined {
                message: response.message,
            });
        }

        let restaurant = response.data.ok_or(StoreError::MissingRecord)?;

        {
            let mut state = self.lock();
            state
                .data
                .get_or_insert_with(Vec::new)
                .push(restaurant.clone());
            state.generation += 1;
        }

        log::info!("Created restaurant {} ({})", restaurant.name, restaurant.id);
        Ok(CreateOutcome::Created {
            restaurant,
            message: response.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use restaurant_map_restaurant_models::CreateRestaurantResponse;
    use tokio::sync::Notify;

    use super::*;

    fn restaurant(name: &str, category: &str, rating: f64) -> Restaurant {
        Restaurant {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            rating,
            latitude: 40.7,
            longitude: -74.0,
            created_at: chrono::Utc::now(),
        }
    }

    #[derive(Default)]
    struct FakeApi {
        server: Mutex<Vec<Restaurant>>,
        fail_fetch: AtomicBool,
        fail_create: AtomicBool,
        decline_create: AtomicBool,
        fetches: AtomicUsize,
        creates: AtomicUsize,
        fetch_gate: Option<Arc<Notify>>,
        scripted_fetches: Mutex<VecDeque<ScriptedFetch>>,
    }

    /// A fetch that waits on its own gate and then returns a fixed answer.
    /// `None` answers with a server error.
    struct ScriptedFetch {
        gate: Arc<Notify>,
        answer: Option<Vec<Restaurant>>,
    }

    impl FakeApi {
        fn with(restaurants: Vec<Restaurant>) -> Self {
            Self {
                server: Mutex::new(restaurants),
                ..Self::default()
            }
        }

        /// Queues a gated fetch and returns its gate.
        fn script(&self, answer: Option<Vec<Restaurant>>) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.scripted_fetches.lock().unwrap().push_back(ScriptedFetch {
                gate: gate.clone(),
                answer,
            });
            gate
        }

        async fn wait_for_fetches(&self, count: usize) {
            while self.fetches.load(Ordering::SeqCst) < count {
                tokio::task::yield_now().await;
            }
        }
    }

    fn names(store: &RestaurantStore) -> Vec<String> {
        store.restaurants().into_iter().map(|r| r.name).collect()
    }

    #[async_trait]
    impl RestaurantApi for FakeApi {
        async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
            let scripted = self.scripted_fetches.lock().unwrap().pop_front();
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(ScriptedFetch { gate, answer }) = scripted {
                gate.notified().await;
                return answer.ok_or_else(|| ApiError::Status {
                    status: 500,
                    url: "/restaurants".to_string(),
                });
            }
            let snapshot = self.server.lock().unwrap().clone();
            if let Some(gate) = &self.fetch_gate {
                gate.notified().await;
            }
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    url: "/restaurants".to_string(),
                });
            }
            Ok(snapshot)
        }

        async fn create_restaurant(
            &self,
            input: &CreateRestaurant,
        ) -> Result<CreateRestaurantResponse, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 422,
                    url: "/restaurants".to_string(),
                });
            }
            if self.decline_create.load(Ordering::SeqCst) {
                return Ok(CreateRestaurantResponse {
                    data: None,
                    success: false,
                    message: "Declined".to_string(),
                });
            }
            let created = Restaurant {
                id: uuid::Uuid::new_v4().to_string(),
                name: input.name.clone(),
                description: Some(input.description.clone()),
                category: input.category.clone(),
                rating: input.rating,
                latitude: input.latitude,
                longitude: input.longitude,
                created_at: chrono::Utc::now(),
            };
            self.server.lock().unwrap().push(created.clone());
            Ok(CreateRestaurantResponse {
                data: Some(created),
                success: true,
                message: "Restaurant created".to_string(),
            })
        }
    }

    fn new_spot() -> CreateRestaurant {
        CreateRestaurant {
            name: "New Spot".to_string(),
            latitude: 40.0,
            longitude: -73.9,
            category: "american".to_string(),
            rating: 5.0,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn load_replaces_cached_set() {
        let api = Arc::new(FakeApi::with(vec![
            restaurant("Pasta Place", "italian", 4.5),
            restaurant("Taco Town", "mexican", 3.8),
        ]));
        let store = RestaurantStore::new(api);

        assert!(store.status().is_stale);
        assert_eq!(store.load().await.unwrap(), 2);
        assert_eq!(store.len(), 2);

        let status = store.status();
        assert!(!status.is_stale);
        assert!(!status.is_loading);
        assert_eq!(status.last_error, None);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_set() {
        let api = Arc::new(FakeApi::with(vec![restaurant("Pasta Place", "italian", 4.5)]));
        let store = RestaurantStore::new(api.clone());
        store.load().await.unwrap();

        api.fail_fetch.store(true, Ordering::SeqCst);
        assert!(matches!(store.load().await, Err(StoreError::Load(_))));
        assert_eq!(store.len(), 1);
        assert!(store.status().last_error.is_some());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_initial_load_leaves_store_empty() {
        let api = Arc::new(FakeApi::default());
        api.fail_fetch.store(true, Ordering::SeqCst);
        let store = RestaurantStore::new(api.clone());

        assert!(store.load().await.is_err());
        assert!(store.is_empty());
        assert!(!store.has_data());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_appends_server_record_and_invalidates() {
        let api = Arc::new(FakeApi::with(vec![restaurant("Pasta Place", "italian", 4.5)]));
        let store = RestaurantStore::new(api.clone());
        store.load().await.unwrap();
        let before = store.restaurants();

        let outcome = store.create(&new_spot()).await.unwrap();
        let CreateOutcome::Created { restaurant, message } = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert_eq!(message, "Restaurant created");
        assert!(!restaurant.id.is_empty());
        assert!((restaurant.latitude - 40.0).abs() < f64::EPSILON);
        assert!((restaurant.longitude - -73.9).abs() < f64::EPSILON);

        let after = store.restaurants();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last(), Some(&restaurant));

        // Appended without a re-fetch, but marked stale.
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
        assert!(store.status().is_stale);

        assert!(store.refresh_if_stale().await.unwrap());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(store.len(), 2);
        assert!(!store.status().is_stale);
        assert!(!store.refresh_if_stale().await.unwrap());
    }

    #[tokio::test]
    async fn create_before_any_load_starts_from_empty() {
        let api = Arc::new(FakeApi::default());
        let store = RestaurantStore::new(api);

        store.create(&new_spot()).await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.has_data());
    }

    #[tokio::test]
    async fn failed_create_leaves_set_unchanged() {
        let api = Arc::new(FakeApi::with(vec![restaurant("Pasta Place", "italian", 4.5)]));
        let store = RestaurantStore::new(api.clone());
        store.load().await.unwrap();
        let before = store.restaurants();

        api.fail_create.store(true, Ordering::SeqCst);
        assert!(matches!(
            store.create(&new_spot()).await,
            Err(StoreError::Create(_))
        ));
        assert_eq!(store.restaurants(), before);
        assert!(!store.status().is_stale);
    }

    #[tokio::test]
    async fn declined_create_leaves_set_unchanged() {
        let api = Arc::new(FakeApi::with(vec![restaurant("Pasta Place", "italian", 4.5)]));
        let store = RestaurantStore::new(api.clone());
        store.load().await.unwrap();

        api.decline_create.store(true, Ordering::SeqCst);
        let outcome = store.create(&new_spot()).await.unwrap();
        assert_eq!(
            outcome,
            CreateOutcome::Declined {
                message: "Declined".to_string()
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn in_flight_load_racing_a_create_is_reconciled_by_refresh() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            fetch_gate: Some(gate.clone()),
            ..FakeApi::with(vec![restaurant("Pasta Place", "italian", 4.5)])
        });
        let store = Arc::new(RestaurantStore::new(api.clone()));

        // Start a load that snapshots the server before the create lands.
        let loading = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        while api.fetches.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(store.status().is_loading);

        store.create(&new_spot()).await.unwrap();
        assert_eq!(store.len(), 1);

        gate.notify_one();
        loading.await.unwrap().unwrap();

        // The old snapshot won the race; the cache knows it is stale.
        assert_eq!(store.len(), 1);
        assert!(store.status().is_stale);

        gate.notify_one();
        assert!(store.refresh_if_stale().await.unwrap());
        assert_eq!(names(&store), vec!["Pasta Place", "New Spot"]);
        assert!(!store.status().is_stale);
    }

    #[tokio::test]
    async fn invalidate_marks_loaded_set_stale() {
        let api = Arc::new(FakeApi::with(vec![]));
        let store = RestaurantStore::new(api.clone());
        store.load().await.unwrap();
        assert!(!store.status().is_stale);

        store.invalidate();
        assert!(store.status().is_stale);
        assert!(store.refresh_if_stale().await.unwrap());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn older_load_finishing_last_does_not_replace_newer_result() {
        let api = Arc::new(FakeApi::default());
        let first = api.script(Some(vec![restaurant("Pasta Place", "italian", 4.5)]));
        let second = api.script(Some(vec![
            restaurant("Pasta Place", "italian", 4.5),
            restaurant("Taco Town", "mexican", 3.8),
        ]));
        let store = Arc::new(RestaurantStore::new(api.clone()));

        let older = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        api.wait_for_fetches(1).await;
        let newer = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        api.wait_for_fetches(2).await;

        second.notify_one();
        assert_eq!(newer.await.unwrap().unwrap(), 2);
        first.notify_one();
        assert_eq!(older.await.unwrap().unwrap(), 1);

        assert_eq!(names(&store), vec!["Pasta Place", "Taco Town"]);
        assert!(!store.status().is_stale);
    }

    #[tokio::test]
    async fn older_load_failing_last_keeps_newer_result_clean() {
        let api = Arc::new(FakeApi::default());
        let first = api.script(None);
        let second = api.script(Some(vec![restaurant("Taco Town", "mexican", 3.8)]));
        let store = Arc::new(RestaurantStore::new(api.clone()));

        let older = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        api.wait_for_fetches(1).await;
        let newer = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        api.wait_for_fetches(2).await;

        second.notify_one();
        newer.await.unwrap().unwrap();
        first.notify_one();
        assert!(matches!(older.await.unwrap(), Err(StoreError::Load(_))));

        assert_eq!(names(&store), vec!["Taco Town"]);
        let status = store.status();
        assert_eq!(status.last_error, None);
        assert!(!status.is_fetching);
        assert!(!status.is_stale);
    }

    #[tokio::test]
    async fn refresh_while_current_load_in_flight_does_not_fetch_again() {
        let api = Arc::new(FakeApi::default());
        let gate = api.script(Some(vec![restaurant("Pasta Place", "italian", 4.5)]));
        let store = Arc::new(RestaurantStore::new(api.clone()));

        let loading = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        api.wait_for_fetches(1).await;
        assert!(store.status().is_stale);

        assert!(!store.refresh_if_stale().await.unwrap());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);

        gate.notify_one();
        loading.await.unwrap().unwrap();
        assert_eq!(names(&store), vec!["Pasta Place"]);
        assert!(!store.refresh_if_stale().await.unwrap());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
    }
}
