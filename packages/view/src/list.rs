//! Sidebar list: live search filter, entries and selection.

use chrono::Local;
use restaurant_map_restaurant_models::{BadgeColor, Coordinate, Restaurant};

/// Headline shown when the filtered list is empty.
pub const EMPTY_HEADLINE: &str = "No restaurants yet";

/// Hint shown under [`EMPTY_HEADLINE`].
pub const EMPTY_HINT: &str = "Click on the map to add your first restaurant";

/// Date format used for the creation date of each entry, in local time.
const CREATED_DATE_FORMAT: &str = "%d/%m/%Y";

/// Returns the restaurants whose name or category contains `query`,
/// ignoring case. An empty query matches everything.
#[must_use]
pub fn filter_restaurants<'a>(restaurants: &'a [Restaurant], query: &str) -> Vec<&'a Restaurant> {
    let needle = query.to_lowercase();
    restaurants
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle) || r.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// One row of the sidebar list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// Restaurant id.
    pub id: String,
    /// Restaurant name.
    pub name: String,
    /// Rating.
    pub rating: f64,
    /// Description, omitted when empty.
    pub description: Option<String>,
    /// Category label.
    pub category: String,
    /// Category badge color.
    pub badge: BadgeColor,
    /// Creation date as `dd/MM/yyyy` in the viewer's time zone.
    pub created_on: String,
    /// Whether this is the selected restaurant.
    pub selected: bool,
}

/// The rendered sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    /// Entries matching the current query, in store order.
    pub entries: Vec<ListEntry>,
    /// Number of restaurants in the store, ignoring the query.
    pub total: usize,
}

impl ListView {
    /// Whether the empty state should be shown instead of entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Search query and selection state of the sidebar.
#[derive(Debug, Clone, Default)]
pub struct RestaurantList {
    query: String,
    selected: Option<String>,
}

impl RestaurantList {
    /// Creates a list with an empty query and no selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the search query. The store is not touched.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Id of the selected restaurant.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Marks `restaurant` as selected and returns where the map should
    /// recenter.
    pub fn select(&mut self, restaurant: &Restaurant) -> Coordinate {
        self.selected = Some(restaurant.id.clone());
        restaurant.coordinate()
    }

    /// Builds the sidebar from a store snapshot.
    #[must_use]
    pub fn view(&self, restaurants: &[Restaurant]) -> ListView {
        let entries = filter_restaurants(restaurants, &self.query)
            .into_iter()
            .map(|r| ListEntry {
                id: r.id.clone(),
                name: r.name.clone(),
                rating: r.rating,
                description: r.description().map(String::from),
                category: r.category.clone(),
                badge: r.badge_color(),
                created_on: r
                    .created_at
                    .with_timezone(&Local)
                    .format(CREATED_DATE_FORMAT)
                    .to_string(),
                selected: self.selected.as_deref() == Some(r.id.as_str()),
            })
            .collect();

        ListView {
            entries,
            total: restaurants.len(),
        }
    }
}
