//! Map view: markers, popups, clicks and recentering.
//!
//! The tiling/rendering engine sits behind [`MapSurface`]. [`MapView`]
//! decides what goes on it: one marker for the user and one per
//! restaurant. Every restaurant in the store is drawn; the search query
//! only filters the list.

use restaurant_map_restaurant_models::{
    BadgeColor, Coordinate, DEFAULT_LOCATION, INITIAL_ZOOM, Restaurant, SELECTED_ZOOM,
};

/// Text of the user marker popup.
pub const USER_POPUP_TEXT: &str = "You are here";

/// Port to the map rendering engine.
pub trait MapSurface {
    /// Moves the viewport to `center` at `zoom`.
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    /// Replaces every marker on the map.
    fn render_markers(&mut self, markers: &[Marker]);
}

/// What a marker stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// The viewer's location.
    User,
    /// A restaurant, by id.
    Restaurant(String),
}

/// Content of a marker's detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    /// Popup of the user marker.
    User {
        /// Popup text.
        text: &'static str,
    },
    /// Popup of a restaurant marker.
    Restaurant {
        /// Restaurant name.
        name: String,
        /// Description, omitted when empty.
        description: Option<String>,
        /// Category label.
        category: String,
        /// Category badge color.
        badge: BadgeColor,
        /// Rating.
        rating: f64,
    },
}

/// A marker to draw on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker position.
    pub position: Coordinate,
    /// What the marker stands for.
    pub kind: MarkerKind,
    /// Detail overlay content.
    pub popup: Popup,
}

impl Marker {
    /// The marker for the viewer's location.
    #[must_use]
    pub const fn user(position: Coordinate) -> Self {
        Self {
            position,
            kind: MarkerKind::User,
            popup: Popup::User {
                text: USER_POPUP_TEXT,
            },
        }
    }

    /// The marker for `restaurant`.
    #[must_use]
    pub fn restaurant(restaurant: &Restaurant) -> Self {
        Self {
            position: restaurant.coordinate(),
            kind: MarkerKind::Restaurant(restaurant.id.clone()),
            popup: Popup::Restaurant {
                name: restaurant.name.clone(),
                description: restaurant.description().map(String::from),
                category: restaurant.category.clone(),
                badge: restaurant.badge_color(),
                rating: restaurant.rating,
            },
        }
    }
}

/// A click received by the map surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MapClick {
    /// A click on the map itself.
    Surface(Coordinate),
    /// A click on a marker; opens its popup only.
    Marker(MarkerKind),
}

/// Projects the user location and restaurants onto a [`MapSurface`].
#[derive(Debug)]
pub struct MapView<S: MapSurface> {
    surface: S,
    user_location: Option<Coordinate>,
    restaurant_markers: Vec<Marker>,
    mounted: bool,
    recentered: bool,
}

impl<S: MapSurface> MapView<S> {
    /// Wraps `surface`. Nothing is drawn until [`Self::mount`].
    pub const fn new(surface: S) -> Self {
        Self {
            surface,
            user_location: None,
            restaurant_markers: Vec::new(),
            mounted: false,
            recentered: false,
        }
    }

    /// Shows the map, centered on the user location if already known and
    /// on [`DEFAULT_LOCATION`] otherwise.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.surface
            .set_view(self.user_marker_position(), INITIAL_ZOOM);
        self.redraw();
    }

    /// Records the resolved user location and moves the user marker.
    ///
    /// The view is centered on it unless a restaurant has already been
    /// selected.
    pub fn set_user_location(&mut self, location: Coordinate) {
        self.user_location = Some(location);
        if !self.mounted {
            return;
        }
        if !self.recentered {
            self.surface.set_view(location, INITIAL_ZOOM);
        }
        self.redraw();
    }

    /// Replaces the restaurant markers.
    pub fn render(&mut self, restaurants: &[Restaurant]) {
        self.restaurant_markers = restaurants.iter().map(Marker::restaurant).collect();
        if self.mounted {
            self.redraw();
        }
    }

    /// Centers the view on `position` at [`SELECTED_ZOOM`].
    pub fn recenter(&mut self, position: Coordinate) {
        log::debug!("Recentering map on {position}");
        self.recentered = true;
        self.surface.set_view(position, SELECTED_ZOOM);
    }

    /// Translates a click into a pending selection.
    ///
    /// Only clicks on the map itself yield a position; marker clicks do not.
    #[must_use]
    pub fn handle_click(&self, click: &MapClick) -> Option<Coordinate> {
        match click {
            MapClick::Surface(position) => Some(*position),
            MapClick::Marker(_) => None,
        }
    }

    /// The user location, if resolved.
    #[must_use]
    pub const fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    /// Markers currently drawn (user marker first).
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        std::iter::once(Marker::user(self.user_marker_position()))
            .chain(self.restaurant_markers.iter().cloned())
            .collect()
    }

    /// The underlying surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The underlying surface, mutably.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn user_marker_position(&self) -> Coordinate {
        self.user_location.unwrap_or(DEFAULT_LOCATION)
    }

    fn redraw(&mut self) {
        let markers = self.markers();
        self.surface.render_markers(&markers);
    }
}

/// A [`MapSurface`] that only records what it was asked to show.
///
/// Useful for headless sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    views: Vec<(Coordinate, u8)>,
    markers: Vec<Marker>,
}

impl HeadlessSurface {
    /// Every `set_view` call, oldest first.
    #[must_use]
    pub fn view_history(&self) -> &[(Coordinate, u8)] {
        &self.views
    }

    /// Current center and zoom.
    #[must_use]
    pub fn view(&self) -> Option<(Coordinate, u8)> {
        self.views.last().copied()
    }

    /// Markers from the last render.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl MapSurface for HeadlessSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.views.push((center, zoom));
    }

    fn render_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }
}
