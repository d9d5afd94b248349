//! Plain-text rendering of the map, list and create form.

use restaurant_map_app::{Notifier, Toast};
use restaurant_map_form::{CreateFlow, FormField};
use restaurant_map_restaurant_models::Coordinate;
use restaurant_map_view::{ListView, MapSurface, Marker, Popup, list};

use crate::TerminalSession;

/// A map surface that keeps the current viewport and markers for printing.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    view: Option<(Coordinate, u8)>,
    markers: Vec<Marker>,
}

impl MapSurface for TerminalSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        log::debug!("Map view: {center} @ zoom {zoom}");
        self.view = Some((center, zoom));
    }

    fn render_markers(&mut self, markers: &[Marker]) {
        log::debug!("Map markers: {}", markers.len());
        self.markers = markers.to_vec();
    }
}

impl TerminalSurface {
    /// Prints the viewport and every marker with its popup.
    pub fn print(&self) {
        println!();
        match self.view {
            Some((center, zoom)) => println!("Map centered on {center} (zoom {zoom})"),
            None => println!("Map not shown yet"),
        }
        for marker in &self.markers {
            match &marker.popup {
                Popup::User { text } => println!("  @ {}  {text}", marker.position),
                Popup::Restaurant {
                    name,
                    description,
                    category,
                    badge,
                    rating,
                } => {
                    println!(
                        "  * {}  {name} [{category}/{badge}] {rating}/5",
                        marker.position
                    );
                    if let Some(description) = description {
                        println!("      {description}");
                    }
                }
            }
        }
    }
}

/// Prints toasts to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, toast: Toast) {
        println!();
        println!(">> {}: {}", toast.title, toast.description);
    }
}

/// Prints the loading state and the last load error, if any.
pub fn print_status(session: &TerminalSession) {
    let status = session.store().status();
    if session.is_loading() {
        println!("Loading...");
    }
    if let Some(error) = status.last_error {
        println!("Could not load restaurants: {error}");
    }
}

/// Prints the sidebar list.
pub fn print_list(view: &ListView) {
    println!();
    if view.is_empty() {
        println!("{}", list::EMPTY_HEADLINE);
        println!("{}", list::EMPTY_HINT);
    } else {
        println!(
            "{:<4} {:<30} {:<14} {:<8} {:<6} ADDED",
            "", "NAME", "CATEGORY", "BADGE", "RATING"
        );
        println!("{}", "-".repeat(80));
        for entry in &view.entries {
            let marker = if entry.selected { "->" } else { "" };
            println!(
                "{marker:<4} {:<30} {:<14} {:<8} {:<6} {}",
                truncate(&entry.name, 30),
                truncate(&entry.category, 14),
                entry.badge,
                entry.rating,
                entry.created_on
            );
            if let Some(description) = &entry.description {
                println!("     {}", truncate(description, 75));
            }
        }
    }
    println!();
    println!("Total Restaurants: {}", view.total);
}

/// Prints the create form with its live field errors.
pub fn print_form(flow: &CreateFlow) {
    println!();
    println!("Add New Restaurant");
    if let Some(position) = flow.selection() {
        println!("  Position: {position}");
    }
    for field in FormField::ALL {
        let value = flow.form().get(*field);
        println!("  {}: {value}", field.label());
        if let Some(message) = flow.error_for(*field) {
            println!("    ! {message}");
        }
    }
}

/// Prints only the field errors.
pub fn print_form_errors(flow: &CreateFlow) {
    for error in flow.errors() {
        eprintln!("{}: {}", error.field.label(), error.message);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}
