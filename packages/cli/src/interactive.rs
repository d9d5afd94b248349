//! Interactive menu for browsing and adding restaurants.
//!
//! Every action goes through the session's event handling, so the map,
//! the list and the create form behave the same as they would behind a
//! graphical surface.

use dialoguer::{Input, Select};
use restaurant_map_app::AppEvent;
use restaurant_map_form::{CreatePhase, FormField, MutationState};
use restaurant_map_view::MapClick;

use crate::TerminalSession;
use crate::terminal;

/// Top-level actions in the interactive menu.
enum Action {
    List,
    Search,
    Select,
    Map,
    Add,
    Reload,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::List,
        Self::Search,
        Self::Select,
        Self::Map,
        Self::Add,
        Self::Reload,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::List => "List restaurants",
            Self::Search => "Search by name or category",
            Self::Select => "Select a restaurant",
            Self::Map => "Show the map",
            Self::Add => "Add a restaurant (click on the map)",
            Self::Reload => "Reload restaurants",
            Self::Quit => "Quit",
        }
    }
}

/// Actions available while the create form is open.
enum FormAction {
    Edit(FormField),
    Submit,
    Cancel,
}

impl FormAction {
    const ALL: &[Self] = &[
        Self::Edit(FormField::Name),
        Self::Edit(FormField::Category),
        Self::Edit(FormField::Rating),
        Self::Edit(FormField::Description),
        Self::Submit,
        Self::Cancel,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Edit(FormField::Name) => "Edit name",
            Self::Edit(FormField::Category) => "Edit category",
            Self::Edit(FormField::Rating) => "Edit rating",
            Self::Edit(FormField::Description) => "Edit description",
            Self::Submit => "Add Restaurant",
            Self::Cancel => "Cancel",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails.
pub async fn run(session: &mut TerminalSession) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    terminal::print_status(session);
    session.map().surface().print();

    loop {
        session.settle().await;

        println!();
        let idx = Select::new()
            .with_prompt("Restaurant map")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::List => {
                terminal::print_status(session);
                terminal::print_list(&session.list_view());
            }
            Action::Search => handle_search(session)?,
            Action::Select => handle_select(session)?,
            Action::Map => session.map().surface().print(),
            Action::Add => handle_add(session).await?,
            Action::Reload => {
                session.store().invalidate();
                let refreshed = session.store().refresh_if_stale().await;
                session.dispatch(AppEvent::RestaurantsRefreshed(refreshed));
                terminal::print_status(session);
                terminal::print_list(&session.list_view());
            }
            Action::Quit => return Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Updates the search query and shows the filtered list.
fn handle_search(session: &mut TerminalSession) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new()
        .with_prompt("Search restaurants (empty clears)")
        .with_initial_text(session.query())
        .allow_empty(true)
        .interact_text()?;

    session.dispatch(AppEvent::SearchChanged(query));
    terminal::print_list(&session.list_view());
    Ok(())
}

/// Picks a restaurant from the filtered list and recenters the map on it.
fn handle_select(session: &mut TerminalSession) -> Result<(), Box<dyn std::error::Error>> {
    let view = session.list_view();
    if view.is_empty() {
        println!("No restaurants match \"{}\".", session.query());
        return Ok(());
    }

    let labels: Vec<String> = view
        .entries
        .iter()
        .map(|entry| format!("{} ({}, {}/5)", entry.name, entry.category, entry.rating))
        .collect();

    let idx = Select::new()
        .with_prompt("Select a restaurant")
        .items(&labels)
        .default(0)
        .interact()?;

    session.dispatch(AppEvent::RestaurantSelected(view.entries[idx].id.clone()));
    session.map().surface().print();
    Ok(())
}

/// Opens the create form at a typed-in map position and drives it until
/// the restaurant is added or the user cancels.
async fn handle_add(session: &mut TerminalSession) -> Result<(), Box<dyn std::error::Error>> {
    let raw: String = Input::new()
        .with_prompt("Map position (lat,lng)")
        .interact_text()?;

    let position = match restaurant_map_location::parse_coordinate(&raw) {
        Ok(position) => position,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    session.dispatch(AppEvent::MapClicked(MapClick::Surface(position)));

    let labels: Vec<&str> = FormAction::ALL.iter().map(FormAction::label).collect();

    while session.flow().is_open() {
        terminal::print_form(session.flow());

        let idx = Select::new()
            .with_prompt("Add New Restaurant")
            .items(&labels)
            .default(0)
            .interact()?;

        match FormAction::ALL[idx] {
            FormAction::Edit(field) => {
                let value: String = Input::new()
                    .with_prompt(field.label())
                    .with_initial_text(session.flow().form().get(field))
                    .allow_empty(true)
                    .interact_text()?;
                session.edit(field, value);
            }
            FormAction::Submit => {
                session.dispatch(AppEvent::SubmitRequested);
                session.settle().await;

                if let CreatePhase::Open { .. } = session.flow().phase() {
                    match session.flow().mutation() {
                        MutationState::Failed { message } | MutationState::Declined { message } => {
                            println!("Could not add restaurant: {message}");
                        }
                        MutationState::Idle
                        | MutationState::Pending
                        | MutationState::Succeeded => {}
                    }
                }
            }
            FormAction::Cancel => session.dispatch(AppEvent::CancelRequested),
        }
    }

    Ok(())
}
