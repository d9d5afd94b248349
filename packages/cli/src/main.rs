#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the restaurant map.
//!
//! ```text
//! restaurant_map list [--search ital]
//! restaurant_map add --lat 40.0 --lng -73.9 --name "New Spot" --category american --rating 5
//! ```
//!
//! Running with no subcommand enters interactive mode. The service URL
//! comes from `--api-url` or `RESTAURANT_API_URL`; the viewer location
//! from `--location` or `RESTAURANT_MAP_LOCATION`.

mod interactive;
mod terminal;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use restaurant_map_api::{ApiConfig, HttpRestaurantApi};
use restaurant_map_app::{AppEvent, Session};
use restaurant_map_form::{CreatePhase, FormField, MutationState};
use restaurant_map_location::{
    EnvLocationProvider, FixedLocationProvider, LocationError, LocationProvider,
};
use restaurant_map_restaurant_models::Coordinate;
use restaurant_map_store::RestaurantStore;
use restaurant_map_view::MapClick;

use crate::terminal::{TerminalNotifier, TerminalSurface};

/// Session type driven by the terminal front end.
pub type TerminalSession = Session<TerminalSurface, TerminalNotifier>;

#[derive(Parser)]
#[command(
    name = "restaurant_map",
    about = "Find restaurants near you and pin new ones"
)]
struct Cli {
    /// Base URL of the restaurants service (overrides `RESTAURANT_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Request timeout in seconds (overrides `RESTAURANT_API_TIMEOUT_SECS`)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Your location as "lat,lng" (overrides `RESTAURANT_MAP_LOCATION`)
    #[arg(long, global = true)]
    location: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurants, optionally filtered by name or category
    List {
        /// Case-insensitive search on name or category
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Add a restaurant at a map position
    Add {
        /// Latitude of the restaurant
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the restaurant
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Restaurant name
        #[arg(long)]
        name: String,
        /// Category (e.g. italian, mexican)
        #[arg(long)]
        category: String,
        /// Rating from 1 to 5
        #[arg(long)]
        rating: String,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = match cli.api_url.as_deref() {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    log::info!("Using restaurants service at {}", config.base_url);

    let location: Arc<dyn LocationProvider> = match cli.location.as_deref() {
        Some(raw) => Arc::new(FixedLocationProvider(
            restaurant_map_location::parse_coordinate(raw)?,
        )),
        None => Arc::new(EnvLocationProvider),
    };

    let api = Arc::new(HttpRestaurantApi::new(config)?);
    let store = Arc::new(RestaurantStore::new(api));
    let mut session: TerminalSession = Session::new(
        store,
        location,
        TerminalSurface::default(),
        TerminalNotifier,
    );

    session.start();
    session.settle().await;

    match cli.command {
        None => interactive::run(&mut session).await,
        Some(Commands::List { search }) => {
            session.dispatch(AppEvent::SearchChanged(search));
            terminal::print_status(&session);
            terminal::print_list(&session.list_view());
            Ok(())
        }
        Some(Commands::Add {
            lat,
            lng,
            name,
            category,
            rating,
            description,
        }) => {
            let position = map_position(lat, lng)?;
            session.dispatch(AppEvent::MapClicked(MapClick::Surface(position)));
            session.edit(FormField::Name, name);
            session.edit(FormField::Category, category);
            session.edit(FormField::Rating, rating);
            session.edit(FormField::Description, description);
            session.dispatch(AppEvent::SubmitRequested);
            session.settle().await;

            match session.flow().phase() {
                CreatePhase::Closed => Ok(()),
                _ => {
                    terminal::print_form_errors(session.flow());
                    if let MutationState::Failed { message } | MutationState::Declined { message } =
                        session.flow().mutation()
                    {
                        eprintln!("Could not add restaurant: {message}");
                    }
                    Err("restaurant was not added".into())
                }
            }
        }
    }
}

/// Checks a map position given on the command line.
fn map_position(latitude: f64, longitude: f64) -> Result<Coordinate, LocationError> {
    let position = Coordinate::new(latitude, longitude);
    if position.is_valid() {
        Ok(position)
    } else {
        Err(LocationError::Invalid {
            value: format!("{latitude},{longitude}"),
            message: "out of range".to_string(),
        })
    }
}
